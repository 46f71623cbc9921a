//! Login view controller. Both fields are required; on success the session
//! cookies are stored by the API client and the user is sent to the main view.

use crate::{
    errors::AppError,
    features::auth::{
        AuthApi, AuthState,
        types::{Credentials, LoginResponse},
    },
    routes::{Field, FormErrors, Navigation, Route},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub enum LoginSubmission {
    Invalid,
    Busy,
    SignedIn(Navigation),
    Failed(AppError),
}

#[derive(Debug)]
pub struct LoginForm {
    username: String,
    password: SecretString,
    errors: FormErrors,
    /// Form-level message from the last failed attempt.
    failure: Option<String>,
    loading: bool,
}

impl LoginForm {
    /// Enters the login view; signed-in users go straight to the main view.
    ///
    /// # Errors
    /// Returns the redirect when a session already exists.
    pub fn enter(auth: &AuthState) -> Result<Self, Navigation> {
        if auth.is_authenticated() {
            return Err(Navigation::Redirect(Route::Main));
        }
        Ok(Self {
            username: String::new(),
            password: SecretString::from(String::new()),
            errors: FormErrors::default(),
            failure: None,
            loading: false,
        })
    }

    /// Sets the username or password; other fields do not exist on this form.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Username => self.username = value.into(),
            Field::Password => self.password = SecretString::from(value.into()),
            other => debug!("login form has no {other} field"),
        }
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    #[must_use]
    pub fn password_is_empty(&self) -> bool {
        self.password.expose_secret().is_empty()
    }

    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.set(Field::Username, "Username is required");
        }
        if self.password.expose_secret().is_empty() {
            errors.set(Field::Password, "Password is required");
        }
        errors
    }

    /// Starts a login: validates and, if both fields are filled, enters the
    /// loading state and returns the credentials to send.
    ///
    /// # Errors
    /// Returns `Busy` while a login is in flight and `Invalid` when a field is
    /// missing; in both cases nothing should be sent.
    pub fn begin(&mut self) -> Result<Credentials, LoginSubmission> {
        if self.loading {
            return Err(LoginSubmission::Busy);
        }

        self.failure = None;
        self.errors = self.validate();
        if !self.errors.is_empty() {
            return Err(LoginSubmission::Invalid);
        }

        self.loading = true;
        Ok(Credentials::new(self.username.trim(), self.password.clone()))
    }

    /// Finishes a login with the login call's result.
    pub fn complete(&mut self, result: Result<LoginResponse, AppError>) -> LoginSubmission {
        self.loading = false;

        match result {
            Ok(_) => LoginSubmission::SignedIn(Navigation::Redirect(Route::Main)),
            Err(err) => {
                self.failure = Some(err.to_string());
                self.password = SecretString::from(String::new());
                LoginSubmission::Failed(err)
            }
        }
    }

    pub async fn submit(&mut self, api: &AuthApi) -> LoginSubmission {
        let credentials = match self.begin() {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };

        let result = api.login(&credentials).await;
        self.complete(result)
    }
}
