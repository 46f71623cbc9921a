//! Register view controller. It validates inputs locally, posts the account only
//! when every rule passes, and maps server conflicts back onto the username and
//! email fields. Password fields are cleared after every failed attempt so they
//! have to be typed again.
//!
//! Flow Overview: guard against an existing session, validate, enter the loading
//! state, call the register endpoint, then either redirect to the login view or
//! surface the failure.

use crate::{
    errors::{AppError, Conflict},
    features::auth::{AuthApi, AuthState, types::RegistrationRequest},
    routes::{Field, FormErrors, Navigation, Route},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, error};

/// Minimum length for the username and, when given, first and last name.
const MIN_NAME_LENGTH: usize = 3;

#[derive(Debug)]
pub enum RegisterSubmission {
    /// Local validation failed; nothing was sent. See [`RegisterForm::errors`].
    Invalid,
    /// A previous submission has not finished yet.
    Busy,
    /// The account was created and the user should be sent on.
    Registered(Navigation),
    /// The server or the network rejected the attempt.
    Failed(AppError),
}

#[derive(Debug)]
pub struct RegisterForm {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password: SecretString,
    confirm_password: SecretString,
    errors: FormErrors,
    loading: bool,
}

impl RegisterForm {
    /// Enters the register view. Signed-in users are redirected to the main view
    /// and no form is built.
    ///
    /// # Errors
    /// Returns the redirect when a session already exists.
    pub fn enter(auth: &AuthState) -> Result<Self, Navigation> {
        if auth.is_authenticated() {
            return Err(Navigation::Redirect(Route::Main));
        }
        Ok(Self {
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: empty_secret(),
            confirm_password: empty_secret(),
            errors: FormErrors::default(),
            loading: false,
        })
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Username => self.username = value,
            Field::Email => self.email = value,
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Password => self.password = SecretString::from(value),
            Field::ConfirmPassword => self.confirm_password = SecretString::from(value),
        }
    }

    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Current input value of a field, as it would be shown in the form.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Password => self.password.expose_secret(),
            Field::ConfirmPassword => self.confirm_password.expose_secret(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Runs every rule and returns the messages, first failing rule per field.
    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        // checked as typed, surrounding spaces count toward the length
        let username = self.username.as_str();
        if username.is_empty() {
            errors.set_if_empty(Field::Username, "User name is required");
        } else if username.chars().count() < MIN_NAME_LENGTH {
            errors.set_if_empty(
                Field::Username,
                format!("Username length should be at least {MIN_NAME_LENGTH} characters"),
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.set_if_empty(Field::Email, "Email is required");
        } else if !valid_email(email) {
            errors.set_if_empty(Field::Email, "Email address looks invalid");
        }

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.set_if_empty(Field::Password, "Password is required");
        }

        let confirm = self.confirm_password.expose_secret();
        if confirm.is_empty() {
            errors.set_if_empty(Field::ConfirmPassword, "Confirm Password is required");
        } else if confirm != password {
            errors.set_if_empty(Field::ConfirmPassword, "Passwords do not match");
        }

        check_optional_name(&mut errors, Field::FirstName, &self.first_name, "First name");
        check_optional_name(&mut errors, Field::LastName, &self.last_name, "Last name");

        errors
    }

    /// Starts a submission: validates and, if everything passes, enters the
    /// loading state and returns the request to send.
    ///
    /// # Errors
    /// Returns `Busy` while a submission is in flight and `Invalid` when a rule
    /// fails; in both cases nothing should be sent.
    pub fn begin(&mut self) -> Result<RegistrationRequest, RegisterSubmission> {
        if self.loading {
            return Err(RegisterSubmission::Busy);
        }

        self.errors = self.validate();
        if !self.errors.is_empty() {
            debug!(fields = self.errors.iter().count(), "registration blocked locally");
            return Err(RegisterSubmission::Invalid);
        }

        self.loading = true;
        Ok(RegistrationRequest {
            username: self.username.clone(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: optional(&self.first_name),
            last_name: optional(&self.last_name),
        })
    }

    /// Finishes a submission with the register call's result.
    pub fn complete(&mut self, result: Result<Value, AppError>) -> RegisterSubmission {
        self.loading = false;

        match result {
            Ok(_) => RegisterSubmission::Registered(Navigation::Redirect(Route::Login)),
            Err(err) => {
                match &err {
                    AppError::Conflict(Conflict::Username) => self.errors.set(
                        Field::Username,
                        format!("Username {} has already registered", self.username),
                    ),
                    AppError::Conflict(Conflict::Email) => self.errors.set(
                        Field::Email,
                        format!("Email {} has already registered", self.email.trim()),
                    ),
                    other => error!("registration failed: {other}"),
                }

                self.password = empty_secret();
                self.confirm_password = empty_secret();
                RegisterSubmission::Failed(err)
            }
        }
    }

    /// Validates, calls the register endpoint and applies the outcome.
    pub async fn submit(&mut self, api: &AuthApi) -> RegisterSubmission {
        let request = match self.begin() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let result = api.register(&request).await;
        self.complete(result)
    }
}

fn check_optional_name(errors: &mut FormErrors, field: Field, value: &str, label: &str) {
    let value = value.trim();
    if !value.is_empty() && value.chars().count() < MIN_NAME_LENGTH {
        errors.set_if_empty(
            field,
            format!("{label} length should be at least {MIN_NAME_LENGTH} characters"),
        );
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Same shape a browser email input accepts: something on both sides of a
/// single `@`, no whitespace. Dotless domains such as `localhost` are allowed.
fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
