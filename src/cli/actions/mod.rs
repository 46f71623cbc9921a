pub mod login;
pub mod logout;
pub mod open;
pub mod register;
pub mod status;

// The match over every action lives in `run` so this module stays small.
mod run;

use crate::{
    config::AppConfig,
    cookie::CookieJar,
    features::auth::AuthApi,
    routes::{FormErrors, Navigation},
};
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

#[derive(Debug)]
pub enum Action {
    Status(status::Args),
    Login(login::Args),
    Register(register::Args),
    Logout(logout::Args),
    Open(open::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Opens the configured cookie jar and builds the API client around it.
pub(crate) fn auth_api(config: &AppConfig) -> Result<AuthApi> {
    let jar = match &config.cookie_jar {
        Some(path) => CookieJar::open(path)
            .with_context(|| format!("failed to open cookie jar {}", path.display()))?,
        None => CookieJar::in_memory(),
    };
    let jar = jar.with_max_age(config.cookie_max_age);

    AuthApi::new(config, Arc::new(jar)).context("failed to build API client")
}

/// Turns field messages into a single error, one field per line.
pub(crate) fn invalid_input(errors: &FormErrors) -> anyhow::Error {
    let lines: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect();
    anyhow!("invalid input\n{}", lines.join("\n"))
}

pub(crate) fn describe(navigation: Navigation) -> String {
    match navigation {
        Navigation::Render(route) => format!("view: {route}"),
        Navigation::Redirect(route) => format!("redirect: {route}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{Field, Route};

    #[test]
    fn invalid_input_lists_each_field() {
        let mut errors = FormErrors::default();
        errors.set(Field::Username, "User name is required");
        errors.set(Field::ConfirmPassword, "Passwords do not match");

        let message = invalid_input(&errors).to_string();
        assert_eq!(
            message,
            "invalid input\n  username: User name is required\n  cpassword: Passwords do not match"
        );
    }

    #[test]
    fn describe_navigation() {
        assert_eq!(describe(Navigation::Redirect(Route::Login)), "redirect: /login");
        assert_eq!(describe(Navigation::Render(Route::NotFound)), "view: /404");
    }
}
