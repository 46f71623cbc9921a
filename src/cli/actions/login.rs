use crate::{
    cli::actions::{auth_api, describe, invalid_input},
    config::AppConfig,
    features::auth::AuthState,
    routes::{Field, LoginForm, LoginSubmission},
};
use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub username: String,
    pub password: SecretString,
}

/// Fills the login form and submits it.
/// # Errors
/// Returns an error if validation fails or the server rejects the credentials.
pub async fn execute(args: Args) -> Result<()> {
    let api = auth_api(&args.config)?;

    let mut form = match LoginForm::enter(&AuthState::from_cookies(api.cookies())) {
        Ok(form) => form,
        Err(navigation) => {
            println!("already signed in, {}", describe(navigation));
            return Ok(());
        }
    };
    form.set(Field::Username, args.username);
    form.set(Field::Password, args.password.expose_secret());

    match form.submit(&api).await {
        LoginSubmission::SignedIn(navigation) => {
            info!("login succeeded");
            println!("signed in, {}", describe(navigation));
            Ok(())
        }
        LoginSubmission::Invalid => Err(invalid_input(form.errors())),
        LoginSubmission::Busy => Err(anyhow!("a login is already in progress")),
        LoginSubmission::Failed(err) => Err(err.into()),
    }
}
