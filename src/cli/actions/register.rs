use crate::{
    cli::actions::{auth_api, describe, invalid_input},
    config::AppConfig,
    features::auth::AuthState,
    routes::{Field, RegisterForm, RegisterSubmission},
};
use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Fills the register form and submits it.
/// # Errors
/// Returns an error if validation fails or the server rejects the account.
pub async fn execute(args: Args) -> Result<()> {
    let api = auth_api(&args.config)?;

    let mut form = match RegisterForm::enter(&AuthState::from_cookies(api.cookies())) {
        Ok(form) => form,
        Err(navigation) => {
            println!("already signed in, {}", describe(navigation));
            return Ok(());
        }
    };

    form.set(Field::Username, args.username);
    form.set(Field::Email, args.email);
    form.set(Field::Password, args.password.expose_secret());
    form.set(Field::ConfirmPassword, args.confirm_password.expose_secret());
    if let Some(first_name) = args.first_name {
        form.set(Field::FirstName, first_name);
    }
    if let Some(last_name) = args.last_name {
        form.set(Field::LastName, last_name);
    }

    match form.submit(&api).await {
        RegisterSubmission::Registered(navigation) => {
            info!("account registered");
            println!("account created, {}", describe(navigation));
            Ok(())
        }
        RegisterSubmission::Invalid => Err(invalid_input(form.errors())),
        RegisterSubmission::Busy => Err(anyhow!("a registration is already in progress")),
        // conflicts are reported on the field they belong to
        RegisterSubmission::Failed(_) if !form.errors().is_empty() => {
            Err(invalid_input(form.errors()))
        }
        RegisterSubmission::Failed(err) => Err(err.into()),
    }
}
