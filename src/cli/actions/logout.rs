use crate::{cli::actions::auth_api, config::AppConfig, features::auth::Session};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

/// Signs out. The request is sent even without a stored session so the server
/// decides whether there is anything to end.
/// # Errors
/// Returns an error if the server does not answer with `205 Reset Content`.
pub async fn execute(args: Args) -> Result<()> {
    let api = auth_api(&args.config)?;

    let token = match Session::from_cookies(api.cookies()) {
        Some(session) => session.access_token,
        None => {
            debug!("no stored session, sending logout without a token");
            SecretString::from(String::new())
        }
    };

    api.logout(&token).await?;
    println!("signed out");

    Ok(())
}
