use crate::{cli::actions::auth_api, config::AppConfig, features::auth::Session};
use anyhow::{Context, Result, anyhow};

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

/// Prints the user behind the stored session.
/// # Errors
/// Returns an error if there is no session or the status call fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = auth_api(&args.config)?;

    let session = Session::from_cookies(api.cookies())
        .ok_or_else(|| anyhow!("not signed in, run `gatekeep login` first"))?;

    let user = api
        .auth_status(&session.access_token)
        .await
        .context("session status request failed")?;

    println!("{}", serde_json::to_string_pretty(&user)?);

    Ok(())
}
