use crate::{
    cli::actions::{auth_api, describe},
    config::AppConfig,
    features::auth::AuthState,
    routes::{Navigation, NotFoundPage, Route, navigate},
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub path: String,
}

/// Resolves a path against the current session and prints the view it lands on.
/// # Errors
/// Returns an error if the cookie jar or API client cannot be set up.
pub async fn execute(args: Args) -> Result<()> {
    let api = auth_api(&args.config)?;
    let auth = AuthState::hydrate(&api).await;

    let route = match navigate(&args.path, &auth) {
        Navigation::Render(route) => route,
        redirect @ Navigation::Redirect(route) => {
            println!("{}", describe(redirect));
            route
        }
    };

    println!("{}", render(route, &auth)?);
    Ok(())
}

fn render(route: Route, auth: &AuthState) -> Result<String> {
    Ok(match route {
        Route::Main => match auth.user() {
            Some(user) => serde_json::to_string_pretty(user)?,
            None => "signed in".to_string(),
        },
        Route::Login => "gatekeep login --username <USERNAME> --password <PASSWORD>".to_string(),
        Route::Register => concat!(
            "gatekeep register --username <USERNAME> --email <EMAIL> ",
            "--password <PASSWORD> --confirm-password <PASSWORD>"
        )
        .to_string(),
        Route::NotFound => NotFoundPage.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn render_anonymous_views() -> Result<()> {
        let auth = AuthState::anonymous();
        assert_eq!(render(Route::NotFound, &auth)?, "404\nSorry! Page not found");
        assert!(render(Route::Login, &auth)?.starts_with("gatekeep login"));
        assert!(render(Route::Register, &auth)?.contains("--confirm-password"));
        Ok(())
    }
}
