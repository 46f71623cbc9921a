use crate::{
    cli::{
        actions::{Action, login, logout, open, register, status},
        commands::{api, session},
    },
    config::{ApiRoutes, AppConfig, default_cookie_jar},
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// # Errors
/// Returns an error if the configuration is invalid or no subcommand was given.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let config = app_config(matches)?;

    match matches.subcommand() {
        Some((session::CMD_STATUS, _)) => Ok(Action::Status(status::Args { config })),
        Some((session::CMD_LOGIN, sub)) => Ok(Action::Login(login::Args {
            config,
            username: string_arg(sub, session::ARG_USERNAME),
            password: secret_arg(sub, session::ARG_PASSWORD),
        })),
        Some((session::CMD_REGISTER, sub)) => Ok(Action::Register(register::Args {
            config,
            username: string_arg(sub, session::ARG_USERNAME),
            email: string_arg(sub, session::ARG_EMAIL),
            password: secret_arg(sub, session::ARG_PASSWORD),
            confirm_password: secret_arg(sub, session::ARG_CONFIRM_PASSWORD),
            first_name: sub.get_one::<String>(session::ARG_FIRST_NAME).cloned(),
            last_name: sub.get_one::<String>(session::ARG_LAST_NAME).cloned(),
        })),
        Some((session::CMD_LOGOUT, _)) => Ok(Action::Logout(logout::Args { config })),
        Some((session::CMD_OPEN, sub)) => Ok(Action::Open(open::Args {
            config,
            path: sub
                .get_one::<String>(session::ARG_PATH)
                .cloned()
                .unwrap_or_else(|| "/".to_string()),
        })),
        Some((other, _)) => Err(anyhow!("unknown command: {other}")),
        None => Err(anyhow!("missing command")),
    }
}

fn app_config(matches: &ArgMatches) -> Result<AppConfig> {
    let api_url = matches
        .get_one::<String>(api::ARG_API_URL)
        .context("missing required argument: --api-url")?;

    let defaults = ApiRoutes::default();
    let routes = ApiRoutes {
        status: path_arg(matches, api::ARG_STATUS_PATH, defaults.status),
        login: path_arg(matches, api::ARG_LOGIN_PATH, defaults.login),
        register: path_arg(matches, api::ARG_REGISTER_PATH, defaults.register),
        logout: path_arg(matches, api::ARG_LOGOUT_PATH, defaults.logout),
    };

    let cookie_jar = match matches.get_one::<String>(api::ARG_COOKIE_JAR) {
        Some(path) => PathBuf::from(path),
        None => default_cookie_jar()?,
    };

    let mut config = AppConfig::new(api_url)
        .context("invalid --api-url")?
        .with_routes(routes)
        .with_cookie_jar(cookie_jar);

    if let Some(timeout) = matches.get_one::<u64>(api::ARG_TIMEOUT) {
        config = config.with_timeout(Duration::from_secs(*timeout));
    }
    if let Some(max_age) = matches.get_one::<u64>(api::ARG_COOKIE_MAX_AGE) {
        config = config.with_cookie_max_age(Duration::from_secs(*max_age));
    }

    Ok(config)
}

fn path_arg(matches: &ArgMatches, id: &str, default: String) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or(default)
}

fn string_arg(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn secret_arg(matches: &ArgMatches, id: &str) -> SecretString {
    SecretString::from(string_arg(matches, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{self, tests::without_env};
    use anyhow::Result;
    use secrecy::ExposeSecret;

    fn action_from(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn builds_config_from_globals() -> Result<()> {
        without_env(|| -> Result<()> {
            let action = action_from(&[
                "gatekeep",
                "--api-url",
                "https://api.example.com/",
                "--cookie-jar",
                "/tmp/gatekeep-jar.json",
                "--timeout",
                "3",
                "--login-path",
                "/v1/login",
                "status",
            ])?;
            let Action::Status(args) = action else {
                return Err(anyhow!("expected status action"));
            };
            assert_eq!(args.config.api_base_url, "https://api.example.com");
            assert_eq!(args.config.timeout, Duration::from_secs(3));
            assert_eq!(args.config.routes.login, "/v1/login");
            assert_eq!(args.config.routes.logout, "/auth/logout");
            assert_eq!(
                args.config.cookie_jar,
                Some(PathBuf::from("/tmp/gatekeep-jar.json"))
            );
            Ok(())
        })
    }

    #[test]
    fn default_cookie_jar_under_home() -> Result<()> {
        temp_env::with_vars(
            [
                ("HOME", Some("/home/alice")),
                ("GATEKEEP_COOKIE_JAR", None),
                ("GATEKEEP_API_URL", None),
            ],
            || -> Result<()> {
                let Action::Logout(args) = action_from(&["gatekeep", "logout"])? else {
                    return Err(anyhow!("expected logout action"));
                };
                assert_eq!(
                    args.config.cookie_jar,
                    Some(PathBuf::from("/home/alice/.gatekeep/cookies.json"))
                );
                Ok(())
            },
        )
    }

    #[test]
    fn rejects_invalid_api_url() {
        without_env(|| {
            let result = action_from(&["gatekeep", "--api-url", "ftp://example.com", "status"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn login_missing_password_is_empty() -> Result<()> {
        without_env(|| -> Result<()> {
            let Action::Login(args) = action_from(&[
                "gatekeep",
                "--cookie-jar",
                "/tmp/jar.json",
                "login",
                "-u",
                "alice",
            ])?
            else {
                return Err(anyhow!("expected login action"));
            };
            assert_eq!(args.username, "alice");
            assert!(args.password.expose_secret().is_empty());
            Ok(())
        })
    }

    #[test]
    fn open_defaults_to_root() -> Result<()> {
        without_env(|| -> Result<()> {
            let Action::Open(args) =
                action_from(&["gatekeep", "--cookie-jar", "/tmp/jar.json", "open"])?
            else {
                return Err(anyhow!("expected open action"));
            };
            assert_eq!(args.path, "/");
            Ok(())
        })
    }
}
