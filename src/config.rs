//! Client configuration: API base URL, endpoint paths, timeout and cookie jar
//! location. Values are public; do not store secrets here.

use crate::errors::AppError;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// Default request timeout applied to every API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default lifetime of a session cookie.
pub const DEFAULT_COOKIE_MAX_AGE: Duration = Duration::from_secs(86_400);
/// Cookie jar file name under the gatekeep home directory.
const COOKIE_JAR_FILE: &str = "cookies.json";

/// Paths of the four auth endpoints, relative to the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRoutes {
    pub status: String,
    pub login: String,
    pub register: String,
    pub logout: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            status: "/auth/status".to_string(),
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
            logout: "/auth/logout".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub routes: ApiRoutes,
    pub timeout: Duration,
    pub cookie_jar: Option<PathBuf>,
    pub cookie_max_age: Duration,
}

impl AppConfig {
    /// Builds a config for the given API base URL with default routes and an
    /// in-memory cookie jar.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the URL does not parse or is not http(s).
    pub fn new(api_base_url: &str) -> Result<Self, AppError> {
        let api_base_url = normalize_base_url(api_base_url)?;
        Ok(Self {
            api_base_url,
            routes: ApiRoutes::default(),
            timeout: DEFAULT_TIMEOUT,
            cookie_jar: None,
            cookie_max_age: DEFAULT_COOKIE_MAX_AGE,
        })
    }

    #[must_use]
    pub fn with_routes(mut self, routes: ApiRoutes) -> Self {
        self.routes = routes;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cookie_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_jar = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.cookie_max_age = max_age;
        self
    }
}

/// Default cookie jar location, `$HOME/.gatekeep/cookies.json`.
///
/// # Errors
/// Returns `AppError::Config` if `HOME` is not set.
pub fn default_cookie_jar() -> Result<PathBuf, AppError> {
    let home = env::var("HOME")
        .ok()
        .and_then(|value| normalize_value(&value))
        .ok_or_else(|| {
            AppError::Config("HOME is not set; pass --cookie-jar explicitly.".to_string())
        })?;

    Ok(PathBuf::from(home).join(".gatekeep").join(COOKIE_JAR_FILE))
}

fn normalize_base_url(value: &str) -> Result<String, AppError> {
    let trimmed = normalize_value(value)
        .ok_or_else(|| AppError::Config("API base URL is not configured.".to_string()))?;

    let url = Url::parse(&trimmed)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        scheme => Err(AppError::Config(format!(
            "Unsupported API URL scheme: {scheme}"
        ))),
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
