//! Cookie jar for session tokens.
//!
//! Cookies live in memory and, when the jar is opened with a path, in a JSON file
//! written with restricted permissions (0600). Expired cookies read as absent and
//! are dropped on load. Values are tokens, so they are never logged or printed by
//! `Debug`.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::DEFAULT_COOKIE_MAX_AGE;

pub const ACCESS_TOKEN: &str = "accessToken";
pub const REFRESH_TOKEN: &str = "refreshToken";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Cookie {
    value: String,
    /// Expiry in seconds since the epoch.
    expires_at: u64,
}

impl Cookie {
    fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

pub struct CookieJar {
    path: Option<PathBuf>,
    max_age: Duration,
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl CookieJar {
    /// Jar that only lives as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            max_age: DEFAULT_COOKIE_MAX_AGE,
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens a file-backed jar. A missing file is an empty jar.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let mut cookies: BTreeMap<String, Cookie> = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|err| {
                AppError::Storage(format!("Failed to read {}: {err}", path.display()))
            })?;
            serde_json::from_str(&contents).map_err(|err| {
                AppError::Storage(format!("Failed to parse {}: {err}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };

        let now = now_secs();
        cookies.retain(|_, cookie| !cookie.is_expired(now));

        debug!("opened cookie jar {} ({} cookies)", path.display(), cookies.len());

        Ok(Self {
            path: Some(path),
            max_age: DEFAULT_COOKIE_MAX_AGE,
            cookies: Mutex::new(cookies),
        })
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the cookie value unless it is missing or expired.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let now = now_secs();
        self.lock()
            .get(name)
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| cookie.value.clone())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Writes a cookie with the jar's max age, replacing any previous value.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the jar file cannot be written.
    pub fn set(&self, name: &str, value: &str) -> Result<(), AppError> {
        self.set_with_max_age(name, value, self.max_age)
    }

    /// # Errors
    /// Returns `AppError::Storage` if the jar file cannot be written.
    pub fn set_with_max_age(
        &self,
        name: &str,
        value: &str,
        max_age: Duration,
    ) -> Result<(), AppError> {
        self.store(&[(name, value)], max_age)
    }

    /// Writes several cookies with one file write. Either all of them are
    /// stored or, if the write fails, the jar keeps its previous contents.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the jar file cannot be written.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), AppError> {
        self.store(entries, self.max_age)
    }

    fn store(&self, entries: &[(&str, &str)], max_age: Duration) -> Result<(), AppError> {
        let expires_at = now_secs().saturating_add(max_age.as_secs());
        let mut cookies = self.lock();
        let previous = cookies.clone();
        for (name, value) in entries {
            cookies.insert(
                (*name).to_string(),
                Cookie {
                    value: (*value).to_string(),
                    expires_at,
                },
            );
        }
        self.persist_or_restore(&mut cookies, previous)
    }

    /// Removes a cookie; deleting a missing cookie is not an error.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the jar file cannot be written.
    pub fn delete(&self, name: &str) -> Result<(), AppError> {
        let mut cookies = self.lock();
        let previous = cookies.clone();
        if cookies.remove(name).is_none() {
            return Ok(());
        }
        self.persist_or_restore(&mut cookies, previous)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Cookie>> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Memory and file must agree: a failed write puts `previous` back.
    fn persist_or_restore(
        &self,
        cookies: &mut BTreeMap<String, Cookie>,
        previous: BTreeMap<String, Cookie>,
    ) -> Result<(), AppError> {
        let result = self.persist(cookies);
        if result.is_err() {
            *cookies = previous;
        }
        result
    }

    fn persist(&self, cookies: &BTreeMap<String, Cookie>) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }

        let contents = serde_json::to_string_pretty(cookies)
            .map_err(|err| AppError::Storage(format!("Failed to serialize cookies: {err}")))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|err| {
            AppError::Storage(format!("Failed to open {} for writing: {err}", path.display()))
        })?;
        file.write_all(contents.as_bytes()).map_err(|err| {
            AppError::Storage(format!("Failed to write to {}: {err}", path.display()))
        })
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.lock().keys().cloned().collect();
        f.debug_struct("CookieJar")
            .field("path", &self.path)
            .field("max_age", &self.max_age)
            .field("cookies", &names)
            .finish()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
