//! Session state read from the cookie jar. Views consult [`AuthState`] before they
//! are entered so authenticated-only and anonymous-only guards run up front.

use crate::{
    cookie::{ACCESS_TOKEN, CookieJar, REFRESH_TOKEN},
    features::auth::client::AuthApi,
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

/// Tokens issued by the last successful login.
#[derive(Clone, Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
}

impl Session {
    /// Reads the session cookies; `None` without an access token.
    #[must_use]
    pub fn from_cookies(cookies: &CookieJar) -> Option<Self> {
        let access_token = cookies.get(ACCESS_TOKEN)?;
        Some(Self {
            access_token: SecretString::from(access_token),
            refresh_token: cookies.get(REFRESH_TOKEN).map(SecretString::from),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    session: Option<Session>,
    user: Option<Value>,
}

impl AuthState {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// State from cookie presence alone, without asking the server.
    #[must_use]
    pub fn from_cookies(cookies: &CookieJar) -> Self {
        Self {
            session: Session::from_cookies(cookies),
            user: None,
        }
    }

    /// Reads the cookies and confirms the session with the status endpoint. A
    /// rejected or unreachable status call leaves the state anonymous.
    pub async fn hydrate(api: &AuthApi) -> Self {
        let Some(session) = Session::from_cookies(api.cookies()) else {
            return Self::anonymous();
        };

        match api.auth_status(&session.access_token).await {
            Ok(user) => Self {
                session: Some(session),
                user: Some(user),
            },
            Err(err) => {
                debug!("session not confirmed: {err}");
                Self::anonymous()
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// User info returned by the status endpoint, when hydrated.
    #[must_use]
    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }
}
