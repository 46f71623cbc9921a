//! Request and response types for auth API calls. Passwords and tokens are held as
//! `SecretString` and only exposed while building the wire payload.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Username and password as typed by the user.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Account details collected by the register view.
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Body of a successful login (`202 Accepted`).
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("token_type", &self.token_type)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Error body returned with `406 Not Acceptable` on registration.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: Value,
}

impl ErrorDetail {
    /// The detail message when the server sent a plain string.
    pub(crate) fn message(&self) -> Option<&str> {
        self.detail.as_str()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub username: String,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginBody<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: credentials.username.to_lowercase(),
            password: credentials.password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub username: String,
    pub email: String,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
}

impl<'a> From<&'a RegistrationRequest> for RegisterBody<'a> {
    fn from(request: &'a RegistrationRequest) -> Self {
        Self {
            username: request.username.to_lowercase(),
            email: request.email.to_lowercase(),
            password: request.password.expose_secret(),
            first_name: non_empty(request.first_name.as_deref()),
            last_name: non_empty(request.last_name.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_body_lowercases_username_only() -> Result<(), serde_json::Error> {
        let credentials = Credentials::new("Alice", SecretString::from("PaSs".to_string()));
        let body = serde_json::to_value(LoginBody::from(&credentials))?;
        assert_eq!(body, json!({"username": "alice", "password": "PaSs"}));
        Ok(())
    }

    #[test]
    fn register_body_normalizes_and_skips_empty_names() -> Result<(), serde_json::Error> {
        let request = RegistrationRequest {
            username: "Alice".to_string(),
            email: "Alice@Example.COM".to_string(),
            password: SecretString::from("Secret1".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("  ".to_string()),
        };
        let body = serde_json::to_value(RegisterBody::from(&request))?;
        assert_eq!(
            body,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Secret1",
                "first_name": "Alice"
            })
        );
        Ok(())
    }

    #[test]
    fn login_response_keeps_extra_fields_and_hides_tokens() -> Result<(), serde_json::Error> {
        let response: LoginResponse = serde_json::from_value(json!({
            "access_token": "A",
            "refresh_token": "B",
            "token_type": "bearer",
            "user_id": 7
        }))?;
        assert_eq!(response.access_token, "A");
        assert_eq!(response.token_type.as_deref(), Some("bearer"));
        assert_eq!(response.extra.get("user_id"), Some(&json!(7)));

        let printed = format!("{response:?}");
        assert!(!printed.contains("\"A\""));
        assert!(printed.contains("user_id"));
        Ok(())
    }

    #[test]
    fn error_detail_reads_string_details_only() -> Result<(), serde_json::Error> {
        let detail: ErrorDetail =
            serde_json::from_value(json!({"detail": "Email already registered"}))?;
        assert_eq!(detail.message(), Some("Email already registered"));

        let detail: ErrorDetail = serde_json::from_value(json!({"detail": [{"msg": "bad"}]}))?;
        assert_eq!(detail.message(), None);
        Ok(())
    }
}
