//! Client wrapper for the auth API endpoints. Each call performs one request,
//! checks the endpoint's own success status and normalizes every failure into an
//! [`AppError`] variant. Login and logout are the only calls that touch the
//! cookie jar, and only after the server confirmed the change.

use crate::{
    api::{ApiResponse, HttpClient, RequestOptions},
    config::{ApiRoutes, AppConfig},
    cookie::{ACCESS_TOKEN, CookieJar, REFRESH_TOKEN},
    errors::{AppError, Conflict},
    features::auth::types::{
        Credentials, ErrorDetail, LoginBody, LoginResponse, RegisterBody, RegistrationRequest,
    },
};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_ACCEPTED: u16 = 202;
const STATUS_RESET_CONTENT: u16 = 205;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_FORBIDDEN: u16 = 403;
const STATUS_NOT_ACCEPTABLE: u16 = 406;

#[derive(Clone, Debug)]
pub struct AuthApi {
    http: HttpClient,
    routes: ApiRoutes,
    cookies: Arc<CookieJar>,
}

impl AuthApi {
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: &AppConfig, cookies: Arc<CookieJar>) -> Result<Self, AppError> {
        Ok(Self {
            http: HttpClient::new(config)?,
            routes: config.routes.clone(),
            cookies,
        })
    }

    #[must_use]
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Fetches the session/user info for `token`.
    /// Succeeds only on `200` with a body.
    ///
    /// # Errors
    /// Returns `AppError::UnexpectedStatus` for any other status, `AppError::Parse`
    /// for a malformed body, or a transport error.
    #[instrument(skip_all)]
    pub async fn auth_status(&self, token: &SecretString) -> Result<Value, AppError> {
        let options = RequestOptions::new().bearer(token);
        let response = self.http.get(&self.routes.status, &options).await?;

        if response.status == STATUS_OK {
            return response.require_json();
        }
        Err(response.into_status_error())
    }

    /// Signs in and stores the issued tokens as cookies.
    /// The username is lower-cased before sending; the password is sent as typed.
    ///
    /// # Errors
    /// `InvalidCredentials` on `401`, `InactiveAccount` on `403`,
    /// `UnexpectedStatus` for any other status or a `202` without a body,
    /// `Storage` if the cookies cannot be written, or a transport error.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AppError> {
        let body = LoginBody::from(credentials);
        let response = self
            .http
            .post_json(&self.routes.login, &body, &RequestOptions::new())
            .await?;

        match response.status {
            STATUS_ACCEPTED => {
                let session: LoginResponse = response.require_json()?;
                self.cookies.set_many(&[
                    (ACCESS_TOKEN, session.access_token.as_str()),
                    (REFRESH_TOKEN, session.refresh_token.as_str()),
                ])?;
                debug!("session cookies stored");
                Ok(session)
            }
            STATUS_UNAUTHORIZED => Err(AppError::InvalidCredentials),
            STATUS_FORBIDDEN => Err(AppError::InactiveAccount),
            _ => Err(response.into_status_error()),
        }
    }

    /// Creates an account. Username and email are lower-cased; password and
    /// names are sent unchanged, empty names are omitted.
    ///
    /// # Errors
    /// `Conflict` on `406` with a string `detail`, `UnexpectedStatus` for any
    /// other status or a `201` without a body, or a transport error.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Value, AppError> {
        let body = RegisterBody::from(request);
        let response = self
            .http
            .post_json(&self.routes.register, &body, &RequestOptions::new())
            .await?;

        match response.status {
            STATUS_CREATED => response.require_json(),
            STATUS_NOT_ACCEPTABLE => Err(conflict_error(response)),
            _ => Err(response.into_status_error()),
        }
    }

    /// Ends the session on the server and deletes both cookies on `205`.
    /// The request is sent even when no session cookie exists.
    ///
    /// # Errors
    /// `LogoutFailed` for any status other than `205` (cookies are left as they
    /// were), `Storage` if the cookies cannot be removed, or a transport error.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &SecretString) -> Result<(), AppError> {
        let options = RequestOptions::new().bearer(token);
        let response = self.http.post_empty(&self.routes.logout, &options).await?;

        if response.status != STATUS_RESET_CONTENT {
            debug!(status = response.status, "logout rejected");
            return Err(AppError::LogoutFailed {
                status: response.status,
            });
        }

        self.cookies.delete(ACCESS_TOKEN)?;
        self.cookies.delete(REFRESH_TOKEN)?;
        debug!("session cookies deleted");
        Ok(())
    }
}

/// Turns a `406` into a tagged conflict; bodies without a string detail fall
/// back to a status error.
fn conflict_error(response: ApiResponse) -> AppError {
    let detail = response
        .json::<ErrorDetail>()
        .ok()
        .flatten()
        .and_then(|detail| detail.message().map(str::to_string));

    match detail {
        Some(detail) => AppError::Conflict(Conflict::from_detail(&detail)),
        None => response.into_status_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn api(server: &MockServer) -> Result<AuthApi> {
        let config = AppConfig::new(&server.uri())?;
        Ok(AuthApi::new(&config, Arc::new(CookieJar::in_memory()))?)
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn auth_status_returns_body_on_200() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
            .mount(&server)
            .await;

        let user = api(&server)?.auth_status(&secret("access-1")).await?;
        assert_eq!(user, json!({"username": "alice"}));
        Ok(())
    }

    #[tokio::test]
    async fn auth_status_rejects_other_statuses_and_empty_bodies() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Not authenticated"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .and(header("authorization", "Bearer empty"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let api = api(&server)?;
        let err = api
            .auth_status(&secret("expired"))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Not authenticated"));

        let err = api
            .auth_status(&secret("empty"))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(err, AppError::unexpected_status(200));
        Ok(())
    }

    #[tokio::test]
    async fn login_stores_tokens_on_202() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "alice", "password": "Secret"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "access_token": "A",
                "refresh_token": "B",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server)?;
        let session = api
            .login(&Credentials::new("ALICE", secret("Secret")))
            .await?;

        assert_eq!(session.access_token, "A");
        assert_eq!(api.cookies().get(ACCESS_TOKEN), Some("A".to_string()));
        assert_eq!(api.cookies().get(REFRESH_TOKEN), Some("B".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn login_stores_no_token_when_jar_write_fails() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "access_token": "A",
                "refresh_token": "B"
            })))
            .mount(&server)
            .await;

        // the jar directory is a plain file, so the cookie file cannot be created
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "")?;
        let jar = Arc::new(CookieJar::open(blocker.join("cookies.json"))?);
        let api = AuthApi::new(&AppConfig::new(&server.uri())?, Arc::clone(&jar))?;

        let err = api
            .login(&Credentials::new("alice", secret("Secret")))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, AppError::Storage(_)));
        assert!(!jar.contains(ACCESS_TOKEN));
        assert!(!jar.contains(REFRESH_TOKEN));
        Ok(())
    }

    #[tokio::test]
    async fn login_maps_rejections() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        let cases = [("wrong", 401), ("inactive", 403), ("broken", 500), ("ok", 200)];
        for (username, status) in cases {
            Mock::given(method("POST"))
                .and(path("/auth/login"))
                .and(body_json(json!({"username": username, "password": "pw"})))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "access_token": "A",
                    "refresh_token": "B"
                })))
                .mount(&server)
                .await;
        }

        let api = api(&server)?;
        let attempt = |username: &'static str| {
            let api = api.clone();
            async move { api.login(&Credentials::new(username, secret("pw"))).await }
        };

        assert_eq!(attempt("wrong").await.err(), Some(AppError::InvalidCredentials));
        assert_eq!(attempt("inactive").await.err(), Some(AppError::InactiveAccount));
        assert_eq!(attempt("broken").await.err().and_then(|e| e.status()), Some(500));
        // Only 202 counts as a successful login.
        assert_eq!(attempt("ok").await.err().and_then(|e| e.status()), Some(200));

        assert!(!api.cookies().contains(ACCESS_TOKEN));
        assert!(!api.cookies().contains(REFRESH_TOKEN));
        Ok(())
    }

    #[tokio::test]
    async fn register_posts_normalized_fields() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "Secret",
                "first_name": "Alice",
                "last_name": "Liddell"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let created = api(&server)?
            .register(&RegistrationRequest {
                username: "Alice".to_string(),
                email: "Alice@Example.com".to_string(),
                password: secret("Secret"),
                first_name: Some("Alice".to_string()),
                last_name: Some("Liddell".to_string()),
            })
            .await?;
        assert_eq!(created, json!({"id": 1}));
        Ok(())
    }

    #[tokio::test]
    async fn register_classifies_406_details() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        let cases = [
            ("taken", json!({"detail": "Username already registered"})),
            ("dupmail", json!({"detail": "Email already registered"})),
            ("weird", json!({"detail": "Something else"})),
            ("listy", json!({"detail": [{"msg": "field required"}]})),
        ];
        for (username, body) in cases {
            Mock::given(method("POST"))
                .and(path("/auth/register"))
                .and(body_json(json!({
                    "username": username,
                    "email": "a@b.co",
                    "password": "pw"
                })))
                .respond_with(ResponseTemplate::new(406).set_body_json(body))
                .mount(&server)
                .await;
        }

        let api = api(&server)?;
        let attempt = |username: &'static str| {
            let api = api.clone();
            async move {
                api.register(&RegistrationRequest {
                    username: username.to_string(),
                    email: "a@b.co".to_string(),
                    password: secret("pw"),
                    first_name: None,
                    last_name: None,
                })
                .await
                .err()
            }
        };

        assert_eq!(attempt("taken").await, Some(AppError::Conflict(Conflict::Username)));
        assert_eq!(attempt("dupmail").await, Some(AppError::Conflict(Conflict::Email)));
        assert_eq!(
            attempt("weird").await,
            Some(AppError::Conflict(Conflict::Other("Something else".to_string())))
        );
        assert_eq!(attempt("listy").await.and_then(|e| e.status()), Some(406));
        Ok(())
    }

    #[tokio::test]
    async fn logout_deletes_cookies_on_205() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(header("authorization", "Bearer A"))
            .respond_with(ResponseTemplate::new(205))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server)?;
        api.cookies().set(ACCESS_TOKEN, "A")?;
        api.cookies().set(REFRESH_TOKEN, "B")?;

        api.logout(&secret("A")).await?;

        assert!(!api.cookies().contains(ACCESS_TOKEN));
        assert!(!api.cookies().contains(REFRESH_TOKEN));
        Ok(())
    }

    #[tokio::test]
    async fn logout_keeps_cookies_on_failure() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let api = api(&server)?;
        api.cookies().set(ACCESS_TOKEN, "A")?;
        api.cookies().set(REFRESH_TOKEN, "B")?;

        let result = api.logout(&secret("A")).await;
        assert_eq!(result, Err(AppError::LogoutFailed { status: 200 }));
        assert_eq!(api.cookies().get(ACCESS_TOKEN), Some("A".to_string()));
        assert_eq!(api.cookies().get(REFRESH_TOKEN), Some("B".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn logout_without_session_still_calls_server() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server)?;
        let result = api.logout(&secret("")).await;
        assert_eq!(result, Err(AppError::LogoutFailed { status: 401 }));
        assert!(!api.cookies().contains(ACCESS_TOKEN));
        Ok(())
    }
}
