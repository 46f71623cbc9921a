//! # Gatekeep (account & session client)
//!
//! `gatekeep` talks to a remote REST authentication API on behalf of a user. It
//! registers accounts, signs in, checks the current session and signs out, and it
//! keeps the issued tokens in a cookie jar between runs.
//!
//! ## Session Tokens
//!
//! A successful login returns an access token and a refresh token. Both are stored
//! as the `accessToken` and `refreshToken` cookies and sent back as
//! `Authorization: Bearer` headers on status and logout calls. A successful logout
//! (`205 Reset Content`) deletes both cookies; any other answer leaves them as they
//! were.
//!
//! ## Views
//!
//! The login, register, main and not-found views are resolved by [`routes`]. Views
//! that only make sense for anonymous users (login, register) redirect to the main
//! view when a session already exists; that guard runs before any form state is
//! built.
//!
//! Token and password material is wrapped in `secrecy::SecretString` and must never
//! be logged.

pub mod api;
pub mod cli;
pub mod config;
pub mod cookie;
pub mod errors;
pub mod features;
pub mod routes;

pub use errors::AppError;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
