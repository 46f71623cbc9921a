//! Auth feature module covering login, registration, status and logout calls plus
//! session bootstrapping from the cookie jar. It keeps authentication logic out of
//! the views. This module touches security boundaries and must avoid logging
//! secrets or token material.
//!
//! Flow Overview: Register posts the account and, on `201`, sends the user to the
//! login view. Login posts credentials and, on `202`, stores the access and refresh
//! tokens as cookies. Status and logout send the access token as a bearer header;
//! logout deletes both cookies on `205`.

pub mod client;
pub mod state;
pub mod types;

pub use client::AuthApi;
pub use state::{AuthState, Session};
