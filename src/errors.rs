//! Single error type for every network, storage and configuration failure. API
//! helpers normalize transport and HTTP failures into these variants so callers
//! switch on the variant instead of inspecting raw responses or message text.

use std::fmt;

/// Server-side rejection of a registration (`406 Not Acceptable`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Conflict {
    Username,
    Email,
    /// Any other detail the server sent back, kept verbatim.
    Other(String),
}

impl Conflict {
    /// Classifies the `detail` field of a 406 response.
    #[must_use]
    pub fn from_detail(detail: &str) -> Self {
        let normalized = detail.trim().to_lowercase();
        if normalized.starts_with("username already registered") {
            Self::Username
        } else if normalized.starts_with("email already registered") {
            Self::Email
        } else {
            Self::Other(detail.trim().to_string())
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Username => write!(formatter, "Username already registered"),
            Conflict::Email => write!(formatter, "Email already registered"),
            Conflict::Other(detail) => write!(formatter, "{detail}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    Config(String),
    Transport(String),
    Timeout(String),
    UnexpectedStatus { status: u16, message: String },
    InvalidCredentials,
    InactiveAccount,
    Conflict(Conflict),
    LogoutFailed { status: u16 },
    Parse(String),
    Serialization(String),
    Storage(String),
}

impl AppError {
    /// Status error without a server message, used when a success status came
    /// back with no usable body.
    #[must_use]
    pub fn unexpected_status(status: u16) -> Self {
        Self::UnexpectedStatus {
            status,
            message: String::new(),
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::UnexpectedStatus { status, .. } | AppError::LogoutFailed { status } => {
                Some(*status)
            }
            AppError::InvalidCredentials => Some(401),
            AppError::InactiveAccount => Some(403),
            AppError::Conflict(_) => Some(406),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Transport(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::UnexpectedStatus { status, message } => {
                if message.is_empty() {
                    write!(formatter, "Response status code: {status}")
                } else {
                    write!(formatter, "Response status code: {status}: {message}")
                }
            }
            AppError::InvalidCredentials => write!(formatter, "Incorrect username or password"),
            AppError::InactiveAccount => write!(formatter, "Inactive account!"),
            AppError::Conflict(conflict) => write!(formatter, "{conflict}"),
            AppError::LogoutFailed { status } => write!(
                formatter,
                "User is not logged out successfully (status {status})"
            ),
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => write!(formatter, "Request error: {message}"),
            AppError::Storage(message) => write!(formatter, "Cookie store error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}
