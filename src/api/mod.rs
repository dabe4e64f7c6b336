//! Client side of the learning platform API.
//!
//! This module owns everything that talks HTTP: the bearer-token session,
//! the token persistence layer, the typed request/response models and the
//! [`LmsBackend`] trait the UI drives.

use crate::validation::ValidationError;

pub mod backend;
pub mod models;
pub mod session;
pub mod token_store;

pub use backend::{HttpBackend, LmsBackend};
pub use models::*;
pub use session::{ApiRequest, FilePart, RequestBody, SessionEvent, SessionManager};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Errors surfaced by API operations.
///
/// `SessionExpired` is special: by the time a caller sees it the session has
/// already been cleared and the app notified, so callers only need to stop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Credentials were rejected or no authenticated user is available.
    #[error("{0}")]
    Auth(String),

    /// The server answered 401 to an authenticated call.
    #[error("Session expired")]
    SessionExpired,

    /// Any other non-2xx answer, carrying the server's detail text.
    #[error("{detail}")]
    Request { status: u16, detail: String },

    /// Client-side validation failed before any request was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport failure (connection refused, DNS, TLS...).
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Local file access failed (uploads, downloads, token file).
    #[error("File error: {0}")]
    Io(String),
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
