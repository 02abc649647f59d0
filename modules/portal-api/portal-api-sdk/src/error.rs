//! Error types for the portal API.

use thiserror::Error;

/// Errors returned by a [`PortalApiClient`](crate::PortalApiClient).
///
/// `Display` renders the user-facing message only; the status is available
/// through [`ApiError::status`] so callers can branch on 401 / 409.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The backend answered with success but broke the response contract.
    #[error("{message}")]
    InvalidResponse { status: u16, message: String },

    /// The request was rejected locally and never sent.
    #[error("{message}")]
    Validation { message: String },

    /// No response was received.
    #[error("network error: {message}")]
    Transport { message: String },
}

impl ApiError {
    #[must_use]
    pub fn status_error(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_response(status: u16, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Login rejected by the backend (HTTP 401).
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::status_error(401, "Invalid email or password")
    }

    #[must_use]
    pub fn login_failed(status: u16) -> Self {
        Self::status_error(status, "Login failed")
    }

    /// Login succeeded but the body held no token.
    #[must_use]
    pub fn empty_token() -> Self {
        Self::invalid_response(500, "Empty token received from server")
    }

    /// Registration conflict (HTTP 409).
    #[must_use]
    pub fn email_taken() -> Self {
        Self::status_error(409, "Email already registered")
    }

    #[must_use]
    pub fn registration_failed(status: u16) -> Self {
        Self::status_error(status, "Registration failed")
    }

    /// Auth-test call rejected the bearer token (HTTP 401).
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::status_error(401, "Unauthorized")
    }

    #[must_use]
    pub fn auth_test_failed(status: u16) -> Self {
        Self::status_error(status, "Authentication test failed")
    }

    #[must_use]
    pub fn request_failed(status: u16) -> Self {
        Self::status_error(status, "Request failed")
    }

    /// HTTP status associated with the error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::InvalidResponse { status, .. } => Some(*status),
            Self::Validation { .. } | Self::Transport { .. } => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. }
            | Self::InvalidResponse { message, .. }
            | Self::Validation { message }
            | Self::Transport { message } => message,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}
