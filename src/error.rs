// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! The gateway surfaces these as `Err` values. Platform operations never
//! return them directly; they fold them into an `OperationOutcome`.

use serde::Serialize;

/// Error returned by gateway calls and session operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never reached a server (offline, DNS, connection refused).
    #[error("Network request failed: {0}")]
    Network(String),

    /// The request could not be issued for a reason other than connectivity.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A reachable server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A mock fixture rejected the request (e.g. wrong demo credentials).
    #[error("{0}")]
    Fixture(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    /// A third-party identity credential could not be decoded.
    #[error("Invalid identity credential: {0}")]
    CredentialDecode(String),
}

impl ApiError {
    /// Status code carried by a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses.
    pub fn is_authentication_error(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for 400 responses.
    pub fn is_validation_error(&self) -> bool {
        self.status() == Some(400)
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Tagged result of a platform operation.
///
/// Connect, disconnect and sync report failures through this type instead
/// of returning `Err`, so callers branch on `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl From<ApiError> for OperationOutcome {
    fn from(err: ApiError) -> Self {
        Self::failed(err.to_string())
    }
}

/// Result type alias for gateway and session calls
pub type Result<T> = std::result::Result<T, ApiError>;
