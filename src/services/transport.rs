// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The network seam under the gateway.
//!
//! A `Transport` turns a `PendingRequest` into a status and a raw body. It
//! does not interpret statuses; fallback policy lives in the gateway.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use crate::error::ApiError;

/// Message fragments that mark a failure as "could not reach the server".
const NETWORK_FAILURE_MARKERS: &[&str] = &[
    "Failed to fetch",
    "NetworkError",
    "Connection refused",
    "error sending request",
    "dns error",
];

/// One outgoing request, built per gateway call.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// No server was reached.
    Network,
    /// The request could not be built or sent for some other reason.
    Other,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }

    /// Classify a failure by its message alone.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_network_failure_message(&message) {
            Self::network(message)
        } else {
            Self::other(message)
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == TransportErrorKind::Network
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::Network => ApiError::Network(err.message),
            TransportErrorKind::Other => ApiError::Transport(err.message),
        }
    }
}

pub fn is_network_failure_message(message: &str) -> bool {
    NETWORK_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Issues requests to the API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PendingRequest) -> Result<TransportResponse, TransportError>;
}

/// HTTP transport backed by reqwest.
///
/// No timeout is configured; requests run until the connection resolves.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &PendingRequest) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::other(format!("Failed to read response body: {e}")))?;

        Ok(TransportResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    let message = err.to_string();
    if err.is_builder() {
        return TransportError::other(message);
    }
    if err.is_connect() || err.is_timeout() || err.is_request() {
        return TransportError::network(message);
    }
    TransportError::from_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_classification() {
        assert!(TransportError::from_message("TypeError: Failed to fetch").is_network());
        assert!(
            TransportError::from_message("tcp connect: Connection refused (os error 111)")
                .is_network()
        );
        assert!(
            !TransportError::from_message("builder error: relative URL without a base")
                .is_network()
        );
    }

    #[test]
    fn test_into_api_error_keeps_message() {
        let err: ApiError = TransportError::network("Connection refused").into();
        assert!(err.is_network_error());
        assert_eq!(err.to_string(), "Network request failed: Connection refused");

        let err: ApiError = TransportError::other("bad url").into();
        assert!(matches!(err, ApiError::Transport(ref m) if m == "bad url"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:3000/");
        assert_eq!(transport.base_url(), "http://localhost:3000");
    }
}
