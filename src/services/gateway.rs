// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The single entry point for API calls.
//!
//! Handles:
//! - Bearer token and JSON content-type headers
//! - Mock substitution when the server is unreachable or returns an error
//! - Error messages from non-2xx bodies
//!
//! There are no retries and no timeouts at this layer.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::services::mock::MockTable;
use crate::services::transport::{HttpTransport, PendingRequest, Transport, TransportResponse};
use crate::storage::CredentialStore;

/// Per-call options. Defaults to a GET with no extra headers and no body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    /// Pre-serialized JSON body
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options carrying `payload` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(method: Method, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request body: {e}")))?;
        Ok(Self {
            method,
            headers: HeaderMap::new(),
            body: Some(body),
        })
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// How a gateway call was resolved.
#[derive(Debug, Clone)]
pub enum NetworkResult {
    /// The server answered with 2xx.
    Ok(Value),
    /// The server was unreachable or errored and a mock answered instead.
    MockFallback(Value),
    Failed(ApiError),
}

impl NetworkResult {
    pub fn into_result(self) -> Result<Value> {
        match self {
            NetworkResult::Ok(value) | NetworkResult::MockFallback(value) => Ok(value),
            NetworkResult::Failed(err) => Err(err),
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, NetworkResult::MockFallback(_))
    }
}

/// API gateway shared by the session and platform containers.
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
    mocks: Arc<MockTable>,
}

impl ApiGateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: CredentialStore,
        mocks: MockTable,
    ) -> Self {
        Self {
            transport,
            credentials,
            mocks: Arc::new(mocks),
        }
    }

    /// Gateway using HTTP against `config.api_base`.
    pub fn from_config(config: &Config, credentials: CredentialStore) -> Self {
        let mocks = if config.mock_fallback {
            MockTable::builtin(config.mock_latency)
        } else {
            MockTable::empty()
        };
        Self::new(
            Arc::new(HttpTransport::new(config.api_base.clone())),
            credentials,
            mocks,
        )
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn mocks(&self) -> &MockTable {
        &self.mocks
    }

    /// Issue a request and resolve it to JSON.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.execute(path, options).await.into_result()
    }

    /// Like `fetch`, deserializing the resolved JSON into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.fetch(path, options).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("{path}: {e}")))
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.fetch(path, RequestOptions::get()).await
    }

    pub async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<Value> {
        self.fetch(path, RequestOptions::json(method, payload)?).await
    }

    /// Issue a request and report which of the three outcomes occurred.
    pub async fn execute(&self, path: &str, options: RequestOptions) -> NetworkResult {
        let request = match self.build_request(path, options) {
            Ok(request) => request,
            Err(err) => return NetworkResult::Failed(err),
        };

        match self.transport.send(&request).await {
            Ok(response) if response.status.is_success() => decode_success(path, response),
            Ok(response) => self.handle_error_status(&request, response).await,
            Err(err) if err.is_network() => {
                tracing::info!(path, error = %err, "Network unavailable, trying mock response");
                match self.mock_response(&request).await {
                    Some(result) => result,
                    None => NetworkResult::Failed(err.into()),
                }
            }
            Err(err) => NetworkResult::Failed(err.into()),
        }
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> Result<PendingRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(token) = self.credentials.get_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ApiError::Transport("Stored token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(PendingRequest {
            path: path.to_string(),
            method: options.method,
            headers,
            body: options.body,
        })
    }

    async fn handle_error_status(
        &self,
        request: &PendingRequest,
        response: TransportResponse,
    ) -> NetworkResult {
        let status = response.status.as_u16();
        tracing::warn!(
            status,
            path = %request.path,
            "Server responded with an error, trying mock response"
        );

        if let Some(result) = self.mock_response(request).await {
            return result;
        }

        let body: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
        NetworkResult::Failed(ApiError::Status {
            status,
            message: error_message(&body, status),
        })
    }

    /// Run the matching mock route, or `None` when nothing matches.
    async fn mock_response(&self, request: &PendingRequest) -> Option<NetworkResult> {
        let route = self.mocks.lookup(&request.path)?;
        tracing::debug!(path = %request.path, "Using mock response");

        let result = route
            .produce(&request.path, &request.method, request.body.as_deref())
            .await;
        Some(match result {
            Ok(value) => NetworkResult::MockFallback(value),
            Err(err) => NetworkResult::Failed(err),
        })
    }
}

fn decode_success(path: &str, response: TransportResponse) -> NetworkResult {
    if response.body.trim().is_empty() {
        return NetworkResult::Ok(Value::Null);
    }
    match serde_json::from_str(&response.body) {
        Ok(value) => NetworkResult::Ok(value),
        Err(e) => NetworkResult::Failed(ApiError::InvalidResponse(format!("{path}: {e}"))),
    }
}

/// The server's `message` (or `error`) string, else a status-coded fallback.
fn error_message(body: &Value, status: u16) -> String {
    ["message", "error"]
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_message_then_error() {
        let body = json!({
            "error": "Invalid credentials",
            "message": "Email or password is incorrect"
        });
        assert_eq!(error_message(&body, 401), "Email or password is incorrect");

        let body = json!({ "error": "Platform and username required" });
        assert_eq!(error_message(&body, 400), "Platform and username required");

        assert_eq!(error_message(&json!({}), 502), "Request failed with status 502");
        assert_eq!(
            error_message(&json!({ "message": "" }), 500),
            "Request failed with status 500"
        );
    }

    #[test]
    fn test_options_json_serializes_body() {
        let options =
            RequestOptions::json(Method::PUT, &json!({ "platform": "leetcode" })).unwrap();
        assert_eq!(options.method, Method::PUT);
        assert_eq!(options.body.as_deref(), Some(r#"{"platform":"leetcode"}"#));
    }

    #[test]
    fn test_default_options_are_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
    }
}
