// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use drus_client::services::{
    ApiGateway, MockTable, PendingRequest, Transport, TransportError, TransportResponse,
};
use drus_client::storage::CredentialStore;
use reqwest::{Method, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted reply for one `(method, path)`.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply {
    Json(u16, serde_json::Value),
    Raw(u16, String),
    NetworkDown,
    Broken(String),
}

/// Transport that answers from a script and records every request.
///
/// Unscripted requests behave as if the server were unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<PendingRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(self: &Arc<Self>, method: Method, path: &str, reply: Reply) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
        self.clone()
    }

    pub fn requests(&self) -> Vec<PendingRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> PendingRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PendingRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(request.method.clone(), request.path.clone()))
            .cloned()
            .unwrap_or(Reply::NetworkDown);

        match reply {
            Reply::Json(status, body) => Ok(TransportResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body.to_string(),
            )),
            Reply::Raw(status, body) => Ok(TransportResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body,
            )),
            Reply::NetworkDown => Err(TransportError::network(
                "error sending request: tcp connect error: Connection refused (os error 111)",
            )),
            Reply::Broken(message) => Err(TransportError::other(message)),
        }
    }
}

/// Gateway over `transport` with the built-in fixtures (no latency).
#[allow(dead_code)]
pub fn gateway_with_mocks(transport: Arc<ScriptedTransport>) -> ApiGateway {
    ApiGateway::new(
        transport,
        CredentialStore::in_memory(),
        MockTable::builtin(Duration::ZERO),
    )
}

/// Gateway over `transport` with no fixtures at all.
#[allow(dead_code)]
pub fn gateway_without_mocks(transport: Arc<ScriptedTransport>) -> ApiGateway {
    ApiGateway::new(transport, CredentialStore::in_memory(), MockTable::empty())
}
