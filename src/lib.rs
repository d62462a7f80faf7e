// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DRUS client: account, platform and stats access for the DRUS dashboard.
//!
//! Every API call goes through one gateway that falls back to local
//! fixtures when the server cannot answer, so the client keeps working
//! against a missing or half-built backend.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use services::{ApiGateway, Notifier, PlatformLinks, Session};
use std::sync::Arc;
use storage::{CredentialStore, FileStorage, MemoryStorage, Storage};

/// Shared client state.
pub struct DrusClient {
    pub config: Config,
    pub gateway: ApiGateway,
    pub session: Session,
    pub platforms: PlatformLinks,
    pub notifications: Notifier,
}

impl DrusClient {
    /// Build the client from configuration, restore the session and load
    /// the linked platforms.
    pub async fn initialize(config: Config) -> Self {
        let storage: Arc<dyn Storage> = match &config.credentials_path {
            Some(path) => Arc::new(FileStorage::new(path.clone())),
            None => Arc::new(MemoryStorage::new()),
        };
        let gateway = ApiGateway::from_config(&config, CredentialStore::new(storage));
        Self::with_gateway(config, gateway).await
    }

    /// Build the client around an existing gateway.
    pub async fn with_gateway(config: Config, gateway: ApiGateway) -> Self {
        let session = Session::initialize(gateway.clone()).await;
        let platforms = PlatformLinks::initialize(gateway.clone()).await;

        Self {
            config,
            gateway,
            session,
            platforms,
            notifications: Notifier::new(),
        }
    }
}
