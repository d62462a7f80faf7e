// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform linkage container.
//!
//! Connect, disconnect and sync report failure through `OperationOutcome`
//! instead of `Err`. Lookups that mirror a single gateway call
//! (`lookup_platform_stats`, `fetch_analytics`) keep the gateway's
//! `Result` contract.
//!
//! A live connect or disconnect replaces the mapping with the server's.
//! A fixture answer only describes the affected platform, so it is applied
//! to that platform alone.

use chrono::Utc;
use futures_util::future::join_all;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::catalog;
use crate::error::{OperationOutcome, Result};
use crate::models::platform::platforms_from_value;
use crate::models::{PlatformLink, PlatformState, SyncOutcome, SyncStatus};
use crate::services::gateway::{ApiGateway, NetworkResult, RequestOptions};

pub struct PlatformLinks {
    gateway: ApiGateway,
    state: RwLock<PlatformState>,
}

impl PlatformLinks {
    /// Create an empty container in the loading state.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            state: RwLock::new(PlatformState {
                loading: true,
                ..Default::default()
            }),
        }
    }

    /// Create a container and load the linked platforms and stats.
    pub async fn initialize(gateway: ApiGateway) -> Self {
        let links = Self::new(gateway);
        tokio::join!(links.refresh_platforms(), links.refresh_stats());
        links
    }

    /// Reload the platform mapping from the profile. Failures are logged
    /// and leave the mapping as it was.
    pub async fn refresh_platforms(&self) {
        self.state.write().await.loading = true;

        match self.gateway.get("/api/profiles/me").await {
            Ok(profile) => {
                let platforms = platforms_from_value(profile.get("platforms"));
                tracing::debug!(count = platforms.len(), "Platforms loaded");
                self.state.write().await.platforms = platforms;
            }
            Err(e) => tracing::error!(error = %e, "Failed to fetch platforms"),
        }

        self.state.write().await.loading = false;
    }

    /// Reload the aggregate stats. Failures are logged only.
    pub async fn refresh_stats(&self) {
        match self.gateway.get("/api/profiles/me/stats").await {
            Ok(Value::Object(stats)) => self.state.write().await.platform_stats = stats,
            Ok(_) => self.state.write().await.platform_stats.clear(),
            Err(e) => tracing::error!(error = %e, "Failed to fetch platform stats"),
        }
    }

    pub async fn snapshot(&self) -> PlatformState {
        self.state.read().await.clone()
    }

    pub async fn platform(&self, platform_id: &str) -> Option<PlatformLink> {
        self.state.read().await.platforms.get(platform_id).cloned()
    }

    pub async fn sync_status(&self, platform_id: &str) -> SyncStatus {
        self.state.read().await.status_of(platform_id)
    }

    /// Link `username` on `platform_id`.
    pub async fn connect_platform(&self, platform_id: &str, username: &str) -> OperationOutcome {
        let username = catalog::extract_platform_username(username, platform_id);
        if platform_id.trim().is_empty() || username.is_empty() {
            return OperationOutcome::failed("Platform and username required");
        }

        let options = match RequestOptions::json(
            Method::PUT,
            &json!({ "platform": platform_id, "username": username }),
        ) {
            Ok(options) => options,
            Err(e) => return e.into(),
        };

        let result = self.gateway.execute("/api/profiles/platform", options).await;
        let (data, live) = match result {
            NetworkResult::Ok(data) => (data, true),
            NetworkResult::MockFallback(data) => (data, false),
            NetworkResult::Failed(e) => {
                tracing::warn!(platform_id, error = %e, "Failed to connect platform");
                return e.into();
            }
        };

        let mut platforms = platforms_from_value(data.get("platforms"));
        let mut state = self.state.write().await;
        if live {
            state.platforms = platforms;
        } else {
            let link = platforms.remove(platform_id).unwrap_or_else(|| {
                PlatformLink::from_entry(platform_id, &Value::String(username.clone()))
            });
            state.platforms.insert(platform_id.to_string(), link);
        }
        state.last_synced.insert(platform_id.to_string(), Utc::now());
        tracing::info!(platform_id, username = %username, live, "Platform connected");
        OperationOutcome::ok()
    }

    /// Unlink `platform_id` and drop its cached stats.
    pub async fn disconnect_platform(&self, platform_id: &str) -> OperationOutcome {
        let path = format!("/api/profiles/platform/{}", urlencoding::encode(platform_id));

        let result = self
            .gateway
            .execute(&path, RequestOptions::method(Method::DELETE))
            .await;
        let mut state = self.state.write().await;
        match result {
            NetworkResult::Ok(data) => {
                state.platforms = platforms_from_value(data.get("platforms"));
            }
            NetworkResult::MockFallback(_) => {
                state.platforms.remove(platform_id);
            }
            NetworkResult::Failed(e) => {
                tracing::warn!(platform_id, error = %e, "Failed to disconnect platform");
                return e.into();
            }
        }
        state.platform_stats.remove(platform_id);
        tracing::info!(platform_id, "Platform disconnected");
        OperationOutcome::ok()
    }

    /// Pull fresh stats for one platform. No retry on failure.
    pub async fn sync_platform(&self, platform_id: &str) -> OperationOutcome {
        self.set_status(platform_id, SyncStatus::Syncing).await;

        let path = format!("/api/profiles/sync/{}", urlencoding::encode(platform_id));
        match self
            .gateway
            .fetch(&path, RequestOptions::method(Method::POST))
            .await
        {
            Ok(data) => {
                let mut state = self.state.write().await;
                let entry = state
                    .platform_stats
                    .entry(platform_id.to_string())
                    .or_insert(Value::Null);
                merge_stats(entry, data);
                state.last_synced.insert(platform_id.to_string(), Utc::now());
                state
                    .sync_status
                    .insert(platform_id.to_string(), SyncStatus::Success);
                OperationOutcome::ok()
            }
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "Platform sync failed");
                self.set_status(platform_id, SyncStatus::Error).await;
                e.into()
            }
        }
    }

    /// Sync every connected platform concurrently.
    ///
    /// Waits for all of them; one failure does not stop the others, and
    /// every platform gets exactly one outcome.
    pub async fn sync_all_platforms(&self) -> Vec<SyncOutcome> {
        let ids = self.state.read().await.connected_ids();
        tracing::info!(count = ids.len(), "Syncing all platforms");

        join_all(ids.into_iter().map(|platform_id| async move {
            let outcome = self.sync_platform(&platform_id).await;
            SyncOutcome {
                platform_id,
                outcome,
            }
        }))
        .await
    }

    /// Look up a user's public stats on a platform.
    pub async fn lookup_platform_stats(&self, platform_id: &str, username: &str) -> Result<Value> {
        let username = catalog::extract_platform_username(username, platform_id);
        let path = format!(
            "/api/platforms/{}/{}",
            urlencoding::encode(platform_id),
            urlencoding::encode(&username)
        );
        self.gateway.get(&path).await
    }

    /// Dashboard analytics for the signed-in user.
    pub async fn fetch_analytics(&self) -> Result<Value> {
        self.gateway.get("/api/analytics").await
    }

    async fn set_status(&self, platform_id: &str, status: SyncStatus) {
        self.state
            .write()
            .await
            .sync_status
            .insert(platform_id.to_string(), status);
    }
}

/// Overlay `fresh` onto `cached`. Objects merge field by field; anything
/// else replaces the cached value.
fn merge_stats(cached: &mut Value, fresh: Value) {
    match (cached, fresh) {
        (Value::Object(cached), Value::Object(fresh)) => cached.extend(fresh),
        (cached, fresh) => *cached = fresh,
    }
}
