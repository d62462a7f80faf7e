// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linked coding-platform accounts and their sync bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::OperationOutcome;

/// A user's account on one external platform.
///
/// `stats` is whatever the API attached to the entry; it is never
/// interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformLink {
    pub platform_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Map<String, Value>>,
}

impl PlatformLink {
    /// Build a link from one entry of the API's `platforms` object.
    ///
    /// Entries are either a bare username string or an object with a
    /// `username` field; the remaining object fields become `stats`.
    pub fn from_entry(platform_id: &str, entry: &Value) -> Self {
        match entry {
            Value::String(username) => Self {
                platform_id: platform_id.to_string(),
                username: username.clone(),
                stats: None,
            },
            Value::Object(fields) => {
                let mut stats = fields.clone();
                let username = match stats.remove("username") {
                    Some(Value::String(u)) => u,
                    _ => String::new(),
                };
                Self {
                    platform_id: platform_id.to_string(),
                    username,
                    stats: (!stats.is_empty()).then_some(stats),
                }
            }
            _ => Self {
                platform_id: platform_id.to_string(),
                username: String::new(),
                stats: None,
            },
        }
    }

    /// A platform is connected iff it has a non-empty username.
    pub fn is_connected(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Parse the API's `platforms` object into links keyed by platform id.
///
/// Anything other than an object yields an empty mapping.
pub fn platforms_from_value(value: Option<&Value>) -> HashMap<String, PlatformLink> {
    match value {
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(id, entry)| (id.clone(), PlatformLink::from_entry(id, entry)))
            .collect(),
        _ => HashMap::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

/// Snapshot of the platform container.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformState {
    pub platforms: HashMap<String, PlatformLink>,
    /// Aggregate stats object; synced platforms get an entry under their id
    pub platform_stats: Map<String, Value>,
    pub sync_status: HashMap<String, SyncStatus>,
    pub last_synced: HashMap<String, DateTime<Utc>>,
    pub loading: bool,
}

impl PlatformState {
    /// Ids of all connected platforms, sorted for stable output.
    pub fn connected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .platforms
            .values()
            .filter(|link| link.is_connected())
            .map(|link| link.platform_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn status_of(&self, platform_id: &str) -> SyncStatus {
        self.sync_status
            .get(platform_id)
            .copied()
            .unwrap_or_default()
    }
}

/// Per-platform result of a bulk sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub platform_id: String,
    #[serde(flatten)]
    pub outcome: OperationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_entry_splits_username_from_stats() {
        let link = PlatformLink::from_entry(
            "leetcode",
            &json!({ "username": "alice", "rating": 1850, "rank": 15234 }),
        );
        assert_eq!(link.username, "alice");
        assert!(link.is_connected());
        let stats = link.stats.unwrap();
        assert_eq!(stats.get("rating"), Some(&json!(1850)));
        assert!(!stats.contains_key("username"));
    }

    #[test]
    fn test_string_entry_is_username() {
        let link = PlatformLink::from_entry("codeforces", &json!("gc_master"));
        assert_eq!(link.username, "gc_master");
        assert!(link.stats.is_none());
    }

    #[test]
    fn test_empty_or_null_entry_is_not_connected() {
        assert!(!PlatformLink::from_entry("atcoder", &json!("")).is_connected());
        assert!(!PlatformLink::from_entry("atcoder", &Value::Null).is_connected());
        assert!(!PlatformLink::from_entry("atcoder", &json!({ "rating": 1 })).is_connected());
    }

    #[test]
    fn test_connected_ids_skips_unlinked_entries() {
        let platforms = platforms_from_value(Some(&json!({
            "leetcode": { "username": "alice" },
            "hackerrank": "",
            "codeforces": "bob"
        })));
        let state = PlatformState {
            platforms,
            ..Default::default()
        };
        assert_eq!(state.connected_ids(), vec!["codeforces", "leetcode"]);
        assert_eq!(state.status_of("leetcode"), SyncStatus::Idle);
    }
}
