// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key/value storage for client-side state.
//!
//! Storage is best-effort: a backend that cannot be read reports every key
//! as absent, and failed writes are logged and dropped.

pub mod credentials;
pub mod file;

pub use credentials::CredentialStore;
pub use file::FileStorage;

use dashmap::DashMap;

/// Key names as constants.
pub mod keys {
    /// Primary token key.
    pub const TOKEN: &str = "drus_token";
    /// Older key name, kept in sync for backward compatibility.
    pub const LEGACY_TOKEN: &str = "token";
}

/// A string key/value store.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
