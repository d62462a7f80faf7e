// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth token storage under the primary and legacy keys.

use super::{keys, MemoryStorage, Storage};
use std::sync::Arc;

/// Reads and writes the session token.
///
/// Both keys always hold the same value: writes set both, clears remove
/// both. Reads prefer the primary key.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Credential store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Current token, if any. Empty values count as absent.
    pub fn get_token(&self) -> Option<String> {
        self.storage
            .get(keys::TOKEN)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.storage
                    .get(keys::LEGACY_TOKEN)
                    .filter(|t| !t.is_empty())
            })
    }

    /// Store `token` under both keys, or clear both when absent/empty.
    pub fn set_token(&self, token: Option<&str>) {
        match token {
            Some(token) if !token.is_empty() => {
                self.storage.set(keys::TOKEN, token);
                self.storage.set(keys::LEGACY_TOKEN, token);
            }
            _ => self.clear_token(),
        }
    }

    pub fn clear_token(&self) {
        self.storage.remove(keys::TOKEN);
        self.storage.remove(keys::LEGACY_TOKEN);
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_token", &self.get_token().is_some())
            .finish()
    }
}
