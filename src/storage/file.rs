// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file storage backend.
//!
//! The whole file is a single JSON object of string values. Every write
//! rewrites the file.

use super::Storage;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage persisted to a JSON file on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "storage file is not a JSON object",
            )),
        }
    }

    fn store(&self, entries: &Map<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, body)
    }

    fn update(&self, op: &str, apply: impl FnOnce(&mut Map<String, Value>)) {
        let Ok(_guard) = self.write_lock.lock() else {
            tracing::warn!(
                path = %self.path.display(),
                op,
                "Storage lock poisoned, skipping write"
            );
            return;
        };

        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Unreadable storage file, starting fresh"
                );
                Map::new()
            }
        };

        apply(&mut entries);

        if let Err(e) = self.store(&entries) {
            tracing::warn!(error = %e, path = %self.path.display(), op, "Storage write failed");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(entries) => entries.get(key).and_then(Value::as_str).map(str::to_string),
            Err(e) => {
                tracing::debug!(error = %e, path = %self.path.display(), "Storage unavailable");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        self.update("set", |entries| {
            entries.insert(key.to_string(), Value::String(value.to_string()));
        });
    }

    fn remove(&self, key: &str) {
        self.update("remove", |entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nope.json"));
        assert_eq!(storage.get("drus_token"), None);
    }

    #[test]
    fn test_values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileStorage::new(&path).set("drus_token", "abc");

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("drus_token").as_deref(), Some("abc"));

        reopened.remove("drus_token");
        assert_eq!(FileStorage::new(&path).get("drus_token"), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("drus_token"), None);

        storage.set("drus_token", "fresh");
        assert_eq!(storage.get("drus_token").as_deref(), Some("fresh"));
    }
}
