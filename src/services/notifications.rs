// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short-lived user notices (success/error/info/warning).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// How many notices are visible at once.
pub const MAX_VISIBLE: usize = 3;
/// How long a notice stays visible (4 seconds).
const AUTO_HIDE_MILLIS: i64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: u64,
    pub variant: Variant,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Bounded queue of notices.
///
/// The oldest notice is evicted when a fourth arrives, and a message that
/// is already visible with the same variant is not queued again.
#[derive(Debug)]
pub struct Notifier {
    queue: Mutex<VecDeque<Notice>>,
    next_id: AtomicU64,
    auto_hide: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(MAX_VISIBLE)),
            next_id: AtomicU64::new(1),
            auto_hide: Duration::milliseconds(AUTO_HIDE_MILLIS),
        }
    }

    pub fn success(&self, message: impl Into<String>) -> Option<u64> {
        self.push(Variant::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Option<u64> {
        self.push(Variant::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Option<u64> {
        self.push(Variant::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Option<u64> {
        self.push(Variant::Warning, message)
    }

    /// Queue a notice. Returns its id, or `None` if it duplicated a visible one.
    pub fn push(&self, variant: Variant, message: impl Into<String>) -> Option<u64> {
        self.push_at(variant, message, Utc::now())
    }

    fn push_at(
        &self,
        variant: Variant,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        let message = message.into();
        let mut queue = self.lock();
        queue.retain(|n| n.expires_at > now);

        if queue
            .iter()
            .any(|n| n.variant == variant && n.message == message)
        {
            return None;
        }

        if queue.len() == MAX_VISIBLE {
            queue.pop_front();
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, ?variant, message = %message, "Notice queued");
        queue.push_back(Notice {
            id,
            variant,
            message,
            expires_at: now + self.auto_hide,
        });
        Some(id)
    }

    /// Notices still visible, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Utc::now())
    }

    fn active_at(&self, now: DateTime<Utc>) -> Vec<Notice> {
        let mut queue = self.lock();
        queue.retain(|n| n.expires_at > now);
        queue.iter().cloned().collect()
    }

    pub fn dismiss(&self, id: u64) {
        self.lock().retain(|n| n.id != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_most_three_visible_oldest_evicted() {
        let notifier = Notifier::new();
        notifier.info("one");
        notifier.info("two");
        notifier.info("three");
        notifier.info("four");

        let messages: Vec<String> = notifier.active().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three", "four"]);
    }

    #[test]
    fn test_duplicates_are_suppressed_per_variant() {
        let notifier = Notifier::new();
        assert!(notifier.error("Sync failed").is_some());
        assert!(notifier.error("Sync failed").is_none());
        assert!(notifier.warning("Sync failed").is_some());
        assert_eq!(notifier.active().len(), 2);
    }

    #[test]
    fn test_notices_expire_and_can_be_dismissed() {
        let notifier = Notifier::new();
        let now = Utc::now();
        let id = notifier.push_at(Variant::Success, "Connected", now).unwrap();
        notifier.push_at(Variant::Info, "Syncing", now).unwrap();

        notifier.dismiss(id);
        assert_eq!(notifier.active_at(now).len(), 1);

        let later = now + Duration::milliseconds(AUTO_HIDE_MILLIS + 1);
        assert!(notifier.active_at(later).is_empty());

        // Once expired, the same message can be shown again.
        assert!(notifier.push_at(Variant::Info, "Syncing", later).is_some());
    }
}
