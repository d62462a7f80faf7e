// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the client.

pub mod platform;
pub mod user;

pub use platform::{PlatformLink, PlatformState, SyncOutcome, SyncStatus};
pub use user::{AuthResponse, SessionState, UserId, UserIdentity};
