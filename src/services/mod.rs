// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - gateway, fixtures and state containers.

pub mod gateway;
pub mod google_identity;
pub mod mock;
pub mod notifications;
pub mod platforms;
pub mod session;
pub mod transport;

pub use gateway::{ApiGateway, NetworkResult, RequestOptions};
pub use mock::{MockResponse, MockRoute, MockTable, RouteMatcher};
pub use notifications::{Notice, Notifier, Variant};
pub use platforms::PlatformLinks;
pub use session::Session;
pub use transport::{
    HttpTransport, PendingRequest, Transport, TransportError, TransportErrorKind,
    TransportResponse,
};
