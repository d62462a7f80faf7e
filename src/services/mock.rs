// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixture-backed responses used when the API cannot answer.
//!
//! Routes are an ordered list of `(matcher, producer)` pairs. Lookup tries
//! every exact path first, then the pattern routes in registration order;
//! the first match wins.

use reqwest::Method;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::time_utils::{format_utc_rfc3339, now_millis};

/// Demo account accepted by the login fixture.
pub const DEMO_EMAIL: &str = "demo@drus.com";
pub const DEMO_PASSWORD: &str = "Demo123!";

type Producer = dyn Fn(Option<Value>) -> Result<Value, ApiError> + Send + Sync;

/// How a route decides whether it handles a path.
#[derive(Clone)]
pub enum RouteMatcher {
    Exact(String),
    /// Paths starting with `prefix` that split into exactly `segments`
    /// `/`-separated parts (the leading empty part included).
    Pattern {
        prefix: String,
        segments: usize,
        params: fn(&[&str]) -> Value,
    },
}

impl RouteMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            RouteMatcher::Exact(exact) => exact == path,
            RouteMatcher::Pattern {
                prefix, segments, ..
            } => path.starts_with(prefix.as_str()) && path.split('/').count() == *segments,
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, RouteMatcher::Exact(_))
    }
}

impl fmt::Debug for RouteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMatcher::Exact(path) => f.debug_tuple("Exact").field(path).finish(),
            RouteMatcher::Pattern {
                prefix, segments, ..
            } => f
                .debug_struct("Pattern")
                .field("prefix", prefix)
                .field("segments", segments)
                .finish(),
        }
    }
}

/// What a route answers with.
#[derive(Clone)]
pub enum MockResponse {
    Static(Value),
    Dynamic(Arc<Producer>),
}

impl MockResponse {
    pub fn dynamic<F>(producer: F) -> Self
    where
        F: Fn(Option<Value>) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        MockResponse::Dynamic(Arc::new(producer))
    }
}

/// One entry of the table.
#[derive(Clone)]
pub struct MockRoute {
    pub matcher: RouteMatcher,
    pub response: MockResponse,
    /// Simulated network latency awaited before producing.
    pub latency: Duration,
}

impl MockRoute {
    /// Produce this route's payload for a request.
    ///
    /// Dynamic producers get the parsed body for POST/PUT requests that
    /// carry one; otherwise they get arguments synthesized from the path
    /// (pattern routes) or nothing.
    pub async fn produce(
        &self,
        path: &str,
        method: &Method,
        body: Option<&str>,
    ) -> Result<Value, ApiError> {
        let producer = match &self.response {
            MockResponse::Static(value) => return Ok(value.clone()),
            MockResponse::Dynamic(producer) => producer,
        };

        let args = match body {
            Some(body) if *method == Method::POST || *method == Method::PUT => {
                Some(serde_json::from_str(body).map_err(|e| {
                    ApiError::Fixture(format!("Invalid JSON request body: {e}"))
                })?)
            }
            _ => match &self.matcher {
                RouteMatcher::Pattern { params, .. } => {
                    let parts: Vec<&str> = path.split('/').collect();
                    Some(params(&parts))
                }
                RouteMatcher::Exact(_) => None,
            },
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        producer(args)
    }
}

impl fmt::Debug for MockRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRoute")
            .field("matcher", &self.matcher)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

/// Ordered set of mock routes.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    routes: Vec<MockRoute>,
}

impl MockTable {
    /// A table with no routes; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn exact(mut self, path: impl Into<String>, response: MockResponse) -> Self {
        self.routes.push(MockRoute {
            matcher: RouteMatcher::Exact(path.into()),
            response,
            latency: Duration::ZERO,
        });
        self
    }

    pub fn pattern(
        mut self,
        prefix: impl Into<String>,
        segments: usize,
        params: fn(&[&str]) -> Value,
        response: MockResponse,
    ) -> Self {
        self.routes.push(MockRoute {
            matcher: RouteMatcher::Pattern {
                prefix: prefix.into(),
                segments,
                params,
            },
            response,
            latency: Duration::ZERO,
        });
        self
    }

    /// Set the latency of the most recently added route.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.latency = latency;
        }
        self
    }

    /// Find the route for `path`: exact matches first, then patterns.
    pub fn lookup(&self, path: &str) -> Option<&MockRoute> {
        self.routes
            .iter()
            .filter(|r| r.matcher.is_exact())
            .chain(self.routes.iter().filter(|r| !r.matcher.is_exact()))
            .find(|r| r.matcher.matches(path))
    }

    /// The fixtures mirroring the DRUS API.
    ///
    /// `latency` applies to the routes that simulate slow upstream
    /// platform lookups.
    pub fn builtin(latency: Duration) -> Self {
        Self::empty()
            .exact("/api/auth/login", MockResponse::dynamic(login))
            .exact("/api/auth/register", MockResponse::dynamic(register))
            .exact("/api/auth/google", MockResponse::dynamic(google_login))
            .exact("/api/auth/verify-email", MockResponse::dynamic(verify_email))
            .exact("/api/profiles/me", MockResponse::Static(demo_profile()))
            .exact("/api/profiles/me/stats", MockResponse::Static(profile_stats()))
            .exact("/api/analytics", MockResponse::Static(analytics()))
            .exact("/api/profiles/platform", MockResponse::dynamic(update_platform))
            .exact("/api/platforms/fetch", MockResponse::dynamic(platform_stats))
            .with_latency(latency)
            .pattern(
                "/api/platforms/",
                5,
                platform_and_username,
                MockResponse::dynamic(platform_stats),
            )
            .with_latency(latency)
            .pattern(
                "/api/profiles/platform/",
                5,
                platform_only,
                MockResponse::dynamic(remove_platform),
            )
            .pattern(
                "/api/profiles/sync/",
                5,
                platform_only,
                MockResponse::dynamic(sync_platform),
            )
            .with_latency(latency)
    }
}

// ─── Path parameter synthesis ────────────────────────────────────────────────

fn segment(parts: &[&str], index: usize) -> String {
    let raw = parts.get(index).copied().unwrap_or_default();
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// `/api/platforms/{platformId}/{username}`
fn platform_and_username(parts: &[&str]) -> Value {
    json!({ "platformId": segment(parts, 3), "username": segment(parts, 4) })
}

/// `/api/profiles/{platform|sync}/{platformId}`
fn platform_only(parts: &[&str]) -> Value {
    json!({ "platformId": segment(parts, 4) })
}

// ─── Producers ───────────────────────────────────────────────────────────────

fn str_field<'a>(args: &'a Option<Value>, field: &str) -> Option<&'a str> {
    args.as_ref()?.get(field)?.as_str()
}

fn require_args(args: &Option<Value>) -> Result<(), ApiError> {
    match args {
        Some(Value::Object(_)) => Ok(()),
        _ => Err(ApiError::Fixture("Request body required".to_string())),
    }
}

fn login(args: Option<Value>) -> Result<Value, ApiError> {
    require_args(&args)?;
    let email = str_field(&args, "email");
    let password = str_field(&args, "password");
    tracing::debug!(email = email.unwrap_or("<missing>"), "Mock login attempt");

    if email == Some(DEMO_EMAIL) && password == Some(DEMO_PASSWORD) {
        return Ok(json!({
            "token": format!("mock-jwt-token-{}", now_millis()),
            "user": { "id": 1, "email": DEMO_EMAIL, "name": "Demo User" }
        }));
    }

    Err(ApiError::Fixture("Invalid credentials".to_string()))
}

fn register(args: Option<Value>) -> Result<Value, ApiError> {
    require_args(&args)?;
    let now = now_millis();
    Ok(json!({
        "token": format!("mock-jwt-token-{now}"),
        "user": {
            "id": now,
            "email": str_field(&args, "email"),
            "name": str_field(&args, "name"),
        }
    }))
}

fn google_login(args: Option<Value>) -> Result<Value, ApiError> {
    require_args(&args)?;
    let now = now_millis();
    Ok(json!({
        "token": format!("mock-jwt-token-google-{now}"),
        "user": {
            "id": format!("google_{now}"),
            "email": str_field(&args, "email").unwrap_or("google_user@gmail.com"),
            "name": str_field(&args, "name").unwrap_or("Google User"),
            "avatarUrl": str_field(&args, "picture")
                .unwrap_or("https://lh3.googleusercontent.com/a/default-user"),
        }
    }))
}

fn verify_email(args: Option<Value>) -> Result<Value, ApiError> {
    match str_field(&args, "token") {
        Some(token) if !token.is_empty() => {
            Ok(json!({ "message": "Email verified successfully." }))
        }
        _ => Err(ApiError::Fixture("Invalid or expired token.".to_string())),
    }
}

fn demo_profile() -> Value {
    json!({
        "id": 1,
        "email": DEMO_EMAIL,
        "name": "Demo User",
        "bio": "This is a mock user profile for development.",
        "avatarUrl": "https://i.pravatar.cc/150?u=demo@drus.com"
    })
}

fn profile_stats() -> Value {
    json!({
        "totalSolved": 120,
        "totalContests": 5,
        "streak": 3,
        "languages": [
            { "name": "JavaScript", "count": 50 },
            { "name": "Python", "count": 40 },
            { "name": "Java", "count": 30 }
        ]
    })
}

fn analytics() -> Value {
    json!({
        "totalSolved": 125,
        "totalContests": 12,
        "streak": 5,
        "languages": [
            { "name": "JavaScript", "count": 45 },
            { "name": "Python", "count": 30 },
            { "name": "Java", "count": 25 },
            { "name": "C++", "count": 25 }
        ],
        "platforms": [
            { "name": "LeetCode", "solved": 450, "color": "#FFA116" },
            { "name": "HackerRank", "solved": 320, "color": "#00EA64" }
        ],
        "recentActivity": [
            { "date": "2023-10-01", "count": 5 },
            { "date": "2023-10-02", "count": 3 },
            { "date": "2023-10-03", "count": 8 },
            { "date": "2023-10-04", "count": 2 },
            { "date": "2023-10-05", "count": 6 }
        ]
    })
}

/// Stats derived from the username length so repeated lookups agree.
fn generated_stats(username: &str) -> Value {
    let seed = username.chars().count() as u64;
    json!({
        "total": 100 + seed * 10,
        "easy": 50 + seed * 5,
        "medium": 30 + seed * 3,
        "hard": 20 + seed * 2,
        "rank": group_thousands(seed * 1000),
        "rating": 1200 + seed * 50,
        "streak": seed * 2,
        "contests": seed * 5
    })
}

fn platform_stats(args: Option<Value>) -> Result<Value, ApiError> {
    require_args(&args)?;
    let platform_id = str_field(&args, "platformId").unwrap_or_default();
    let username = str_field(&args, "username").unwrap_or_default();
    tracing::debug!(platform_id, username, "Mock platform stats");

    Ok(json!({
        "username": username,
        "platformId": platform_id,
        "stats": generated_stats(username),
        "lastSynced": format_utc_rfc3339(chrono::Utc::now()),
    }))
}

/// Answers for the connected platform only; the container merges it into
/// the links it already holds.
fn update_platform(args: Option<Value>) -> Result<Value, ApiError> {
    let platform = str_field(&args, "platform").unwrap_or_default();
    let username = str_field(&args, "username").unwrap_or_default();
    if platform.is_empty() || username.is_empty() {
        return Err(ApiError::Fixture(
            "Platform and username required".to_string(),
        ));
    }

    let mut entry = generated_stats(username);
    entry["username"] = json!(username);
    entry["lastActive"] = json!(chrono::Utc::now().format("%Y-%m-%d").to_string());

    Ok(json!({
        "message": "Platform updated",
        "platforms": { platform: entry }
    }))
}

/// Fixtures don't track links, so `platforms` is empty. The container only
/// drops the removed id.
fn remove_platform(args: Option<Value>) -> Result<Value, ApiError> {
    Ok(json!({
        "message": "Platform disconnected",
        "platformId": str_field(&args, "platformId"),
        "platforms": {}
    }))
}

/// The sync route carries no username, so stats are seeded from the
/// platform id: every account on a platform syncs to the same numbers.
fn sync_platform(args: Option<Value>) -> Result<Value, ApiError> {
    let platform_id = str_field(&args, "platformId").unwrap_or_default();
    let mut stats = generated_stats(platform_id);
    stats["platformId"] = json!(platform_id);
    stats["lastSynced"] = json!(format_utc_rfc3339(chrono::Utc::now()));
    Ok(stats)
}

/// Format with `,` thousands separators (`15000` -> `"15,000"`).
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MockTable {
        MockTable::builtin(Duration::ZERO)
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(5000), "5,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_lookup_misses_unknown_paths() {
        let table = table();
        assert!(table.lookup("/api/unknown").is_none());
        // Wrong segment count for the platform pattern.
        assert!(table.lookup("/api/platforms/leetcode").is_none());
        assert!(table.lookup("/api/platforms/leetcode/alice/extra").is_none());
    }

    #[test]
    fn test_exact_route_beats_pattern_registered_earlier() {
        let table = MockTable::empty()
            .pattern(
                "/api/platforms/",
                5,
                platform_and_username,
                MockResponse::Static(json!("pattern")),
            )
            .exact("/api/platforms/x/y", MockResponse::Static(json!("exact")));

        let route = table.lookup("/api/platforms/x/y").unwrap();
        assert!(matches!(&route.response, MockResponse::Static(v) if v == "exact"));
    }

    #[tokio::test]
    async fn test_pattern_route_synthesizes_path_params() {
        let path = "/api/platforms/leetcode/alice";
        let binding = table();
        let route = binding.lookup(path).expect("pattern should match");
        let value = route.produce(path, &Method::GET, None).await.unwrap();

        assert_eq!(value["platformId"], "leetcode");
        assert_eq!(value["username"], "alice");
        assert_eq!(value["stats"]["total"], 150);
        assert_eq!(value["stats"]["rank"], "5,000");
    }

    #[tokio::test]
    async fn test_body_wins_over_path_params_for_post() {
        let path = "/api/platforms/fetch";
        let binding = table();
        let route = binding.lookup(path).unwrap();
        let body = r#"{"platformId":"codeforces","username":"bob"}"#;
        let value = route.produce(path, &Method::POST, Some(body)).await.unwrap();

        assert_eq!(value["platformId"], "codeforces");
        assert_eq!(value["stats"]["rating"], 1350);
    }

    #[tokio::test]
    async fn test_login_fixture_rejects_wrong_password() {
        let binding = table();
        let route = binding.lookup("/api/auth/login").unwrap();
        let body = r#"{"email":"demo@drus.com","password":"nope"}"#;
        let err = route
            .produce("/api/auth/login", &Method::POST, Some(body))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_fixture_without_body_fails() {
        let binding = table();
        let route = binding.lookup("/api/auth/login").unwrap();
        let err = route
            .produce("/api/auth/login", &Method::GET, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Fixture(_)));
    }

    #[tokio::test]
    async fn test_sync_stats_are_seeded_by_platform() {
        let table = table();
        let sync = |path: &'static str| {
            let route = table.lookup(path).unwrap().clone();
            async move { route.produce(path, &Method::POST, None).await.unwrap() }
        };

        let leetcode = sync("/api/profiles/sync/leetcode").await;
        assert_eq!(leetcode["platformId"], "leetcode");
        assert_eq!(leetcode["total"], generated_stats("leetcode")["total"]);

        let atcoder = sync("/api/profiles/sync/atcoder").await;
        assert_eq!(atcoder["total"], 170);
    }

    #[tokio::test]
    async fn test_encoded_segments_are_decoded() {
        let path = "/api/platforms/leetcode/jane%20doe";
        let binding = table();
        let route = binding.lookup(path).unwrap();
        let value = route.produce(path, &Method::GET, None).await.unwrap();
        assert_eq!(value["username"], "jane doe");
    }
}
