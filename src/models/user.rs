//! User identity and auth payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Account identifier. The API hands out both numeric and textual ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(id) => write!(f, "{id}"),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// The signed-in user, as returned by the profile and auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Avatar URL (`avatarUrl` / `picture` on the wire)
    #[serde(
        default,
        alias = "avatarUrl",
        alias = "picture",
        skip_serializing_if = "Option::is_none"
    )]
    pub picture_url: Option<String>,
    /// Linked platforms, carried as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Map<String, Value>>,
}

/// Response from login, register and Google sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserIdentity,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Claims forwarded to `/api/auth/google` after local decoding.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest<'a> {
    /// Raw credential so the backend can check the signature itself
    pub id_token: &'a str,
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub picture: Option<&'a str>,
}

/// Session lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated(UserIdentity),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_accepts_avatar_alias_and_numeric_id() {
        let user: UserIdentity = serde_json::from_value(json!({
            "id": 1,
            "email": "demo@drus.com",
            "name": "Demo User",
            "bio": "ignored",
            "avatarUrl": "https://i.pravatar.cc/150?u=demo@drus.com"
        }))
        .unwrap();

        assert_eq!(user.id, UserId::Numeric(1));
        assert_eq!(
            user.picture_url.as_deref(),
            Some("https://i.pravatar.cc/150?u=demo@drus.com")
        );
        assert!(user.platforms.is_none());
    }

    #[test]
    fn test_identity_accepts_text_id_and_platforms() {
        let user: UserIdentity = serde_json::from_value(json!({
            "id": "google_1700000000000",
            "email": "google_user@gmail.com",
            "name": "Google User",
            "platforms": { "leetcode": "google_coder" }
        }))
        .unwrap();

        assert_eq!(user.id.to_string(), "google_1700000000000");
        assert_eq!(
            user.platforms.unwrap().get("leetcode"),
            Some(&json!("google_coder"))
        );
    }
}
