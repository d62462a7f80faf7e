// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session container: who is signed in.
//!
//! The session is the only writer of the stored token. Failed operations
//! propagate their error and leave the state as it was.

use reqwest::Method;
use serde_json::json;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::user::{GoogleLoginRequest, LoginRequest, RegisterRequest};
use crate::models::{AuthResponse, SessionState, UserIdentity};
use crate::services::gateway::{ApiGateway, RequestOptions};
use crate::services::google_identity;

pub struct Session {
    gateway: ApiGateway,
    state: RwLock<SessionState>,
}

impl Session {
    /// Create a session in the `Loading` state. Call `restore` to resolve it.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Create a session and immediately restore it from the stored token.
    pub async fn initialize(gateway: ApiGateway) -> Self {
        let session = Self::new(gateway);
        session.restore().await;
        session
    }

    /// Resolve the session from the stored token.
    ///
    /// A token whose profile cannot be fetched is treated as no token: it is
    /// cleared and the error is only logged.
    pub async fn restore(&self) {
        if self.gateway.credentials().get_token().is_none() {
            self.set_state(SessionState::Unauthenticated).await;
            return;
        }

        match self
            .gateway
            .fetch_as::<UserIdentity>("/api/profiles/me", RequestOptions::get())
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.set_state(SessionState::Authenticated(user)).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load user, clearing stored token");
                self.gateway.credentials().clear_token();
                self.set_state(SessionState::Unauthenticated).await;
            }
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<UserIdentity> {
        self.state.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let options = RequestOptions::json(Method::POST, &LoginRequest { email, password })?;
        let auth: AuthResponse = self.gateway.fetch_as("/api/auth/login", options).await?;
        self.authenticate(&auth).await;
        Ok(auth)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let options = RequestOptions::json(
            Method::POST,
            &RegisterRequest {
                name,
                email,
                password,
            },
        )?;
        let auth: AuthResponse = self.gateway.fetch_as("/api/auth/register", options).await?;
        tracing::info!(user_id = %auth.user.id, "Account registered");
        Ok(auth)
    }

    /// Sign in with a Google ID token.
    ///
    /// Claims are decoded locally without verifying the signature; the raw
    /// credential is sent along so the backend can verify it.
    pub async fn login_with_google(&self, credential: &str) -> Result<AuthResponse> {
        let claims = google_identity::decode_unverified(credential)?;
        tracing::debug!(
            email = claims.email.as_deref().unwrap_or("<missing>"),
            "Decoded Google credential"
        );

        let options = RequestOptions::json(
            Method::POST,
            &GoogleLoginRequest {
                id_token: credential.trim(),
                email: claims.email.as_deref(),
                name: claims.name.as_deref(),
                picture: claims.picture.as_deref(),
            },
        )?;
        let auth: AuthResponse = self.gateway.fetch_as("/api/auth/google", options).await?;
        self.authenticate(&auth).await;
        Ok(auth)
    }

    /// Confirm an email address, returning the server's message.
    pub async fn verify_email(&self, token: &str) -> Result<String> {
        let value = self
            .gateway
            .send_json(Method::POST, "/api/auth/verify-email", &json!({ "token": token }))
            .await?;
        Ok(value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string())
    }

    /// Sign out. Never fails.
    pub async fn logout(&self) {
        self.gateway.credentials().clear_token();
        self.set_state(SessionState::Unauthenticated).await;
        tracing::info!("Signed out");
    }

    async fn authenticate(&self, auth: &AuthResponse) {
        self.gateway.credentials().set_token(Some(&auth.token));
        self.set_state(SessionState::Authenticated(auth.user.clone()))
            .await;
        tracing::info!(user_id = %auth.user.id, "Signed in");
    }

    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }
}
