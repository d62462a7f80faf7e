// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local decoding of Google Sign-In credentials.
//!
//! The signature is NOT verified here. The decoded claims only pre-fill the
//! sign-in request; the raw credential is forwarded alongside them and the
//! backend is responsible for validating it against Google's keys.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::ApiError;

/// Profile claims read from an ID token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Decode the claims of `credential` without checking signature, expiry
/// or audience.
pub fn decode_unverified(credential: &str) -> Result<GoogleClaims, ApiError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    // The key is ignored once signature validation is disabled.
    let key = DecodingKey::from_secret(&[]);

    decode::<GoogleClaims>(credential.trim(), &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::CredentialDecode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"someone-elses-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_decodes_claims_signed_with_unknown_key() {
        let credential = token(json!({
            "sub": "1234",
            "email": "ada@example.com",
            "name": "Ada",
            "picture": "https://example.com/ada.png",
            "aud": "some-client-id",
            "exp": 1
        }));

        let claims = decode_unverified(&credential).unwrap();
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.name.as_deref(), Some("Ada"));
        assert_eq!(claims.picture.as_deref(), Some("https://example.com/ada.png"));
    }

    #[test]
    fn test_missing_claims_are_none() {
        let claims = decode_unverified(&token(json!({ "sub": "1" }))).unwrap();
        assert_eq!(claims.email, None);
    }

    #[test]
    fn test_malformed_credential_fails() {
        let err = decode_unverified("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::CredentialDecode(_)));

        let err = decode_unverified("a.b.c").unwrap_err();
        assert!(matches!(err, ApiError::CredentialDecode(_)));
    }
}
