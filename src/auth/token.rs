// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuing and verification.
//!
//! ## Format
//!
//! Tokens are compact JWTs signed with HS256 over the process-wide secret.
//! Claims are defined by [`TokenClaims`].
//!
//! ## Verification
//!
//! - Only HS256 is accepted; any other `alg` in the header is rejected
//!   before the signature is looked at
//! - Signature is checked before any claim is trusted
//! - Expiry is checked against a single clock read, with no leeway

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};

use super::claims::{Identity, TokenClaims};

/// Issuer written into and required from every token.
pub const TOKEN_ISSUER: &str = "jiaxun";

/// Token lifetime (24 hours).
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token rejected: {0}")]
    Other(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Symmetric signing secret.
///
/// Never printed; `Debug` is redacted.
#[derive(Clone)]
pub struct SigningKey(String);

impl SigningKey {
    /// Wrap a secret. Returns `None` for an empty secret.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Issues and verifies session tokens.
///
/// Built once at startup from the configured [`SigningKey`] and shared
/// read-only across requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.algorithms = vec![TOKEN_ALGORITHM];
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.validate_aud = false;
        // Expiry is checked in `verify_at` against the caller's clock read.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `identity`, valid for [`TOKEN_LIFETIME_SECS`].
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, identity: &Identity, now: i64) -> Result<String, TokenError> {
        let claims = TokenClaims::new(identity, TOKEN_ISSUER, now, TOKEN_LIFETIME_SECS);
        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::BadSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidToken
                | JwtErrorKind::Base64(_)
                | JwtErrorKind::Json(_)
                | JwtErrorKind::Utf8(_)
                | JwtErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                _ => TokenError::Other(e.to_string()),
            })?;

        if data.claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.into_identity())
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("issuer", &TOKEN_ISSUER)
            .finish_non_exhaustive()
    }
}
