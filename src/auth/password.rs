// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification (Argon2id).
//!
//! Digests are PHC strings (`$argon2id$v=19$...`) carrying their own salt
//! and parameters, so they can be verified without extra state.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("password task failed: {0}")]
    Task(String),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored digest.
///
/// The digest comparison inside `argon2` is constant-time. An unparsable
/// digest never matches.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        tracing::warn!("Stored password digest is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking thread pool.
///
/// Async handlers call this so Argon2 never runs on a runtime worker.
pub async fn hash_password_blocking(plaintext: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(
    plaintext: String,
    digest: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &digest))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let digest = hash_password("correct horse").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &digest));
        assert!(!verify_password("battery staple", &digest));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn malformed_digest_never_matches() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }

    #[tokio::test]
    async fn blocking_variants_match_sync_behaviour() {
        let digest = hash_password_blocking("secret1".to_string()).await.unwrap();
        assert!(verify_password("secret1", &digest));
        assert!(verify_password_blocking("secret1".to_string(), digest.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("wrong!".to_string(), digest)
            .await
            .unwrap());
        assert!(!verify_password_blocking("x".to_string(), "garbage".to_string())
            .await
            .unwrap());
    }
}
