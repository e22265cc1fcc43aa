// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the verified identity.
//!
//! Reads the [`RequestContext`] placed in the request extensions by the
//! authentication filter; never looks at the `Authorization` header.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.subject_id, identity.role
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Identity, RequestContext};

/// Extractor for the authenticated identity.
///
/// Rejects with 401 when the request carries no verified identity.
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(RequestContext::identity)
            .cloned()
            .map(Auth)
            .ok_or(AuthError::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn auth_requires_context() {
        let mut parts = parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn auth_rejects_anonymous_context() {
        let mut parts = parts();
        parts.extensions.insert(RequestContext::anonymous());
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn auth_reads_identity_from_context() {
        let mut parts = parts();
        let identity = Identity::new(5, "a@example.com", Role::Teacher);
        parts
            .extensions
            .insert(RequestContext::authenticated(identity.clone()));

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, identity);
    }

    #[tokio::test]
    async fn auth_ignores_authorization_header() {
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer forged")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }
}
