// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! ## Layers
//!
//! - [`authenticate`] is applied once around the API router. It lets public
//!   paths through with an anonymous [`RequestContext`], and otherwise
//!   requires a valid bearer token before any routing happens.
//! - [`authorize`] is attached per route with the route's [`RoutePolicy`]
//!   as state (`route_layer`), so it runs after routing and can see path
//!   parameters.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/users", guard(RoutePolicy::Role(Role::Teacher), get(list_users)))
//!     .layer(axum::middleware::from_fn_with_state(auth_config, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{rejection::RawPathParamsRejection, RawPathParams, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::policy::{RoutePolicy, TARGET_ID_PARAM};
use super::{AuthError, RequestContext, TokenCodec};

/// Path prefixes reachable without a token.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/api/auth/login", "/api/auth/register", "/api/health"];

/// Authentication filter configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token codec holding the process-wide signing key
    pub codec: TokenCodec,
    /// Public path prefixes (exact, case-sensitive prefix match)
    pub public_paths: Vec<String>,
}

impl AuthConfig {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec,
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Replace the public path allow-list.
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: one space, two parts, a
/// non-empty token.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Run the authentication filter for one request.
///
/// Returns the context to attach to the request, or the rejection.
pub fn authenticate_request(
    config: &AuthConfig,
    path: &str,
    headers: &HeaderMap,
) -> Result<RequestContext, AuthError> {
    if config.is_public(path) {
        return Ok(RequestContext::anonymous());
    }

    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = parse_bearer(header)?;
    let identity = config.codec.verify(token)?;

    Ok(RequestContext::authenticated(identity))
}

/// Authentication middleware function.
pub async fn authenticate(
    State(config): State<Arc<AuthConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_request(&config, request.uri().path(), request.headers()) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = ?e,
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}

/// Authorization middleware function; state is the route's policy.
pub async fn authorize(
    State(policy): State<RoutePolicy>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    request: Request,
    next: Next,
) -> Response {
    let target = params.ok().and_then(|params| {
        params
            .iter()
            .find(|(name, _)| *name == TARGET_ID_PARAM)
            .map(|(_, value)| value.to_string())
    });

    let identity = request
        .extensions()
        .get::<RequestContext>()
        .and_then(RequestContext::identity);

    match policy.evaluate(identity, target.as_deref()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                policy = ?policy,
                subject = identity.map(|i| i.subject_id),
                reason = ?e,
                "Request denied by route policy"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Auth, ErrorKind, Identity, Role, SigningKey};
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn config() -> AuthConfig {
        AuthConfig::new(TokenCodec::new(&SigningKey::new("middleware-secret").unwrap()))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn bearer_for(config: &AuthConfig, identity: &Identity) -> String {
        format!("Bearer {}", config.codec.issue(identity).unwrap())
    }

    #[test]
    fn parse_bearer_accepts_exact_format() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn parse_bearer_rejects_variants() {
        for value in [
            "token abc",
            "bearer abc",
            "Bearer",
            "Bearer ",
            "Bearer  abc",
            "Bearer abc def",
            "Basic dXNlcjpwYXNz",
        ] {
            assert!(
                matches!(parse_bearer(value), Err(AuthError::InvalidAuthHeader)),
                "accepted {value:?}"
            );
        }
    }

    #[test]
    fn public_path_needs_no_header() {
        let ctx = authenticate_request(&config(), "/api/auth/login", &HeaderMap::new()).unwrap();
        assert!(ctx.identity().is_none());
    }

    #[test]
    fn public_path_match_is_case_sensitive_prefix() {
        let config = config();
        assert!(config.is_public("/api/health"));
        assert!(config.is_public("/api/healthz"));
        assert!(!config.is_public("/API/health"));
        assert!(!config.is_public("/v1/api/health"));
    }

    #[test]
    fn protected_path_without_header_is_missing() {
        let result = authenticate_request(&config(), "/api/users/me", &HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[test]
    fn wrong_scheme_is_unauthorized() {
        let result = authenticate_request(&config(), "/api/users/me", &headers_with("token abc"));
        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthHeader));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn valid_token_populates_context() {
        let config = config();
        let identity = Identity::new(3, "lee@example.com", Role::Student);
        let headers = headers_with(&bearer_for(&config, &identity));

        let ctx = authenticate_request(&config, "/api/users/me", &headers).unwrap();
        assert_eq!(ctx.identity(), Some(&identity));
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let other = AuthConfig::new(TokenCodec::new(&SigningKey::new("other").unwrap()));
        let identity = Identity::new(3, "lee@example.com", Role::Student);
        let headers = headers_with(&bearer_for(&other, &identity));

        let result = authenticate_request(&config(), "/api/users/me", &headers);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    async fn whoami(Auth(identity): Auth) -> String {
        identity.subject_id.to_string()
    }

    fn app(config: AuthConfig, policy: RoutePolicy) -> Router {
        Router::new()
            .route(
                "/api/users/{id}",
                get(whoami).route_layer(from_fn_with_state(policy.clone(), authorize)),
            )
            .route("/api/health", get(|| async { "ok" }))
            .layer(from_fn_with_state(Arc::new(config), authenticate))
    }

    async fn send(app: Router, uri: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn public_route_passes_without_token() {
        let (status, body) = send(
            app(config(), RoutePolicy::Authenticated),
            "/api/health",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn malformed_header_is_401_json() {
        let (status, body) = send(
            app(config(), RoutePolicy::Authenticated),
            "/api/users/1",
            Some("token abc"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn self_or_role_allows_self() {
        let config = config();
        let bearer = bearer_for(&config, &Identity::new(7, "s@example.com", Role::Student));
        let (status, body) = send(
            app(config, RoutePolicy::SelfOrRole(Role::Teacher)),
            "/api/users/7",
            Some(&bearer),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7");
    }

    #[tokio::test]
    async fn self_or_role_denies_other_student() {
        let config = config();
        let bearer = bearer_for(&config, &Identity::new(8, "s@example.com", Role::Student));
        let (status, _) = send(
            app(config, RoutePolicy::SelfOrRole(Role::Teacher)),
            "/api/users/7",
            Some(&bearer),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn self_or_role_rejects_bad_id_with_400() {
        let config = config();
        let bearer = bearer_for(&config, &Identity::new(8, "t@example.com", Role::Teacher));
        let (status, _) = send(
            app(config, RoutePolicy::SelfOrRole(Role::Teacher)),
            "/api/users/abc",
            Some(&bearer),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn role_policy_forbids_wrong_role() {
        let config = config();
        let bearer = bearer_for(&config, &Identity::new(8, "s@example.com", Role::Student));
        let (status, _) = send(
            app(config, RoutePolicy::Role(Role::Teacher)),
            "/api/users/8",
            Some(&bearer),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
