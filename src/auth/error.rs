// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Coarse, machine-checkable category of an auth failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Authentication / authorization error type.
///
/// Every variant maps to exactly one [`ErrorKind`]. Variants that carry a
/// detail string keep it for logging only; it never reaches the response
/// body.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header present but not exactly `Bearer <token>`
    InvalidAuthHeader,
    /// Token could not be parsed
    MalformedToken,
    /// Token signature does not match the signing key
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Any other token rejection (wrong algorithm, wrong issuer, ...)
    InvalidToken(String),
    /// Route requires an identity but the request carries none
    AuthenticationRequired,
    /// Route target id is not a valid subject id
    InvalidTargetId,
    /// Identity present but lacks the privilege for this route
    InsufficientPermissions,
    /// Token signing or another unexpected codec failure
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::AuthenticationRequired => ErrorKind::Unauthorized,
            AuthError::InvalidTargetId => ErrorKind::BadRequest,
            AuthError::InsufficientPermissions => ErrorKind::Forbidden,
            AuthError::InternalError(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Authorization header format must be Bearer {{token}}")
            }
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::InvalidToken(_) => write!(f, "Invalid token"),
            AuthError::AuthenticationRequired => write!(f, "Authentication required"),
            AuthError::InvalidTargetId => write!(f, "Invalid user ID"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::InternalError(_) => write!(f, "Internal authentication error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed => AuthError::MalformedToken,
            TokenError::BadSignature => AuthError::InvalidSignature,
            TokenError::Other(detail) => AuthError::InvalidToken(detail),
            TokenError::Signing(detail) => AuthError::InternalError(detail),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
