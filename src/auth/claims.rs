// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, the verified identity, and the per-request context.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried inside a session token.
///
/// Field names are part of the wire format shared with existing clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject id (user store primary key)
    pub user_id: u64,

    pub email: String,

    pub role: Role,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(identity: &Identity, issuer: &str, issued_at: i64, lifetime_secs: i64) -> Self {
        Self {
            user_id: identity.subject_id,
            email: identity.email.clone(),
            role: identity.role.clone(),
            iat: issued_at,
            exp: issued_at + lifetime_secs,
            iss: issuer.to_string(),
        }
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            subject_id: self.user_id,
            email: self.email,
            role: self.role,
        }
    }
}

/// The authenticated subject, derived from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: u64,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: u64, email: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id,
            email: email.into(),
            role,
        }
    }

    pub fn has_role(&self, required: &Role) -> bool {
        &self.role == required
    }
}

/// Request-scoped authentication state.
///
/// Inserted into the request extensions by the authentication filter on
/// every request it lets through. `identity` is `None` only on public
/// paths; it is never populated from anything but a token verified for
/// this request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub(crate) fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
