// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and role/ownership authorization for the
//! Jiaxun API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with username (or email) and password
//! 2. Server verifies the password digest and issues an HS256 JWT carrying
//!    `user_id`, `email` and `role`, valid for 24 hours
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. The authentication filter verifies the token on every request (no
//!    caching) and stores the identity in the [`RequestContext`]
//! 5. Each route's [`RoutePolicy`] decides allow/deny
//!
//! ## Status Codes
//!
//! - 401: missing, malformed, expired or otherwise invalid token
//! - 403: valid identity, insufficient privilege
//! - 400: malformed target id on a self-or-role route

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod roles;
pub mod token;

pub use claims::{Identity, RequestContext, TokenClaims};
pub use error::{AuthError, ErrorKind};
pub use extractor::Auth;
pub use middleware::AuthConfig;
pub use policy::RoutePolicy;
pub use roles::Role;
pub use token::{SigningKey, TokenCodec, TokenError};
