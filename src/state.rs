// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthConfig, SigningKey, TokenCodec};
use crate::storage::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserRepository>>,
    /// Immutable after startup; shared by the auth filter and the login handler
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(users: UserRepository, signing_key: &SigningKey) -> Self {
        Self::with_auth_config(users, AuthConfig::new(TokenCodec::new(signing_key)))
    }

    pub fn with_auth_config(users: UserRepository, auth: AuthConfig) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            auth: Arc::new(auth),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.auth.codec
    }
}
