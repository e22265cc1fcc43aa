// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Jiaxun - Training Hub API Server
//!
//! User accounts, bearer-token authentication and role-based authorization
//! for the contest / team / training-plan backend.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and the router
//! - `auth` - Token codec, authentication filter, route policies, password hashing
//! - `config` - Environment configuration
//! - `storage` - In-memory user store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
