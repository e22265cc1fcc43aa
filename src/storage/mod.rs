// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # In-Memory Storage
//!
//! Key-based record storage used by the API handlers.
//!
//! ## Layout
//!
//! - [`Table`] is a generic keyed collection that assigns sequential ids
//!   and knows nothing about the records it holds
//! - Entity repositories (e.g. [`UserRepository`]) own a `Table` and
//!   delegate to it, adding the lookups and uniqueness rules of their
//!   entity
//!
//! Repositories are shared behind `tokio::sync::RwLock` in `AppState`.

pub mod table;
pub mod users;

pub use table::{Record, Table};
pub use users::{NewUser, UserRepository};

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },
    /// A unique field is already taken
    #[error("{entity} with this {field} already exists")]
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
