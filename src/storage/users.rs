// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Wraps a [`Table<User>`] and adds username/email lookups and the
//! uniqueness rules for both fields.

use chrono::Utc;

use super::{Record, StorageError, StorageResult, Table};
use crate::auth::Role;
use crate::models::{User, UserId};

impl Record for User {
    const ENTITY: &'static str = "User";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Default)]
pub struct UserRepository {
    table: Table<User>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new account.
    ///
    /// Login resolves one name space covering usernames and emails, so a new
    /// username may not equal any stored email and vice versa.
    pub fn create(&mut self, new_user: NewUser) -> StorageResult<User> {
        if self.find_for_login(&new_user.username).is_some() {
            return Err(already_exists("username"));
        }
        if self.find_for_login(&new_user.email).is_some() {
            return Err(already_exists("email"));
        }

        Ok(self.table.insert(User {
            id: 0,
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: Utc::now(),
        }))
    }

    pub fn get(&self, id: UserId) -> StorageResult<User> {
        self.table
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound {
                entity: User::ENTITY,
                id,
            })
    }

    pub fn get_by_username(&self, username: &str) -> Option<&User> {
        self.table.find(|user| user.username == username)
    }

    pub fn get_by_email(&self, email: &str) -> Option<&User> {
        self.table.find(|user| user.email == email)
    }

    /// Resolve a login name: username first, then email.
    pub fn find_for_login(&self, username_or_email: &str) -> Option<&User> {
        self.get_by_username(username_or_email)
            .or_else(|| self.get_by_email(username_or_email))
    }

    /// Replace a stored user; the email must not name another account.
    pub fn update(&mut self, user: User) -> StorageResult<()> {
        let taken = self
            .table
            .find(|other| {
                other.id != user.id && (other.email == user.email || other.username == user.email)
            })
            .is_some();
        if taken {
            return Err(already_exists("email"));
        }
        self.table.update(user)
    }

    pub fn delete(&mut self, id: UserId) -> StorageResult<User> {
        self.table.remove(id)
    }

    /// One page of users in id order, plus the total count.
    pub fn list(&self, page: usize, page_size: usize) -> (Vec<User>, usize) {
        let (users, total) = self.table.page(page, page_size);
        (users.into_iter().cloned().collect(), total)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn already_exists(field: &'static str) -> StorageError {
    StorageError::AlreadyExists {
        entity: User::ENTITY,
        field,
    }
}
