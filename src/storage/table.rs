// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic keyed table.

use std::collections::BTreeMap;

use super::{StorageError, StorageResult};

/// A record stored in a [`Table`].
pub trait Record: Clone {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);
}

/// Records keyed by a sequential positive id, iterated in id order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under a fresh id and return the stored copy.
    pub fn insert(&mut self, mut record: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        record.set_id(id);
        self.rows.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// First record matching `predicate`, in id order.
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.rows.values().find(|record| predicate(record))
    }

    /// Replace an existing record.
    pub fn update(&mut self, record: T) -> StorageResult<()> {
        match self.rows.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(not_found::<T>(record.id())),
        }
    }

    pub fn remove(&mut self, id: u64) -> StorageResult<T> {
        self.rows.remove(&id).ok_or_else(|| not_found::<T>(id))
    }

    /// One page of records (1-based `page`) plus the total count.
    pub fn page(&self, page: usize, page_size: usize) -> (Vec<&T>, usize) {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let items = self.rows.values().skip(offset).take(page_size).collect();
        (items, self.rows.len())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn not_found<T: Record>(id: u64) -> StorageError {
    StorageError::NotFound {
        entity: T::ENTITY,
        id,
    }
}
