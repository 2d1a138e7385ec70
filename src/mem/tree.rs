// bitweave
// Copyright (C) 2024  bitweave contributors
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! A `path -> value` field tree backed by [`crate::transaction::map::TransactionalMap`],
//! implementing both directions of spec §6's field-tree contracts.

use alloc::string::{String, ToString};

use crate::error::EngineError;
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;
use crate::stream::{FieldReader, FieldWriter, TransactionalFieldWriter};
use crate::transaction::map::TransactionalMap;
use crate::transaction::{shared, Shared, Transaction};

/// An in-memory field tree keyed by normalized absolute path.
pub struct MemoryFieldTree<V> {
    map: Shared<TransactionalMap<String, V>>,
}

impl<V: Clone + 'static> MemoryFieldTree<V> {
    /// An empty tree.
    pub fn new() -> Self {
        MemoryFieldTree {
            map: shared(TransactionalMap::new()),
        }
    }

    /// Reads the value bound at `path`, if any, without going through
    /// the fallible [`FieldReader`] contract — a convenience for tests
    /// and callers that already hold the concrete type.
    pub fn peek(&self, path: &LogicalPath) -> Option<V> {
        self.map.borrow().get(&path.to_normalized_string()).cloned()
    }

    /// Binds `value` at `path` directly, bypassing the deferred-writer
    /// path a coding context would normally go through.
    pub fn poke(&self, path: &LogicalPath, value: V) {
        self.map.borrow_mut().set(path.to_normalized_string(), value);
    }
}

impl<V: Clone + 'static> Default for MemoryFieldTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for MemoryFieldTree<V> {
    fn clone(&self) -> Self {
        MemoryFieldTree {
            map: self.map.clone(),
        }
    }
}

impl<V: Clone + 'static> FieldReader for MemoryFieldTree<V> {
    type Value = V;

    fn read_field(&self, path: &LogicalPath) -> Outcome<V> {
        match self.map.borrow().get(&path.to_normalized_string()) {
            Some(v) => Outcome::ok(v.clone()),
            None => Outcome::err(EngineError::key_not_found(path.to_string())),
        }
    }
}

impl<V: Clone + 'static> FieldWriter for MemoryFieldTree<V> {
    type Value = V;

    fn write_field(&mut self, path: &LogicalPath, value: V) -> VoidOutcome {
        self.map.borrow_mut().set(path.to_normalized_string(), value);
        Outcome::ok(())
    }
}

impl<V: Clone + 'static> TransactionalFieldWriter for MemoryFieldTree<V> {
    fn begin_transaction(&mut self) -> Outcome<Transaction> {
        Outcome::ok(TransactionalMap::begin_transaction(&self.map))
    }
}
