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

//! Snapshot-capable key -> value store. See spec §4.3. Snapshots are
//! full shallow clones taken at `begin_transaction`, per the "simple,
//! acceptable when maps are small" strategy in spec §9 design notes.

use alloc::string::ToString;
use hashbrown::HashMap;

use crate::error::EngineError;
use crate::transaction::{Shared, Transaction};

/// A key -> value store whose mutations can be snapshotted and rolled
/// back via a [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionalMap<K, V> {
    live: HashMap<K, V>,
}

impl<K, V> Default for TransactionalMap<K, V> {
    fn default() -> Self {
        TransactionalMap {
            live: HashMap::new(),
        }
    }
}

impl<K, V> TransactionalMap<K, V>
where
    K: Eq + core::hash::Hash + Clone + core::fmt::Display + 'static,
    V: Clone + 'static,
{
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` at `key`, failing if `key` is already present.
    pub fn add(&mut self, key: K, value: V) -> Result<(), EngineError> {
        if self.live.contains_key(&key) {
            return Err(EngineError::duplicate_key(key.to_string()));
        }
        self.live.insert(key, value);
        Ok(())
    }

    /// Inserts `value` at `key`, overwriting any prior value.
    pub fn set(&mut self, key: K, value: V) {
        self.live.insert(key, value);
    }

    /// Looks up `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.live.get(key)
    }

    /// Removes `key`, returning its prior value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.live.remove(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the map has no live entries.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Iterates over the live entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.live.iter()
    }

    /// Snapshots `shared`'s current mapping (a full shallow clone, per
    /// the simple strategy in spec §9) and returns a [`Transaction`]
    /// whose rollback atomically restores it and whose commit discards
    /// the snapshot.
    pub fn begin_transaction(shared: &Shared<Self>) -> Transaction {
        let snapshot = shared.borrow().live.clone();
        let target = shared.clone();
        Transaction::new(
            move || {
                target.borrow_mut().live = snapshot;
            },
            || {},
            || {},
        )
    }
}
