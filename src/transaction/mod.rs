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

//! Transaction handle: a disposable bundle of rollback/commit/finalize
//! callbacks, composable across sub-transactions. See spec §4.4.

pub mod map;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// A single-threaded, reference-counted interior-mutability cell. The
/// engine's layered state (spec §3) needs to be mutated both by the
/// in-progress block that opened a transaction and, later, by that
/// transaction's own rollback/commit closures — two live handles to the
/// same store at once. `Shared` is the standard single-threaded answer;
/// it is sound here precisely because spec §5 forbids sharing a coding
/// context across concurrent actors.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps `value` for transactional sharing.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    Committed,
    RolledBack,
}

/// A single-use transaction scope. Starts in rollback mode: if dropped
/// (or explicitly [`Transaction::dispose`]d) without an intervening
/// [`Transaction::commit`], it rolls back. `commit`/`rollback`/`dispose`
/// are all idempotent with respect to each other — only the first call
/// among them takes effect.
pub struct Transaction {
    rollback_fn: Option<Box<dyn FnOnce()>>,
    commit_fn: Option<Box<dyn FnOnce()>>,
    finalize_fn: Option<Box<dyn FnOnce()>>,
    children: Vec<Transaction>,
    resolution: Resolution,
}

impl Transaction {
    /// Builds a handle from its three callbacks.
    pub fn new(
        rollback: impl FnOnce() + 'static,
        commit: impl FnOnce() + 'static,
        finalize: impl FnOnce() + 'static,
    ) -> Self {
        Transaction {
            rollback_fn: Some(Box::new(rollback)),
            commit_fn: Some(Box::new(commit)),
            finalize_fn: Some(Box::new(finalize)),
            children: Vec::new(),
            resolution: Resolution::Pending,
        }
    }

    /// A handle with no side effects at all, useful as a no-op leaf when
    /// composing sub-transactions that happen to have nothing to snapshot.
    pub fn noop() -> Self {
        Transaction::new(|| {}, || {}, || {})
    }

    /// Composes `child` into `self`: whatever resolution `self` ends up
    /// with (commit or rollback) is also driven into `child`, including
    /// `child`'s own registered grandchildren. This lets one outer scope
    /// coordinate several layered sub-transactions atomically.
    pub fn register_transaction(&mut self, child: Transaction) {
        self.children.push(child);
    }

    fn resolve(&mut self, which: Resolution) {
        if self.resolution != Resolution::Pending {
            return;
        }
        match which {
            Resolution::Committed => {
                if let Some(f) = self.commit_fn.take() {
                    f();
                }
            }
            Resolution::RolledBack => {
                if let Some(f) = self.rollback_fn.take() {
                    f();
                }
            }
            Resolution::Pending => return,
        }
        self.rollback_fn = None;
        self.commit_fn = None;
        self.resolution = which;
        let child_count = self.children.len();
        log::trace!(
            "transaction resolved {which:?}, fanning out to {child_count} sub-transaction(s)"
        );
        for mut child in core::mem::take(&mut self.children) {
            match which {
                Resolution::Committed => child.commit(),
                Resolution::RolledBack => child.rollback(),
                Resolution::Pending => {}
            }
        }
        if let Some(f) = self.finalize_fn.take() {
            f();
        }
    }

    /// Flips the transaction into commit mode. No-op if already resolved
    /// (by either a prior `commit` or a prior `rollback`).
    pub fn commit(&mut self) {
        self.resolve(Resolution::Committed);
    }

    /// Resolves the transaction by rollback. No-op if already resolved.
    pub fn rollback(&mut self) {
        self.resolve(Resolution::RolledBack);
    }

    /// Disposes of the handle: resolves it (defaulting to rollback, the
    /// mode it started in) if it hasn't been resolved yet. Idempotent.
    pub fn dispose(&mut self) {
        self.resolve(Resolution::RolledBack);
    }

    /// Whether `commit`/`rollback`/`dispose` has already run.
    pub fn is_resolved(&self) -> bool {
        self.resolution != Resolution::Pending
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn default_disposal_rolls_back() {
        let rolled_back = alloc::rc::Rc::new(Cell::new(false));
        let committed = alloc::rc::Rc::new(Cell::new(false));
        {
            let rb = rolled_back.clone();
            let cm = committed.clone();
            let _txn = Transaction::new(move || rb.set(true), move || cm.set(true), || {});
        }
        assert!(rolled_back.get());
        assert!(!committed.get());
    }

    #[test]
    fn explicit_commit_runs_commit_not_rollback() {
        let rolled_back = alloc::rc::Rc::new(Cell::new(false));
        let committed = alloc::rc::Rc::new(Cell::new(false));
        let rb = rolled_back.clone();
        let cm = committed.clone();
        let mut txn = Transaction::new(move || rb.set(true), move || cm.set(true), || {});
        txn.commit();
        drop(txn);
        assert!(committed.get());
        assert!(!rolled_back.get());
    }

    #[test]
    fn commit_is_idempotent() {
        let count = alloc::rc::Rc::new(Cell::new(0));
        let c = count.clone();
        let mut txn = Transaction::new(|| {}, move || c.set(c.get() + 1), || {});
        txn.commit();
        txn.commit();
        txn.commit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn rollback_after_commit_is_noop() {
        let rolled_back = alloc::rc::Rc::new(Cell::new(false));
        let rb = rolled_back.clone();
        let mut txn = Transaction::new(move || rb.set(true), || {}, || {});
        txn.commit();
        txn.rollback();
        assert!(!rolled_back.get());
    }

    #[test]
    fn disposal_after_commit_is_noop() {
        let finalize_count = alloc::rc::Rc::new(Cell::new(0));
        let fc = finalize_count.clone();
        let mut txn = Transaction::new(|| {}, || {}, move || fc.set(fc.get() + 1));
        txn.commit();
        txn.dispose();
        txn.dispose();
        assert_eq!(finalize_count.get(), 1);
    }

    #[test]
    fn finalize_runs_exactly_once_regardless_of_path() {
        let finalize_count = alloc::rc::Rc::new(Cell::new(0));
        let fc = finalize_count.clone();
        let mut txn = Transaction::new(|| {}, || {}, move || fc.set(fc.get() + 1));
        txn.rollback();
        drop(txn);
        assert_eq!(finalize_count.get(), 1);
    }

    #[test]
    fn register_transaction_fans_out_commit() {
        let child_committed = alloc::rc::Rc::new(Cell::new(false));
        let cc = child_committed.clone();
        let child = Transaction::new(|| {}, move || cc.set(true), || {});
        let mut parent = Transaction::new(|| {}, || {}, || {});
        parent.register_transaction(child);
        parent.commit();
        assert!(child_committed.get());
    }

    #[test]
    fn register_transaction_fans_out_rollback() {
        let child_rolled_back = alloc::rc::Rc::new(Cell::new(false));
        let cr = child_rolled_back.clone();
        let child = Transaction::new(move || cr.set(true), || {}, || {});
        let mut parent = Transaction::new(|| {}, || {}, || {});
        parent.register_transaction(child);
        parent.dispose();
        assert!(child_rolled_back.get());
    }
}
