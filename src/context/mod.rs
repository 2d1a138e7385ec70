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

//! The coding context (spec §4.7): the single surface every block and
//! evaluation closure runs against. [`DecodingContext`] and
//! [`EncodingContext`] are the two concrete realizations; both carry the
//! same layered state (current path, bit position, variables, field
//! map, block scratch) and differ only in which direction a field moves
//! between the bit stream and the field tree.

pub mod decode;
pub mod encode;
pub mod window;

pub use decode::DecodingContext;
pub use encode::EncodingContext;
pub use window::WindowContext;

use alloc::string::{String, ToString};

use crate::error::EngineError;
use crate::model::{BlockId, BlockScratch, FieldMapping, Variable};
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;
use crate::transaction::map::TransactionalMap;
use crate::transaction::{shared, Shared, Transaction};

/// The surface blocks and evaluation closures use. Generic over `Value`,
/// the field tree's typed representation, so the core stays agnostic to
/// what a concrete integration chooses to store there.
pub trait CodingContext {
    /// The field tree's typed value representation.
    type Value;

    /// The absolute path currently in scope.
    fn current_path(&self) -> LogicalPath;

    /// The bit stream's current cursor position.
    fn position(&self) -> i64;

    /// Moves the bit stream cursor by `offset` bits.
    fn move_by(&mut self, offset: i64) -> VoidOutcome;

    /// Processes one field at `relative_path` (combined against
    /// `current_path`), `bit_length` bits wide: for a decoding context
    /// this reads `bit_length` bits and converts them into a `Value`;
    /// for an encoding context this reads the bound `Value` and converts
    /// it into `bit_length` bits. Either way, a [`FieldMapping`] is
    /// recorded at the combined absolute path and the converted value is
    /// returned, so block code never needs to know which direction it's
    /// running in.
    ///
    /// `default`, when present, is substituted for the failure spec §7
    /// names as suppressible: a converter failure while decoding, or a
    /// field-tree read failure while encoding. Any other failure (e.g.
    /// the underlying stream itself erroring) still propagates even with
    /// a default supplied.
    fn process_field(
        &mut self,
        relative_path: &LogicalPath,
        bit_length: u32,
        default: Option<Self::Value>,
    ) -> Outcome<Self::Value>;

    /// Looks up a previously recorded field mapping by absolute path.
    /// Unlike `process_field`, `path` is used exactly as given — it is
    /// not combined with `current_path`.
    fn get_field_mapping(&self, path: &LogicalPath) -> Outcome<FieldMapping<Self::Value>>;

    /// Reads a variable by name. Rejects an empty or whitespace-only
    /// name with `ArgumentInvalid`.
    fn get_variable(&self, name: &str) -> Outcome<Variable>;

    /// Binds a variable by name, overwriting any prior value. Rejects an
    /// empty or whitespace-only name with `ArgumentInvalid`.
    fn set_variable(&mut self, name: &str, value: Variable) -> VoidOutcome;

    /// Removes a variable by name, if one is bound. Used by `Repeat` to
    /// restore a loop index to "unset" when it had no prior value (spec
    /// §4.9's "save name's prior value (nil if unset) ... restore the
    /// saved value").
    fn remove_variable(&mut self, name: &str);

    /// Reads a block's scratch entry, if one has been recorded.
    fn get_block_scratch(&self, id: BlockId) -> Option<BlockScratch>;

    /// Records a block's scratch entry, overwriting any prior value.
    fn set_block_scratch(&mut self, id: BlockId, scratch: BlockScratch);

    /// Descends `current_path` by `segment` (combined the same way
    /// `process_field` combines its argument) and returns the path that
    /// was in scope beforehand, for a matching [`CodingContext::exit_scope`].
    /// Paired rather than a single scoped closure so the method stays
    /// object-safe — blocks hold `dyn CodingContext<Value = V>`.
    fn enter_scope(&mut self, segment: &LogicalPath) -> LogicalPath;

    /// Restores `current_path` to `previous`, undoing a matching
    /// [`CodingContext::enter_scope`].
    fn exit_scope(&mut self, previous: LogicalPath);

    /// Opens a transaction over every layer of state this context owns
    /// (path, variables, field map, block scratch) plus the underlying
    /// bit stream and field tree adapters. Rollback restores all of it;
    /// commit flushes the deferred stream/tree writers. If any
    /// sub-transaction fails to open, every sub-transaction opened so
    /// far is disposed before the failure is returned (spec §4.7).
    fn begin_transaction(&mut self) -> Outcome<Transaction>;
}

/// Runs `f` with `ctx`'s current path temporarily descended by
/// `segment`, restoring the prior path once `f` returns regardless of
/// outcome. The ergonomic counterpart to the object-safe
/// `enter_scope`/`exit_scope` pair — this is what block implementations
/// actually call.
pub fn with_scope<C, T>(
    ctx: &mut C,
    segment: &LogicalPath,
    f: impl FnOnce(&mut C) -> Outcome<T>,
) -> Outcome<T>
where
    C: CodingContext + ?Sized,
{
    let previous = ctx.enter_scope(segment);
    let result = f(ctx);
    ctx.exit_scope(previous);
    result
}

/// The layered state shared by both concrete contexts: current path,
/// variables, field map, and block scratch (spec §3). Bit position lives
/// on the bound stream adapter instead, since it's the adapter that
/// actually owns a cursor.
pub(crate) struct CodingState<V> {
    path: Shared<LogicalPath>,
    variables: Shared<TransactionalMap<String, Variable>>,
    field_map: Shared<TransactionalMap<String, FieldMapping<V>>>,
    block_scratch: Shared<TransactionalMap<String, BlockScratch>>,
}

impl<V: Clone + 'static> CodingState<V> {
    pub(crate) fn new(root: LogicalPath) -> Self {
        CodingState {
            path: shared(root),
            variables: shared(TransactionalMap::new()),
            field_map: shared(TransactionalMap::new()),
            block_scratch: shared(TransactionalMap::new()),
        }
    }

    pub(crate) fn current_path(&self) -> LogicalPath {
        self.path.borrow().clone()
    }

    pub(crate) fn enter_scope(&self, segment: &LogicalPath) -> LogicalPath {
        let previous = self.path.borrow().clone();
        *self.path.borrow_mut() = previous.combine(segment);
        previous
    }

    pub(crate) fn exit_scope(&self, previous: LogicalPath) {
        *self.path.borrow_mut() = previous;
    }

    /// Combines `relative_path` against the current path. An absolute
    /// `relative_path` replaces the current path outright (spec §4.2
    /// `combine` semantics); a relative one descends from it.
    pub(crate) fn resolve_path(&self, relative_path: &LogicalPath) -> LogicalPath {
        self.path.borrow().combine(relative_path)
    }

    /// Validates `absolute` is a non-root absolute path and records a
    /// field mapping there.
    pub(crate) fn map_field(
        &self,
        absolute: &LogicalPath,
        bit_position: i64,
        raw_value: crate::model::BitValue,
        converted_value: V,
    ) -> VoidOutcome {
        if !absolute.is_absolute() || absolute.is_root() {
            return Outcome::err(EngineError::argument_invalid(
                "a field path must combine to a non-root absolute path",
            ));
        }
        let mapping = FieldMapping {
            path: absolute.clone(),
            bit_position,
            raw_value,
            converted_value,
        };
        self.field_map
            .borrow_mut()
            .set(absolute.to_normalized_string(), mapping);
        Outcome::ok(())
    }

    pub(crate) fn get_field_mapping(&self, path: &LogicalPath) -> Outcome<FieldMapping<V>> {
        if !path.is_absolute() || path.is_root() {
            return Outcome::err(EngineError::argument_invalid(
                "get_field_mapping requires a non-root absolute path",
            ));
        }
        match self.field_map.borrow().get(&path.to_normalized_string()) {
            Some(mapping) => Outcome::ok(mapping.clone()),
            None => Outcome::err(EngineError::key_not_found(path.to_string())),
        }
    }

    pub(crate) fn get_variable(&self, name: &str) -> Outcome<Variable> {
        if name.trim().is_empty() {
            return Outcome::err(EngineError::argument_invalid(
                "variable name must not be empty or whitespace-only",
            ));
        }
        match self.variables.borrow().get(&String::from(name)) {
            Some(v) => Outcome::ok(v.clone()),
            None => Outcome::err(EngineError::key_not_found(name)),
        }
    }

    pub(crate) fn set_variable(&self, name: &str, value: Variable) -> VoidOutcome {
        if name.trim().is_empty() {
            return Outcome::err(EngineError::argument_invalid(
                "variable name must not be empty or whitespace-only",
            ));
        }
        self.variables.borrow_mut().set(String::from(name), value);
        Outcome::ok(())
    }

    pub(crate) fn remove_variable(&self, name: &str) {
        self.variables.borrow_mut().remove(&String::from(name));
    }

    pub(crate) fn get_block_scratch(&self, id: BlockId) -> Option<BlockScratch> {
        self.block_scratch.borrow().get(&id.to_string()).cloned()
    }

    pub(crate) fn set_block_scratch(&self, id: BlockId, scratch: BlockScratch) {
        self.block_scratch
            .borrow_mut()
            .set(id.to_string(), scratch);
    }

    /// Opens a transaction over path, variables, field map, and block
    /// scratch, fanning out to all four on resolution.
    pub(crate) fn begin_transaction(&self) -> Transaction {
        log::trace!("coding state: opening sub-transactions on path, variables, field_map, block_scratch");
        let path_snapshot = self.path.borrow().clone();
        let rollback_path = self.path.clone();
        let mut txn = Transaction::new(
            move || {
                *rollback_path.borrow_mut() = path_snapshot;
            },
            || {},
            || {},
        );
        txn.register_transaction(TransactionalMap::begin_transaction(&self.variables));
        txn.register_transaction(TransactionalMap::begin_transaction(&self.field_map));
        txn.register_transaction(TransactionalMap::begin_transaction(&self.block_scratch));
        txn
    }
}

impl<V> Clone for CodingState<V> {
    fn clone(&self) -> Self {
        CodingState {
            path: self.path.clone(),
            variables: self.variables.clone(),
            field_map: self.field_map.clone(),
            block_scratch: self.block_scratch.clone(),
        }
    }
}
