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

//! Decoding realization of [`CodingContext`]: reads bits off a
//! [`BitStreamReader`] and binds converted values into a
//! [`TransactionalFieldWriter`] through a deferred writer.

use crate::context::{CodingContext, CodingState};
use crate::deferred::DeferredFieldWriter;
use crate::model::{BlockId, BlockScratch, FieldMapping, Variable};
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;
use crate::stream::{
    BinaryValueConverter, BitStreamReader, BitStreamSeeker, FieldWriter, TransactionalFieldWriter,
};
use crate::transaction::{shared, Shared, Transaction};

/// A decode pass: source is a bit stream, sink is the logical field tree.
pub struct DecodingContext<R, F, C>
where
    F: TransactionalFieldWriter,
    C: BinaryValueConverter<Value = F::Value>,
{
    state: CodingState<F::Value>,
    reader: Shared<R>,
    field_writer: DeferredFieldWriter<F>,
    converter: C,
}

impl<R, F, C> DecodingContext<R, F, C>
where
    R: BitStreamReader,
    F: TransactionalFieldWriter + 'static,
    F::Value: Clone + 'static,
    C: BinaryValueConverter<Value = F::Value>,
{
    /// Builds a decoding context rooted at `/`, reading from `reader` and
    /// binding into `field_writer` via `converter`.
    pub fn new(reader: R, field_writer: F, converter: C) -> Self {
        DecodingContext {
            state: CodingState::new(LogicalPath::root()),
            reader: shared(reader),
            field_writer: DeferredFieldWriter::new(field_writer),
            converter,
        }
    }
}

impl<R, F, C> CodingContext for DecodingContext<R, F, C>
where
    R: BitStreamReader,
    F: TransactionalFieldWriter + 'static,
    F::Value: Clone + 'static,
    C: BinaryValueConverter<Value = F::Value>,
{
    type Value = F::Value;

    fn current_path(&self) -> LogicalPath {
        self.state.current_path()
    }

    fn position(&self) -> i64 {
        self.reader.borrow().position()
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        self.reader.borrow_mut().move_by(offset)
    }

    fn process_field(
        &mut self,
        relative_path: &LogicalPath,
        bit_length: u32,
        default: Option<Self::Value>,
    ) -> Outcome<Self::Value> {
        if bit_length == 0 {
            return Outcome::err(crate::error::EngineError::argument_invalid(
                "field bit_length must be > 0",
            ));
        }
        let absolute = self.state.resolve_path(relative_path);
        let bit_position = self.position();
        // The read must fully complete (and its `RefMut` borrow of `reader`
        // drop) before the converter runs: a converter is free to call back
        // into `ctx.position()`, which would re-borrow `reader` and panic
        // if the read's borrow were still held by an in-progress `match`.
        let read_result = self.reader.borrow_mut().read(bit_length);
        let (raw, converted) = match read_result {
            Outcome::Ok(raw) => match self.converter.convert_from(&*self, raw) {
                Outcome::Ok(v) => (raw, v),
                Outcome::Err(e) => match default {
                    Some(d) => (raw, d),
                    None => return Outcome::Err(e),
                },
            },
            Outcome::Err(e) => match default {
                Some(d) => (crate::model::BitValue::new(0, bit_length), d),
                None => return Outcome::Err(e),
            },
        };
        if let VoidOutcome::Err(e) =
            self.state
                .map_field(&absolute, bit_position, raw, converted.clone())
        {
            return Outcome::Err(e);
        }
        if let VoidOutcome::Err(e) = self.field_writer.write_field(&absolute, converted.clone()) {
            return Outcome::Err(e);
        }
        Outcome::ok(converted)
    }

    fn get_field_mapping(&self, path: &LogicalPath) -> Outcome<FieldMapping<Self::Value>> {
        self.state.get_field_mapping(path)
    }

    fn get_variable(&self, name: &str) -> Outcome<Variable> {
        self.state.get_variable(name)
    }

    fn set_variable(&mut self, name: &str, value: Variable) -> VoidOutcome {
        self.state.set_variable(name, value)
    }

    fn remove_variable(&mut self, name: &str) {
        self.state.remove_variable(name);
    }

    fn get_block_scratch(&self, id: BlockId) -> Option<BlockScratch> {
        self.state.get_block_scratch(id)
    }

    fn set_block_scratch(&mut self, id: BlockId, scratch: BlockScratch) {
        self.state.set_block_scratch(id, scratch);
    }

    fn enter_scope(&mut self, segment: &LogicalPath) -> LogicalPath {
        self.state.enter_scope(segment)
    }

    fn exit_scope(&mut self, previous: LogicalPath) {
        self.state.exit_scope(previous);
    }

    fn begin_transaction(&mut self) -> Outcome<Transaction> {
        log::trace!("decoding context: opening state, reader, and field_writer sub-transactions");
        let mut txn = self.state.begin_transaction();

        let position_snapshot = self.reader.borrow().position();
        let rollback_reader = self.reader.clone();
        txn.register_transaction(Transaction::new(
            move || {
                let current = rollback_reader.borrow().position();
                let _ = rollback_reader
                    .borrow_mut()
                    .move_by(position_snapshot - current);
            },
            || {},
            || {},
        ));

        match self.field_writer.begin_transaction() {
            Outcome::Ok(field_txn) => txn.register_transaction(field_txn),
            Outcome::Err(e) => {
                log::error!("decoding context: field writer refused a transaction: {e}");
                txn.dispose();
                return Outcome::Err(e);
            }
        }

        Outcome::ok(txn)
    }
}
