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

//! Encoding realization of [`CodingContext`]: reads bound values off a
//! [`FieldReader`] and writes converted bits to a [`BitStreamWriter`]
//! through a deferred writer.

use crate::context::{CodingContext, CodingState};
use crate::deferred::DeferredBitWriter;
use crate::model::{BlockId, BlockScratch, FieldMapping, Variable};
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;
use crate::stream::{BinaryValueConverter, BitStreamSeeker, BitStreamWriter, FieldReader};
use crate::transaction::Transaction;

/// An encode pass: source is the logical field tree, sink is a bit
/// stream.
pub struct EncodingContext<F, W, C>
where
    F: FieldReader,
    C: BinaryValueConverter<Value = F::Value>,
{
    state: CodingState<F::Value>,
    field_reader: F,
    bit_writer: DeferredBitWriter<W>,
    converter: C,
}

impl<F, W, C> EncodingContext<F, W, C>
where
    F: FieldReader,
    F::Value: Clone + 'static,
    W: BitStreamWriter + 'static,
    C: BinaryValueConverter<Value = F::Value>,
{
    /// Builds an encoding context rooted at `/`, reading bound values
    /// from `field_reader` and writing to `writer` via `converter`.
    pub fn new(field_reader: F, writer: W, converter: C) -> Self {
        EncodingContext {
            state: CodingState::new(LogicalPath::root()),
            field_reader,
            bit_writer: DeferredBitWriter::new(writer),
            converter,
        }
    }
}

impl<F, W, C> CodingContext for EncodingContext<F, W, C>
where
    F: FieldReader,
    F::Value: Clone + 'static,
    W: BitStreamWriter + 'static,
    C: BinaryValueConverter<Value = F::Value>,
{
    type Value = F::Value;

    fn current_path(&self) -> LogicalPath {
        self.state.current_path()
    }

    fn position(&self) -> i64 {
        self.bit_writer.position()
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        self.bit_writer.move_by(offset)
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
        let value = match self.field_reader.read_field(&absolute) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => match default {
                Some(d) => d,
                None => return Outcome::Err(e),
            },
        };
        let bit_position = self.position();
        let raw = match self.converter.convert_to(&*self, &value, bit_length) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        if let VoidOutcome::Err(e) = self.bit_writer.write(raw) {
            return Outcome::Err(e);
        }
        if let VoidOutcome::Err(e) =
            self.state
                .map_field(&absolute, bit_position, raw, value.clone())
        {
            return Outcome::Err(e);
        }
        Outcome::ok(value)
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
        log::trace!("encoding context: opening state and bit_writer sub-transactions");
        let mut txn = self.state.begin_transaction();
        txn.register_transaction(self.bit_writer.begin_transaction());
        Outcome::ok(txn)
    }
}
