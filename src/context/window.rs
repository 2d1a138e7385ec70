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

//! The buffered-window context decorator (spec §4.8): what a `Buffer`
//! block wraps its inner context in. Re-scopes `position` to be relative
//! to the window's own origin and rejects any move that would land
//! outside `[0, length]`, while delegating everything else — path,
//! variables, field map, block scratch, field processing, transactions —
//! straight to the wrapped context.

use crate::context::CodingContext;
use crate::error::EngineError;
use crate::model::{BlockId, BlockScratch, FieldMapping, Variable};
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;
use crate::transaction::Transaction;

/// Decorates `Inner` with a `[0, length]` bit window whose origin is
/// `Inner`'s position at the moment the window was opened.
pub struct WindowContext<'a, Inner: CodingContext + ?Sized> {
    inner: &'a mut Inner,
    origin: i64,
    length: u64,
}

impl<'a, Inner: CodingContext + ?Sized> WindowContext<'a, Inner> {
    /// Opens a window of `length` bits over `inner`, with `inner`'s
    /// current position adopted as the window's origin.
    pub fn new(inner: &'a mut Inner, length: u64) -> Self {
        let origin = inner.position();
        WindowContext {
            inner,
            origin,
            length,
        }
    }

    /// The window's length in bits.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Position relative to the window's own origin.
    pub fn relative_position(&self) -> i64 {
        self.inner.position() - self.origin
    }

    fn check_relative(&self, attempted: i64) -> VoidOutcome {
        if attempted < 0 || attempted as u64 > self.length {
            return Outcome::err(EngineError::PositionOutOfWindow {
                attempted,
                length: self.length,
            });
        }
        Outcome::ok(())
    }
}

impl<'a, Inner: CodingContext + ?Sized> CodingContext for WindowContext<'a, Inner> {
    type Value = Inner::Value;

    fn current_path(&self) -> LogicalPath {
        self.inner.current_path()
    }

    fn position(&self) -> i64 {
        self.relative_position()
    }

    fn move_by(&mut self, offset: i64) -> VoidOutcome {
        let attempted = self.relative_position() + offset;
        if let Some(e) = self.check_relative(attempted).error() {
            return Outcome::err(e.clone());
        }
        self.inner.move_by(offset)
    }

    fn process_field(
        &mut self,
        relative_path: &LogicalPath,
        bit_length: u32,
        default: Option<Self::Value>,
    ) -> Outcome<Self::Value> {
        let attempted_end = self.relative_position() + bit_length as i64;
        if let Some(e) = self.check_relative(attempted_end).error() {
            return Outcome::err(e.clone());
        }
        self.inner.process_field(relative_path, bit_length, default)
    }

    fn get_field_mapping(&self, path: &LogicalPath) -> Outcome<FieldMapping<Self::Value>> {
        self.inner.get_field_mapping(path)
    }

    fn get_variable(&self, name: &str) -> Outcome<Variable> {
        self.inner.get_variable(name)
    }

    fn set_variable(&mut self, name: &str, value: Variable) -> VoidOutcome {
        self.inner.set_variable(name, value)
    }

    fn remove_variable(&mut self, name: &str) {
        self.inner.remove_variable(name);
    }

    fn get_block_scratch(&self, id: BlockId) -> Option<BlockScratch> {
        self.inner.get_block_scratch(id)
    }

    fn set_block_scratch(&mut self, id: BlockId, scratch: BlockScratch) {
        self.inner.set_block_scratch(id, scratch);
    }

    fn enter_scope(&mut self, segment: &LogicalPath) -> LogicalPath {
        self.inner.enter_scope(segment)
    }

    fn exit_scope(&mut self, previous: LogicalPath) {
        self.inner.exit_scope(previous);
    }

    fn begin_transaction(&mut self) -> Outcome<Transaction> {
        self.inner.begin_transaction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    struct FakeContext {
        pos: i64,
        reads: Vec<(LogicalPath, u32)>,
    }

    impl CodingContext for FakeContext {
        type Value = i64;

        fn current_path(&self) -> LogicalPath {
            LogicalPath::root()
        }
        fn position(&self) -> i64 {
            self.pos
        }
        fn move_by(&mut self, offset: i64) -> VoidOutcome {
            self.pos += offset;
            Outcome::ok(())
        }
        fn process_field(
            &mut self,
            path: &LogicalPath,
            bit_length: u32,
            _default: Option<i64>,
        ) -> Outcome<i64> {
            self.reads.push((path.clone(), bit_length));
            self.pos += bit_length as i64;
            Outcome::ok(bit_length as i64)
        }
        fn get_field_mapping(&self, path: &LogicalPath) -> Outcome<FieldMapping<i64>> {
            Outcome::err(EngineError::key_not_found(path.to_string()))
        }
        fn get_variable(&self, name: &str) -> Outcome<Variable> {
            Outcome::err(EngineError::key_not_found(name))
        }
        fn set_variable(&mut self, _name: &str, _value: Variable) -> VoidOutcome {
            Outcome::ok(())
        }
        fn remove_variable(&mut self, _name: &str) {}
        fn get_block_scratch(&self, _id: BlockId) -> Option<BlockScratch> {
            None
        }
        fn set_block_scratch(&mut self, _id: BlockId, _scratch: BlockScratch) {}
        fn enter_scope(&mut self, _segment: &LogicalPath) -> LogicalPath {
            LogicalPath::root()
        }
        fn exit_scope(&mut self, _previous: LogicalPath) {}
        fn begin_transaction(&mut self) -> Outcome<Transaction> {
            Outcome::ok(Transaction::noop())
        }
    }

    #[test]
    fn position_is_relative_to_window_origin() {
        let mut inner = FakeContext { pos: 10, reads: Vec::new() };
        let window = WindowContext::new(&mut inner, 16);
        assert_eq!(window.position(), 0);
    }

    #[test]
    fn move_within_window_succeeds() {
        let mut inner = FakeContext { pos: 10, reads: Vec::new() };
        let mut window = WindowContext::new(&mut inner, 16);
        assert!(window.move_by(8).is_ok());
        assert_eq!(window.position(), 8);
    }

    #[test]
    fn move_past_window_end_fails() {
        let mut inner = FakeContext { pos: 0, reads: Vec::new() };
        let mut window = WindowContext::new(&mut inner, 8);
        assert!(window.move_by(9).is_err());
    }

    #[test]
    fn process_field_exceeding_window_fails_without_touching_inner() {
        let mut inner = FakeContext { pos: 0, reads: Vec::new() };
        let mut window = WindowContext::new(&mut inner, 4);
        let result = window.process_field(&LogicalPath::parse("x"), 8, None);
        assert!(result.is_err());
        assert!(inner.reads.is_empty());
    }
}
