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

//! The five external-collaborator contracts the engine consumes through
//! and imposes no representation on (spec §6). Concrete bit-stream
//! readers/writers, field trees, and converters live outside the core;
//! only their shape is defined here.

use crate::context::CodingContext;
use crate::model::BitValue;
use crate::outcome::VoidOutcome;
use crate::path::LogicalPath;
use crate::transaction::Transaction;

/// Exposes a bit position and the ability to move it. Shared by readers
/// and writers.
pub trait BitStreamSeeker {
    /// Current position, in bits from the stream origin.
    fn position(&self) -> i64;

    /// Moves the cursor by `offset` bits (negative moves backward).
    /// Fails with [`crate::error::EngineError::StreamError`] if the move
    /// is illegal for the underlying medium (e.g. past EOF).
    fn move_by(&mut self, offset: i64) -> VoidOutcome;
}

/// A readable bit stream.
pub trait BitStreamReader: BitStreamSeeker {
    /// Reads `n` bits and advances the cursor by `n`. The returned
    /// value carries its own bit length.
    fn read(&mut self, n: u32) -> crate::outcome::Outcome<BitValue>;
}

/// A writable bit stream.
pub trait BitStreamWriter: BitStreamSeeker {
    /// Writes `value` and advances the cursor by `value.length()`.
    fn write(&mut self, value: BitValue) -> VoidOutcome;
}

/// Reads the logical field tree by absolute path (used by encoding).
pub trait FieldReader {
    /// The field tree's typed value representation.
    type Value;

    /// Reads the value bound at `path`.
    fn read_field(&self, path: &LogicalPath) -> crate::outcome::Outcome<Self::Value>;
}

/// Writes the logical field tree by absolute path (used by decoding).
pub trait FieldWriter {
    /// The field tree's typed value representation.
    type Value;

    /// Binds `value` at `path`.
    fn write_field(&mut self, path: &LogicalPath, value: Self::Value) -> VoidOutcome;
}

/// The transactional variant of [`FieldWriter`] a decoding context binds
/// to, adding snapshot/rollback support over the field tree itself (the
/// deferred field writer of spec §4.6 sits in front of this).
pub trait TransactionalFieldWriter: FieldWriter {
    /// Opens a transaction over the underlying field tree.
    fn begin_transaction(&mut self) -> crate::outcome::Outcome<Transaction>;
}

/// Converts between a stream's raw bit payload and the field tree's
/// typed value.
pub trait BinaryValueConverter {
    /// The field tree's typed value representation.
    type Value;

    /// Interprets `bits` as a `Value`, given the evaluation context at
    /// the point of conversion (decoding direction).
    fn convert_from(
        &self,
        ctx: &dyn CodingContext<Value = Self::Value>,
        bits: BitValue,
    ) -> crate::outcome::Outcome<Self::Value>;

    /// Renders `value` as a `bit_length`-wide bit payload, given the
    /// evaluation context at the point of conversion (encoding
    /// direction).
    fn convert_to(
        &self,
        ctx: &dyn CodingContext<Value = Self::Value>,
        value: &Self::Value,
        bit_length: u32,
    ) -> crate::outcome::Outcome<BitValue>;
}
