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

//! A no-op [`BinaryValueConverter`] for fixed-width unsigned integers:
//! the field tree's value and the stream's raw bits are both just a
//! right-aligned `u64`.

use crate::context::CodingContext;
use crate::model::BitValue;
use crate::outcome::Outcome;
use crate::stream::BinaryValueConverter;

/// Converts between `BitValue` and `u64` by masking, with no further
/// interpretation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl BinaryValueConverter for IdentityConverter {
    type Value = u64;

    fn convert_from(
        &self,
        _ctx: &dyn CodingContext<Value = u64>,
        bits: BitValue,
    ) -> Outcome<u64> {
        Outcome::ok(bits.bits())
    }

    fn convert_to(
        &self,
        _ctx: &dyn CodingContext<Value = u64>,
        value: &u64,
        bit_length: u32,
    ) -> Outcome<BitValue> {
        Outcome::ok(BitValue::new(*value, bit_length))
    }
}
