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

//! Advances or retreats the bit cursor by a computed delta and stops —
//! the building block that lets a later `Process` pick up at an
//! arbitrary forward position (spec §4.9, scenario S3).

use crate::block::Block;
use crate::context::CodingContext;
use crate::eval::EvalFn;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};

/// Moves the bit position by `offset_fn(ctx)` bits (forward if
/// positive, backward if negative). Holds no inner block — `Offset` is
/// a leaf that only ever repositions the cursor; a caller that wants to
/// process something at the new position combines `Offset` with a
/// sibling block in a `Group`, or defers it via `Deferred`/`Process`.
pub struct Offset<V> {
    id: BlockId,
    offset: EvalFn<i64, V>,
}

impl<V: 'static> Offset<V> {
    /// Builds an offset of a fixed, compile-time-known number of bits.
    pub fn new(bits: i64) -> Self {
        Offset {
            id: BlockId::next(),
            offset: crate::eval::constant(bits),
        }
    }

    /// Builds an offset whose delta is computed from the coding context
    /// at processing time.
    pub fn with_dynamic_offset(offset: EvalFn<i64, V>) -> Self {
        Offset {
            id: BlockId::next(),
            offset,
        }
    }
}

impl<V: 'static> Block<V> for Offset<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        let delta = match (self.offset)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        ctx.move_by(delta)
    }
}
