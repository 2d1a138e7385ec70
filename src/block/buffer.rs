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

//! `Buffer` (spec §4.9): evaluates a length, wraps the context in the
//! buffered-window decorator (spec §4.8), and runs `inner` against the
//! wrapped view. The window isn't padded — an inner block that reads
//! less than `length` (an underrun) is permitted, which is what makes
//! `Fill` wrapped in a `Buffer` a workable "parse as many as fit" idiom
//! (scenario S2).

use alloc::boxed::Box;

use crate::block::Block;
use crate::context::{CodingContext, WindowContext};
use crate::eval::EvalFn;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};

/// Restricts `inner` to a `length_fn(ctx)`-bit window starting at the
/// current position.
pub struct Buffer<V> {
    id: BlockId,
    length: EvalFn<u64, V>,
    inner: Box<dyn Block<V>>,
}

impl<V: 'static> Buffer<V> {
    /// Builds a buffer of a fixed, compile-time-known bit length.
    pub fn new(length: u64, inner: Box<dyn Block<V>>) -> Self {
        Buffer {
            id: BlockId::next(),
            length: crate::eval::constant(length),
            inner,
        }
    }

    /// Builds a buffer whose length is computed from the coding context
    /// at processing time (e.g. a length-prefixed nested structure).
    pub fn with_dynamic_length(length: EvalFn<u64, V>, inner: Box<dyn Block<V>>) -> Self {
        Buffer {
            id: BlockId::next(),
            length,
            inner,
        }
    }
}

impl<V: 'static> Block<V> for Buffer<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "buffer {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let length = match (self.length)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        let mut window = WindowContext::new(ctx, length);
        self.inner.run(&mut window)
    }
}
