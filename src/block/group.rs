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

//! An ordered, atomic sequence of children sharing the current path
//! scope (no new namespace level, unlike [`crate::block::Container`]).

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::block::{run_sequence, Block};
use crate::context::CodingContext;
use crate::model::BlockId;
use crate::outcome::VoidOutcome;

/// Runs its children in order; the first error is returned as-is. No
/// implicit transaction — a caller wanting speculative rollback wraps
/// this group in `Fill` or opens its own transaction around it (spec
/// §4.9).
pub struct Group<V> {
    id: BlockId,
    children: Vec<Box<dyn Block<V>>>,
}

impl<V> Group<V> {
    /// Builds a group from its children, in processing order.
    pub fn new(children: Vec<Box<dyn Block<V>>>) -> Self {
        Group {
            id: BlockId::next(),
            children,
        }
    }
}

impl<V> Block<V> for Group<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "group {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        run_sequence(ctx, &self.children)
    }
}
