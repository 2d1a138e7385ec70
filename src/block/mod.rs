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

//! Composable definition blocks (spec §4.9): the vocabulary a layout is
//! built from. Every block runs identically whether `ctx` is a
//! [`crate::context::DecodingContext`] or an
//! [`crate::context::EncodingContext`] — the direction lives entirely in
//! `CodingContext::process_field`.

pub mod buffer;
pub mod choice;
pub mod conditional;
pub mod container;
pub mod deferred;
pub mod field;
pub mod fill;
pub mod group;
pub mod offset;
pub mod repeat;

pub use buffer::Buffer;
pub use choice::{Choice, ChoiceCase};
pub use conditional::{Conditional, ConditionalElse};
pub use container::Container;
pub use deferred::{DeferredBlock, ProcessBlock};
pub use field::Field;
pub use fill::Fill;
pub use group::Group;
pub use offset::Offset;
pub use repeat::Repeat;

use alloc::boxed::Box;

use crate::context::CodingContext;
use crate::model::BlockId;
use crate::outcome::VoidOutcome;

/// One node of a definition graph. Blocks compose by holding other
/// blocks as `Box<dyn Block<V>>` children, so a single tree of blocks
/// describes a whole layout regardless of coding direction.
pub trait Block<V> {
    /// This block's construction-time identity (spec §9), used to key
    /// block scratch for blocks that need it ([`DeferredBlock`],
    /// [`ProcessBlock`]) and otherwise just a stable debugging handle.
    fn id(&self) -> BlockId;

    /// Processes this block against `ctx`.
    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome;
}

/// Runs `children` in order, returning the first error. Per spec §4.9,
/// `Group` opens no transaction of its own — a caller that wants
/// speculative, all-or-nothing semantics wraps the group in `Fill` or an
/// explicit transaction. Shared by [`group::Group`] and
/// [`container::Container`] (which additionally re-scopes the path
/// around the same sequence).
pub(crate) fn run_sequence<V>(
    ctx: &mut dyn CodingContext<Value = V>,
    children: &[Box<dyn Block<V>>],
) -> VoidOutcome {
    for child in children {
        if let Some(e) = child.run(ctx).error() {
            return crate::outcome::Outcome::err(e.clone());
        }
    }
    crate::outcome::Outcome::ok(())
}
