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

//! `Deferred`/`Process` (spec §4.9): a forward-reference pair. `Deferred`
//! records where it sits — current path and bit position — without
//! running its inner block; a later `Process`, holding a reference to
//! that specific `Deferred`, jumps to the recorded site, runs the
//! deferred block's inner there, and restores the caller's own path and
//! position afterward. Used to process a forward offset/index pointer
//! that names a location described earlier in the layout (scenario S3).

use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::block::Block;
use crate::context::CodingContext;
use crate::model::{BlockId, BlockScratch};
use crate::outcome::{Outcome, VoidOutcome};

/// Marks a site in the layout without running `inner` there; only
/// records `(path, position)` into block scratch keyed by this block's
/// identity, for a [`ProcessBlock`] to replay later.
pub struct DeferredBlock<V> {
    id: BlockId,
    inner: Box<dyn Block<V>>,
}

impl<V: 'static> DeferredBlock<V> {
    /// Wraps `inner` as a deferred site, returning an `Rc` so a
    /// [`ProcessBlock`] can reference this exact instance.
    pub fn new(inner: Box<dyn Block<V>>) -> Rc<Self> {
        Rc::new(DeferredBlock {
            id: BlockId::next(),
            inner,
        })
    }
}

impl<V: 'static> Block<V> for DeferredBlock<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "deferred {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let scratch = BlockScratch::new(ctx.current_path(), ctx.position());
        ctx.set_block_scratch(self.id, scratch);
        Outcome::ok(())
    }
}

/// Jumps to the site a specific [`DeferredBlock`] recorded, runs that
/// block's inner there, then restores the caller's original path and
/// position — `Process` is position-neutral to whatever ran it.
pub struct ProcessBlock<V> {
    id: BlockId,
    target: Rc<DeferredBlock<V>>,
}

impl<V: 'static> ProcessBlock<V> {
    /// Builds a process jumping to `target`'s recorded site.
    pub fn new(target: Rc<DeferredBlock<V>>) -> Self {
        ProcessBlock {
            id: BlockId::next(),
            target,
        }
    }
}

impl<V: 'static> Block<V> for ProcessBlock<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "process {} entering at path {} position {}, targeting deferred {}",
            self.id,
            ctx.current_path(),
            ctx.position(),
            self.target.id()
        );
        let scratch = match ctx.get_block_scratch(self.target.id()) {
            Some(s) => s,
            None => {
                return Outcome::err(crate::error::EngineError::key_not_found(alloc::format!(
                    "no deferred scratch recorded for block {}",
                    self.target.id()
                )))
            }
        };

        let saved_path = ctx.enter_scope(&scratch.path);
        let saved_position = ctx.position();
        let result = match ctx.move_by(scratch.position - saved_position) {
            Outcome::Ok(()) => self.target.inner.run(ctx),
            Outcome::Err(e) => Outcome::Err(e),
        };

        let restore_position = ctx.move_by(saved_position - ctx.position());
        ctx.exit_scope(saved_path);

        result.continue_with(|| restore_position)
    }
}
