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

//! Like [`crate::block::Group`], but descends the current path by a
//! named segment for the duration of its children — the block that
//! actually introduces structure into the field tree's namespace.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::block::{run_sequence, Block};
use crate::context::{self, CodingContext};
use crate::eval::EvalFn;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;

/// Re-roots the current path to `name_fn(ctx)` for the duration of its
/// children, then restores the saved path on every exit path (success,
/// error, or otherwise) — spec §4.9's `container_path_fn`. Carries no
/// transaction of its own, matching `Group`.
pub struct Container<V> {
    id: BlockId,
    name: EvalFn<LogicalPath, V>,
    children: Vec<Box<dyn Block<V>>>,
}

impl<V: 'static> Container<V> {
    /// Builds a container named `name`, holding `children` in
    /// processing order.
    pub fn new(name: impl Into<LogicalPath>, children: Vec<Box<dyn Block<V>>>) -> Self {
        Container {
            id: BlockId::next(),
            name: crate::eval::constant(name.into()),
            children,
        }
    }

    /// Builds a container whose name is computed from the coding
    /// context at processing time.
    pub fn with_dynamic_name(name: EvalFn<LogicalPath, V>, children: Vec<Box<dyn Block<V>>>) -> Self {
        Container {
            id: BlockId::next(),
            name,
            children,
        }
    }
}

impl<V: 'static> Block<V> for Container<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "container {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let name = match (self.name)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        context::with_scope(ctx, &name, |ctx| run_sequence(ctx, &self.children))
    }
}

#[cfg(all(test, feature = "memory-io"))]
mod tests {
    use super::*;
    use crate::context::DecodingContext;
    use crate::mem::{IdentityConverter, MemoryBitReader, MemoryFieldTree};

    #[test]
    fn container_rescopes_path_for_children() {
        struct RecordPath;
        impl Block<u64> for RecordPath {
            fn id(&self) -> BlockId {
                BlockId::next()
            }
            fn run(&self, ctx: &mut dyn CodingContext<Value = u64>) -> VoidOutcome {
                assert_eq!(ctx.current_path().to_normalized_string(), "/outer");
                Outcome::ok(())
            }
        }
        let container: Container<u64> =
            Container::new("outer", alloc::vec![Box::new(RecordPath) as Box<dyn Block<u64>>]);
        let mut ctx: DecodingContext<MemoryBitReader, MemoryFieldTree<u64>, IdentityConverter> =
            DecodingContext::new(MemoryBitReader::new(alloc::vec![0u8]), MemoryFieldTree::new(), IdentityConverter);
        container.run(&mut ctx).unwrap();
        assert_eq!(ctx.current_path().to_normalized_string(), "/");
    }
}
