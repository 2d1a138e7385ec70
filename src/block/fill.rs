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

//! `Fill` (spec §4.9): repeats `inner` for as long as it succeeds,
//! wrapping each iteration in its own transaction so a failing final
//! iteration leaves no partial trace. `Fill` itself never fails — it's
//! how a layout says "keep going until the data runs out", commonly
//! nested inside a `Buffer` so the window's edge is what ends the loop
//! (scenario S2).

use alloc::boxed::Box;

use crate::block::Block;
use crate::context::CodingContext;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};

/// Runs `inner` repeatedly until it fails, committing each successful
/// iteration and rolling back the one that fails. Always succeeds
/// overall.
pub struct Fill<V> {
    id: BlockId,
    inner: Box<dyn Block<V>>,
}

impl<V: 'static> Fill<V> {
    /// Builds a fill repeating `inner`.
    pub fn new(inner: Box<dyn Block<V>>) -> Self {
        Fill {
            id: BlockId::next(),
            inner,
        }
    }
}

impl<V: 'static> Block<V> for Fill<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "fill {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let mut iterations = 0u64;
        loop {
            let mut txn = match ctx.begin_transaction() {
                Outcome::Ok(txn) => txn,
                Outcome::Err(e) => return Outcome::Err(e),
            };
            match self.inner.run(ctx) {
                Outcome::Ok(()) => {
                    txn.commit();
                    iterations += 1;
                }
                Outcome::Err(_) => {
                    txn.rollback();
                    log::debug!("fill block {} stopped after {} iterations", self.id, iterations);
                    return Outcome::ok(());
                }
            }
        }
    }
}
