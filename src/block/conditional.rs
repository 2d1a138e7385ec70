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

//! `Conditional`/`ConditionalElse` (spec §4.9): gate a branch on a
//! late-bound boolean. A false condition with no else-branch is a
//! success with no side effects.

use alloc::boxed::Box;

use crate::block::Block;
use crate::context::CodingContext;
use crate::eval::EvalFn;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};

/// Processes `inner` only when `condition_fn(ctx)` evaluates to `true`.
pub struct Conditional<V> {
    id: BlockId,
    condition: EvalFn<bool, V>,
    inner: Box<dyn Block<V>>,
}

impl<V: 'static> Conditional<V> {
    /// Builds a conditional gating `inner` on `condition`.
    pub fn new(condition: EvalFn<bool, V>, inner: Box<dyn Block<V>>) -> Self {
        Conditional {
            id: BlockId::next(),
            condition,
            inner,
        }
    }
}

impl<V: 'static> Block<V> for Conditional<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "conditional {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        match (self.condition)(&*ctx) {
            Outcome::Ok(true) => self.inner.run(ctx),
            Outcome::Ok(false) => Outcome::ok(()),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }
}

/// As [`Conditional`], but processes `else_inner` when the condition is
/// false instead of doing nothing.
pub struct ConditionalElse<V> {
    id: BlockId,
    condition: EvalFn<bool, V>,
    then_inner: Box<dyn Block<V>>,
    else_inner: Box<dyn Block<V>>,
}

impl<V: 'static> ConditionalElse<V> {
    /// Builds a two-armed conditional.
    pub fn new(
        condition: EvalFn<bool, V>,
        then_inner: Box<dyn Block<V>>,
        else_inner: Box<dyn Block<V>>,
    ) -> Self {
        ConditionalElse {
            id: BlockId::next(),
            condition,
            then_inner,
            else_inner,
        }
    }
}

impl<V: 'static> Block<V> for ConditionalElse<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "conditional_else {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        match (self.condition)(&*ctx) {
            Outcome::Ok(true) => self.then_inner.run(ctx),
            Outcome::Ok(false) => self.else_inner.run(ctx),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }
}
