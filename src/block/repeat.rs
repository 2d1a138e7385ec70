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

//! `Repeat` (spec §4.9): loops `inner` while a condition holds, exposing
//! the current iteration count as a variable. The loop variable's prior
//! value (or absence) is always restored on exit, whatever the reason
//! for exiting (scenario S4, testable property 8).

use alloc::boxed::Box;
use alloc::string::String;

use crate::block::Block;
use crate::context::CodingContext;
use crate::eval::{self, EvalFn};
use crate::model::{BlockId, Variable};
use crate::outcome::{Outcome, VoidOutcome};

/// Loops `inner` while `condition_fn(ctx)` is true, maintaining a named
/// variable as the zero-based iteration index.
pub struct Repeat<V> {
    id: BlockId,
    index_name: EvalFn<String, V>,
    condition: EvalFn<bool, V>,
    inner: Box<dyn Block<V>>,
}

impl<V: 'static> Repeat<V> {
    /// Builds a repeat whose loop variable has a fixed, compile-time
    /// known name.
    pub fn new(index_name: impl Into<String>, condition: EvalFn<bool, V>, inner: Box<dyn Block<V>>) -> Self {
        Repeat {
            id: BlockId::next(),
            index_name: eval::constant(index_name.into()),
            condition,
            inner,
        }
    }

    /// Builds a repeat whose loop-variable name is itself computed from
    /// the coding context, evaluated once at loop entry.
    pub fn with_dynamic_index_name(
        index_name: EvalFn<String, V>,
        condition: EvalFn<bool, V>,
        inner: Box<dyn Block<V>>,
    ) -> Self {
        Repeat {
            id: BlockId::next(),
            index_name,
            condition,
            inner,
        }
    }

    fn run_iterations(&self, ctx: &mut dyn CodingContext<Value = V>, name: &str) -> VoidOutcome {
        loop {
            match (self.condition)(&*ctx) {
                Outcome::Ok(true) => {}
                Outcome::Ok(false) => return Outcome::ok(()),
                Outcome::Err(e) => return Outcome::Err(e),
            }
            if let Some(e) = self.inner.run(ctx).error() {
                return Outcome::err(e.clone());
            }
            let next = match ctx.get_variable(name) {
                Outcome::Ok(v) => v.as_int().unwrap_or(0) + 1,
                Outcome::Err(_) => 1,
            };
            if let Some(e) = ctx.set_variable(name, Variable::Int(next)).error() {
                return Outcome::err(e.clone());
            }
        }
    }
}

impl<V: 'static> Block<V> for Repeat<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "repeat {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let name = match (self.index_name)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };

        let prior = match ctx.get_variable(&name) {
            Outcome::Ok(v) => Some(v),
            Outcome::Err(_) => None,
        };
        if let Some(e) = ctx.set_variable(&name, Variable::Int(0)).error() {
            return Outcome::err(e.clone());
        }

        let result = self.run_iterations(ctx, &name);

        let restore_result = match prior {
            Some(v) => ctx.set_variable(&name, v),
            None => {
                ctx.remove_variable(&name);
                Outcome::ok(())
            }
        };

        result.continue_with(|| restore_result)
    }
}
