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

//! `Choice` (spec §4.9): evaluates a switch value once, then runs the
//! body of every case whose test values structurally match it — not
//! just the first. Spec §9 flags this as possibly-buggy source
//! behavior but directs implementers to preserve it rather than
//! "optimize" to single-case dispatch, so it is preserved verbatim here
//! and exercised as a testable property.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::block::Block;
use crate::context::CodingContext;
use crate::eval::EvalFn;
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};

/// One case of a [`Choice`]: matches if any of `test_values` structurally
/// equals the switch value, in which case `body` is processed.
pub struct ChoiceCase<V> {
    test_values: Vec<EvalFn<V, V>>,
    body: Box<dyn Block<V>>,
}

impl<V: 'static> ChoiceCase<V> {
    /// Builds a case matching any of `test_values`, running `body` when
    /// matched.
    pub fn new(test_values: Vec<EvalFn<V, V>>, body: Box<dyn Block<V>>) -> Self {
        ChoiceCase { test_values, body }
    }
}

/// Evaluates `switch_fn(ctx)` once, then runs every case whose test
/// values match, in list order; the first error aborts the whole block.
pub struct Choice<V> {
    id: BlockId,
    switch: EvalFn<V, V>,
    cases: Vec<ChoiceCase<V>>,
}

impl<V: 'static> Choice<V> {
    /// Builds a choice over `switch` evaluated against `cases` in order.
    pub fn new(switch: EvalFn<V, V>, cases: Vec<ChoiceCase<V>>) -> Self {
        Choice {
            id: BlockId::next(),
            switch,
            cases,
        }
    }
}

impl<V: PartialEq + 'static> Block<V> for Choice<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        log::trace!(
            "choice {} entering at path {} position {}",
            self.id,
            ctx.current_path(),
            ctx.position()
        );
        let switch_value = match (self.switch)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };

        for case in &self.cases {
            let mut matched = false;
            for test in &case.test_values {
                match test(&*ctx) {
                    Outcome::Ok(candidate) => {
                        if candidate == switch_value {
                            matched = true;
                            break;
                        }
                    }
                    Outcome::Err(e) => return Outcome::Err(e),
                }
            }
            if matched {
                if let Some(e) = case.body.run(ctx).error() {
                    return Outcome::err(e.clone());
                }
            }
        }
        Outcome::ok(())
    }
}
