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

//! Evaluation closures: late-bound expressions read at processing time
//! from the evaluation context (spec §4.9, §9 "Closures over the
//! evaluation context").
//!
//! The evaluation context a closure runs against is just
//! `&dyn CodingContext<Value = V>` — there is no separate read-only
//! trait. A `Buffer` block's window decorator already implements
//! `CodingContext` itself (spec §4.8), so a closure evaluated inside a
//! buffered subtree automatically observes the re-scoped `position`
//! without the engine needing a second context abstraction.

use alloc::boxed::Box;

use crate::context::CodingContext;
use crate::outcome::Outcome;

/// A late-bound expression of type `T`, evaluated against a coding
/// context at block-processing time.
pub type EvalFn<T, V> = Box<dyn Fn(&dyn CodingContext<Value = V>) -> Outcome<T>>;

/// Wraps a plain value as a closure that ignores the context — useful
/// for block parameters that happen to be compile-time constants.
pub fn constant<T, V>(value: T) -> EvalFn<T, V>
where
    T: Clone + 'static,
    V: 'static,
{
    Box::new(move |_ctx| Outcome::ok(value.clone()))
}
