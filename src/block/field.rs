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

//! A single named, bit-width-bounded value. The leaf of every layout,
//! and the only one that mutates the field map (spec §4.9).
//!
//! `path` and `bit_length` are both late-bound closures, matching spec
//! §4.9's "four late-bound closures (path_fn, length_fn, default_fn,
//! converter_fn)" — `converter_fn` is the single `BinaryValueConverter`
//! bound to the whole coding context (spec §6) rather than a per-field
//! closure, since the engine imposes no representation on conversion and
//! a per-context converter is the natural Rust shape for that contract.

use crate::block::Block;
use crate::context::CodingContext;
use crate::eval::{self, EvalFn};
use crate::model::BlockId;
use crate::outcome::{Outcome, VoidOutcome};
use crate::path::LogicalPath;

/// Binds `bit_length` bits at `path`, converting in whichever direction
/// `ctx` is running.
pub struct Field<V> {
    id: BlockId,
    path: EvalFn<LogicalPath, V>,
    bit_length: EvalFn<u32, V>,
    default: Option<EvalFn<V, V>>,
}

impl<V: 'static> Field<V> {
    /// A field of fixed, compile-time-known path and width.
    pub fn new(path: impl Into<LogicalPath>, bit_length: u32) -> Self {
        Field {
            id: BlockId::next(),
            path: eval::constant(path.into()),
            bit_length: eval::constant(bit_length),
            default: None,
        }
    }

    /// A field whose width is computed from the coding context at
    /// processing time (e.g. a length-prefixed payload).
    pub fn with_dynamic_length(path: impl Into<LogicalPath>, bit_length: EvalFn<u32, V>) -> Self {
        Field {
            id: BlockId::next(),
            path: eval::constant(path.into()),
            bit_length,
            default: None,
        }
    }

    /// A field whose path is itself computed from the coding context —
    /// e.g. a `Repeat` body indexing by its loop variable.
    pub fn with_dynamic_path(path: EvalFn<LogicalPath, V>, bit_length: u32) -> Self {
        Field {
            id: BlockId::next(),
            path,
            bit_length: eval::constant(bit_length),
            default: None,
        }
    }

    /// Both path and width computed from the coding context.
    pub fn dynamic(path: EvalFn<LogicalPath, V>, bit_length: EvalFn<u32, V>) -> Self {
        Field {
            id: BlockId::next(),
            path,
            bit_length,
            default: None,
        }
    }

    /// Attaches a default, evaluated and substituted only when the
    /// underlying read/convert pipeline fails in a suppressible way
    /// (spec §7: converter failure while decoding, field-read failure
    /// while encoding).
    pub fn with_default(mut self, default: EvalFn<V, V>) -> Self {
        self.default = Some(default);
        self
    }
}

impl<V: 'static> Block<V> for Field<V> {
    fn id(&self) -> BlockId {
        self.id
    }

    fn run(&self, ctx: &mut dyn CodingContext<Value = V>) -> VoidOutcome {
        let path = match (self.path)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        let bit_length = match (self.bit_length)(&*ctx) {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
        };
        let default = match &self.default {
            Some(f) => match f(&*ctx) {
                Outcome::Ok(v) => Some(v),
                Outcome::Err(e) => return Outcome::Err(e),
            },
            None => None,
        };
        ctx.process_field(&path, bit_length, default).map(|_| ())
    }
}
