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

//! A bidirectional, bit-granular binary codec engine.
//!
//! `bitweave` decodes a bit stream into a logical field tree, or encodes
//! a field tree back into a bit stream, by running the same tree of
//! composable [`block`] definitions against a direction-agnostic
//! [`context::CodingContext`]. The engine owns the layered coding state
//! (current path, bit position, variables, field map, block scratch)
//! and the transactional bookkeeping needed to roll that state back
//! atomically; it imposes no representation on the bit stream, field
//! tree, or value types themselves — those are external collaborators
//! plugged in through the traits in [`stream`].
//!
//! This crate has no OS, filesystem, or async dependency: it is
//! `#![no_std]` plus `alloc`, usable from any host that can provide a
//! byte/bit source and a place to bind typed values. Enable the
//! `memory-io` feature (default-on) for an in-memory reference
//! implementation of the external collaborators, enough to exercise the
//! whole engine without writing your own.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub mod context;
pub mod deferred;
pub mod error;
pub mod eval;
pub mod model;
pub mod outcome;
pub mod path;
pub mod stream;
pub mod transaction;

#[cfg(feature = "memory-io")]
pub mod mem;

pub use context::{CodingContext, DecodingContext, EncodingContext, WindowContext};
pub use error::EngineError;
pub use model::{BitValue, BlockId, BlockScratch, FieldMapping, Variable};
pub use outcome::{Outcome, VoidOutcome};
pub use path::LogicalPath;
