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

//! Reference in-memory implementations of the five external-collaborator
//! contracts in [`crate::stream`]: enough to build a
//! [`crate::context::DecodingContext`]/[`crate::context::EncodingContext`]
//! pair and exercise the whole block algebra without a downstream bit-
//! stream or field-tree library. None of the core modules depend on this
//! one — it's a plug-in, not a hidden dependency.

pub mod bitio;
pub mod converter;
pub mod tree;

pub use bitio::{MemoryBitReader, MemoryBitWriter};
pub use converter::IdentityConverter;
pub use tree::MemoryFieldTree;
