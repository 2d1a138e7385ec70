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

//! Error kinds produced by the engine. See spec §7 for the nominal list.

use alloc::string::String;

/// Every error the engine itself can raise.
///
/// `StreamError` and `ConversionError` relay whatever an external
/// collaborator (spec §6) reported; the engine never inspects their
/// internals, only carries the message along.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// Null/empty/whitespace-only argument, a non-positive length, or a
    /// path of the wrong kind (root/relative) passed where absolute was
    /// required. Indicates a programmer error, not a data error.
    #[display(fmt = "invalid argument: {}", _0)]
    ArgumentInvalid(String),

    /// A variable, field mapping, or block-scratch lookup found nothing.
    #[display(fmt = "key not found: {}", _0)]
    KeyNotFound(String),

    /// A key (variable, field path, or block-scratch identity) already
    /// had an entry in the store being written to.
    #[display(fmt = "duplicate key: {}", _0)]
    DuplicateKey(String),

    /// A `Buffer`-wrapped operation would move outside `[0, length]`.
    #[display(fmt = "position out of window: {} not in [0, {}]", attempted, length)]
    PositionOutOfWindow {
        /// The relative position that was attempted.
        attempted: i64,
        /// The window's length in bits.
        length: u64,
    },

    /// The bound bit-stream reader/writer reported a failure.
    #[display(fmt = "stream error: {}", _0)]
    StreamError(String),

    /// The bound binary value converter reported a failure.
    #[display(fmt = "conversion error: {}", _0)]
    ConversionError(String),

    /// An operation was invalid given the current state (e.g. unwrapping
    /// a successful outcome through the error-only path, committing a
    /// transaction twice with conflicting intents).
    #[display(fmt = "invalid operation: {}", _0)]
    InvalidOperation(String),
}

impl EngineError {
    /// Convenience constructor for [`EngineError::ArgumentInvalid`].
    pub fn argument_invalid(detail: impl Into<String>) -> Self {
        EngineError::ArgumentInvalid(detail.into())
    }

    /// Convenience constructor for [`EngineError::KeyNotFound`].
    pub fn key_not_found(detail: impl Into<String>) -> Self {
        EngineError::KeyNotFound(detail.into())
    }

    /// Convenience constructor for [`EngineError::DuplicateKey`].
    pub fn duplicate_key(detail: impl Into<String>) -> Self {
        EngineError::DuplicateKey(detail.into())
    }

    /// Convenience constructor for [`EngineError::StreamError`].
    pub fn stream(detail: impl Into<String>) -> Self {
        EngineError::StreamError(detail.into())
    }

    /// Convenience constructor for [`EngineError::ConversionError`].
    pub fn conversion(detail: impl Into<String>) -> Self {
        EngineError::ConversionError(detail.into())
    }

    /// Convenience constructor for [`EngineError::InvalidOperation`].
    pub fn invalid_operation(detail: impl Into<String>) -> Self {
        EngineError::InvalidOperation(detail.into())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

impl EngineError {
    /// Renders the error kind's name only, without its payload. Used by
    /// `trace!` call sites that want the kind without formatting the
    /// (possibly large) detail string.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EngineError::ArgumentInvalid(_) => "ArgumentInvalid",
            EngineError::KeyNotFound(_) => "KeyNotFound",
            EngineError::DuplicateKey(_) => "DuplicateKey",
            EngineError::PositionOutOfWindow { .. } => "PositionOutOfWindow",
            EngineError::StreamError(_) => "StreamError",
            EngineError::ConversionError(_) => "ConversionError",
            EngineError::InvalidOperation(_) => "InvalidOperation",
        }
    }
}

