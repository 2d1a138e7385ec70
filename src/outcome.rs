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

//! `Outcome<T>`: the engine's universal fallible-operation return value.
//! See spec §4.1. A void outcome is simply `Outcome<()>`.

use crate::error::EngineError;

/// Tagged success/failure, carrying either a value (or nothing, for
/// `Outcome<()>`) or an [`EngineError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// The operation succeeded, producing `T`.
    Ok(T),
    /// The operation failed.
    Err(EngineError),
}

impl<T> Outcome<T> {
    /// Wraps a value as a success.
    pub fn ok(value: T) -> Self {
        Outcome::Ok(value)
    }

    /// Wraps an error as a failure.
    pub fn err(error: EngineError) -> Self {
        Outcome::Err(error)
    }

    /// True when this is a success.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// True when this is a failure.
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Borrows the error, if any.
    pub fn error(&self) -> Option<&EngineError> {
        match self {
            Outcome::Err(e) => Some(e),
            Outcome::Ok(_) => None,
        }
    }

    /// If `self` is an error, propagate it; otherwise invoke `f` with the
    /// success value and return its outcome. Mirrors spec §4.1
    /// `continue_with`, generalized to monadic `bind`.
    pub fn bind<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => f(v),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }

    /// Maps the success value, leaving an error untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }

    /// Runs `f` only for its side effects when `self` is an error, then
    /// substitutes `f`'s outcome. This is `continue_with` specialised to
    /// chaining onto another fallible step that ignores the prior value;
    /// most callers of a void outcome want this shape.
    pub fn continue_with<U>(self, f: impl FnOnce() -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Ok(_) => f(),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }

    /// Substitutes `value` when `self` is an error; passes a success
    /// through unchanged.
    pub fn on_error(self, value: T) -> Outcome<T> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(v),
            Outcome::Err(_) => Outcome::Ok(value),
        }
    }

    /// Forces resolution into a plain value by calling exactly one of
    /// `success`/`error`.
    pub fn match_with<U>(
        self,
        success: impl FnOnce(T) -> U,
        error: impl FnOnce(EngineError) -> U,
    ) -> U {
        match self {
            Outcome::Ok(v) => success(v),
            Outcome::Err(e) => error(e),
        }
    }

    /// Re-raises the error as a Rust panic; returns the value on success.
    /// Reserved for call sites (typically top-level harnesses, tests) that
    /// have decided a failure here is unrecoverable.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => panic!("unwrap on error outcome: {e}"),
        }
    }
}

impl<T> Outcome<Outcome<T>> {
    /// Flattens a nested outcome.
    pub fn flatten(self) -> Outcome<T> {
        match self {
            Outcome::Ok(inner) => inner,
            Outcome::Err(e) => Outcome::Err(e),
        }
    }
}

impl<T> From<Result<T, EngineError>> for Outcome<T> {
    fn from(r: Result<T, EngineError>) -> Self {
        match r {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Err(e),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, EngineError> {
    fn from(o: Outcome<T>) -> Self {
        match o {
            Outcome::Ok(v) => Ok(v),
            Outcome::Err(e) => Err(e),
        }
    }
}

/// A void outcome: success with no payload, or failure.
pub type VoidOutcome = Outcome<()>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_short_circuits_on_error() {
        let err: Outcome<i32> = Outcome::err(EngineError::invalid_operation("boom"));
        let result = err.bind(|v| Outcome::ok(v + 1));
        assert!(result.is_err());
    }

    #[test]
    fn bind_chains_on_success() {
        let ok: Outcome<i32> = Outcome::ok(1);
        let result = ok.bind(|v| Outcome::ok(v + 1));
        assert_eq!(result, Outcome::Ok(2));
    }

    #[test]
    fn on_error_substitutes() {
        let err: Outcome<i32> = Outcome::err(EngineError::invalid_operation("boom"));
        assert_eq!(err.on_error(42), Outcome::Ok(42));
        let ok: Outcome<i32> = Outcome::ok(7);
        assert_eq!(ok.on_error(42), Outcome::Ok(7));
    }

    #[test]
    fn match_with_resolves_both_arms() {
        let ok: Outcome<i32> = Outcome::ok(5);
        assert_eq!(ok.match_with(|v| v * 2, |_| -1), 10);
        let err: Outcome<i32> = Outcome::err(EngineError::invalid_operation("boom"));
        assert_eq!(err.match_with(|v| v * 2, |_| -1), -1);
    }

    #[test]
    #[should_panic]
    fn unwrap_panics_on_error() {
        let err: Outcome<i32> = Outcome::err(EngineError::invalid_operation("boom"));
        let _ = err.unwrap();
    }

    #[test]
    fn flatten_collapses_nested() {
        let nested: Outcome<Outcome<i32>> = Outcome::ok(Outcome::ok(3));
        assert_eq!(nested.flatten(), Outcome::Ok(3));
    }
}
