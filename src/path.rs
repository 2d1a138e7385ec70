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

//! Logical path: an immutable, slash-separated address into the field
//! tree. See spec §3 and §4.2.

use alloc::borrow::ToOwned as _;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::error::EngineError;

/// An immutable, normalized slash-separated path.
///
/// Normal form: absolute paths start with `/`; `.` segments are elided;
/// `..` segments collapse against the preceding non-parent segment when
/// one exists; an empty result becomes `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalPath {
    absolute: bool,
    segments: Vec<String>,
}

impl LogicalPath {
    /// The root path, `/`.
    pub fn root() -> Self {
        LogicalPath {
            absolute: true,
            segments: Vec::new(),
        }
    }

    /// The empty relative path, `.`.
    pub fn current() -> Self {
        LogicalPath {
            absolute: false,
            segments: Vec::new(),
        }
    }

    /// Parses and normalizes a path string.
    pub fn parse(raw: &str) -> Self {
        let absolute = raw.starts_with('/');
        let mut segments: Vec<String> = Vec::new();
        for part in raw.split('/') {
            match part {
                "" | "." => continue,
                ".." => {
                    if segments.pop().is_none() && !absolute {
                        // Relative path stepping above its own root: keep
                        // the `..` as a literal segment so `relative_to`
                        // can still express "go up further than depth".
                        segments.push("..".to_owned());
                    }
                }
                seg => segments.push(seg.to_owned()),
            }
        }
        LogicalPath { absolute, segments }
    }

    /// Renders the path back to its normalized string form.
    pub fn to_normalized_string(&self) -> String {
        if self.segments.is_empty() {
            return if self.absolute {
                "/".to_owned()
            } else {
                ".".to_owned()
            };
        }
        let mut out = String::new();
        if self.absolute {
            out.push('/');
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(seg);
        }
        out
    }

    /// Whether this path starts from the tree root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Whether this path is exactly the root (`/`).
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// Number of named segments (root and `.` both have depth 0).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last named segment, if any.
    pub fn node_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// The parent path. The parent of root is root.
    pub fn parent(&self) -> LogicalPath {
        if self.segments.is_empty() {
            return self.clone();
        }
        let mut segments = self.segments.clone();
        segments.pop();
        LogicalPath {
            absolute: self.absolute,
            segments,
        }
    }

    /// Combines this path with `other`. If `other` is absolute it
    /// replaces `self` outright; otherwise the two are joined with `/`
    /// and renormalized.
    pub fn combine(&self, other: &LogicalPath) -> LogicalPath {
        if other.absolute {
            return other.clone();
        }
        let mut segments = self.segments.clone();
        for seg in &other.segments {
            if seg == ".." {
                if segments.pop().is_none() && !self.absolute {
                    segments.push("..".to_owned());
                }
            } else {
                segments.push(seg.clone());
            }
        }
        LogicalPath {
            absolute: self.absolute,
            segments,
        }
    }

    /// Returns `self` expressed relative to `other`. Both paths must be
    /// of the same kind (both absolute or both relative).
    pub fn relative_to(&self, other: &LogicalPath) -> Result<LogicalPath, EngineError> {
        if self.absolute != other.absolute {
            return Err(EngineError::argument_invalid(
                "relative_to requires paths of the same kind",
            ));
        }
        let common = common_len(&self.segments, &other.segments);
        let up = other.segments.len() - common;
        let mut segments: Vec<String> = Vec::with_capacity(up + self.segments.len() - common);
        for _ in 0..up {
            segments.push("..".to_owned());
        }
        segments.extend(self.segments[common..].iter().cloned());
        Ok(LogicalPath {
            absolute: false,
            segments,
        })
    }

    /// The longest common ancestor path shared by `self` and `other`.
    /// Fails if the two paths are not the same kind.
    pub fn common_prefix(&self, other: &LogicalPath) -> Result<LogicalPath, EngineError> {
        if self.absolute != other.absolute {
            return Err(EngineError::argument_invalid(
                "common_prefix requires paths of the same kind",
            ));
        }
        let common = common_len(&self.segments, &other.segments);
        Ok(LogicalPath {
            absolute: self.absolute,
            segments: self.segments[..common].to_vec(),
        })
    }
}

fn common_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_normalized_string())
    }
}

impl From<&str> for LogicalPath {
    fn from(raw: &str) -> Self {
        LogicalPath::parse(raw)
    }
}

impl From<String> for LogicalPath {
    fn from(raw: String) -> Self {
        LogicalPath::parse(&raw)
    }
}

/// Lexicographic order over segments, separator treated as lowest.
/// Comparing an absolute path to a relative one has no defined order.
impl PartialOrd for LogicalPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.absolute != other.absolute {
            return None;
        }
        Some(self.segments.cmp(&other.segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_examples_from_spec() {
        assert_eq!(LogicalPath::parse("/a/b/../c").to_normalized_string(), "/a/c");
        assert_eq!(LogicalPath::parse("./a").to_normalized_string(), "a");
        assert_eq!(LogicalPath::parse("/").to_normalized_string(), "/");
        assert_eq!(LogicalPath::parse("").to_normalized_string(), ".");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["/a/b/../c", "./a", "/", "", "a/b/c", "../../x", "/x/../../y"] {
            let once = LogicalPath::parse(raw).to_normalized_string();
            let twice = LogicalPath::parse(&once).to_normalized_string();
            assert_eq!(once, twice, "input {raw:?}");
        }
    }

    #[test]
    fn combine_absolute_right_operand_wins() {
        let a = LogicalPath::parse("/a/b");
        let root = LogicalPath::parse("/");
        assert_eq!(a.combine(&root), root);
        let other_abs = LogicalPath::parse("/x/y");
        assert_eq!(a.combine(&other_abs), other_abs);
    }

    #[test]
    fn combine_relative_joins() {
        let a = LogicalPath::parse("/a/b");
        let rel = LogicalPath::parse("c/d");
        assert_eq!(a.combine(&rel).to_normalized_string(), "/a/b/c/d");
    }

    #[test]
    fn combine_absoluteness_rule() {
        let a = LogicalPath::parse("/a");
        let b = LogicalPath::parse("c");
        assert!(a.combine(&b).is_absolute());

        let a = LogicalPath::parse("x");
        let b = LogicalPath::parse("y");
        assert!(!a.combine(&b).is_absolute());
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(LogicalPath::root().parent(), LogicalPath::root());
    }

    #[test]
    fn relative_to_produces_up_then_tail() {
        let a = LogicalPath::parse("/a/b/c");
        let b = LogicalPath::parse("/a/x/y");
        let rel = a.relative_to(&b).unwrap();
        // common prefix is /a; from b (depth 3) up to /a is two `..`,
        // then the tail of a beyond /a is b/c.
        assert_eq!(rel.to_normalized_string(), "../../b/c");
    }

    #[test]
    fn relative_to_rejects_mixed_kinds() {
        let a = LogicalPath::parse("/a");
        let b = LogicalPath::parse("a");
        assert!(a.relative_to(&b).is_err());
    }

    #[test]
    fn compare_across_kinds_fails() {
        let a = LogicalPath::parse("/a");
        let b = LogicalPath::parse("a");
        assert_eq!(a.partial_cmp(&b), None);
    }
}
