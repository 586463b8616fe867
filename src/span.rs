//! Source span primitives: positions, ranges, and containment tests.
//!
//! Everything downstream (the capture interpreter, the scope linker, the
//! formatter's grouping rules) reasons about source geometry through these
//! two types. Lines and columns are 0-indexed, matching tree-sitter points;
//! display ids add 1 to the line at render time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (line, column) position, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column)
    }
}

/// A half-open span of source text between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Containment test used for scope reasoning: strict on line, inclusive
    /// on column when the boundary lines coincide.
    ///
    /// `inner` counts as within `self` when it starts at or after `self`'s
    /// start and ends at or before `self`'s end.
    pub fn contains(&self, inner: &Range) -> bool {
        let starts_after = inner.start.line > self.start.line
            || (inner.start.line == self.start.line && inner.start.column >= self.start.column);
        let ends_before = inner.end.line < self.end.line
            || (inner.end.line == self.end.line && inner.end.column <= self.end.column);
        starts_after && ends_before
    }

    /// Number of lines the range spans. The scope linker picks the candidate
    /// with the smallest line span as the most specific container.
    pub fn line_span(&self) -> usize {
        self.end.line.saturating_sub(self.start.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sl: usize, sc: usize, el: usize, ec: usize) -> Range {
        Range::new(Pos::new(sl, sc), Pos::new(el, ec))
    }

    #[test]
    fn test_contains_nested_lines() {
        let outer = range(0, 0, 10, 1);
        let inner = range(2, 4, 3, 8);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_contains_inclusive_columns_on_shared_line() {
        let outer = range(5, 4, 5, 20);
        assert!(outer.contains(&range(5, 4, 5, 20)));
        assert!(outer.contains(&range(5, 6, 5, 18)));
        assert!(!outer.contains(&range(5, 3, 5, 18)));
        assert!(!outer.contains(&range(5, 6, 5, 21)));
    }

    #[test]
    fn test_range_contains_itself() {
        let r = range(1, 2, 3, 4);
        assert!(r.contains(&r));
    }

    #[test]
    fn test_line_span() {
        assert_eq!(range(2, 0, 2, 10).line_span(), 0);
        assert_eq!(range(2, 0, 7, 1).line_span(), 5);
    }
}
