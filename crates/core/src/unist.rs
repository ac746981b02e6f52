//! Source positions shared by the element tree and the code tree.

use crate::error::SourceLocation;

/// One place in the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// Byte offset (0-indexed).
    pub offset: usize,
}

impl Point {
    /// Creates a point.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Start and end of a node in the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Place of the first character.
    pub start: Point,
    /// Place after the last character.
    pub end: Point,
}

impl Position {
    /// Creates a position from start and end line/column/offset triples.
    pub fn new(
        start_line: usize,
        start_column: usize,
        start_offset: usize,
        end_line: usize,
        end_column: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            start: Point::new(start_line, start_column, start_offset),
            end: Point::new(end_line, end_column, end_offset),
        }
    }

    /// Location of the start point, for diagnostics.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.start.line, self.start.column)
    }
}
