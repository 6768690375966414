use std::fmt;

use serde::Serialize;

use super::errors::ConstructionError;

/// A 1-based line/column pair, ordered line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source span of a node together with the source lines it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    start: Position,
    end: Position,
    lines: Vec<String>,
}

impl SourcePosition {
    pub fn new(start: Position, end: Position, lines: Vec<String>) -> Result<Self, ConstructionError> {
        if let Some(&position) = [start, end].iter().find(|p| p.line == 0 || p.column == 0) {
            return Err(ConstructionError::ZeroPosition { position });
        }
        if end < start {
            return Err(ConstructionError::InvalidSourcePosition { start, end });
        }
        Ok(SourcePosition { start, end, lines })
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn start_line(&self) -> usize {
        self.start.line
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of characters spanned, counting one per line break.
    pub fn length(&self) -> usize {
        if self.start.line == self.end.line {
            return self.end.column.saturating_sub(self.start.column);
        }
        let first_line = self.lines.first().map_or(0, |l| l.chars().count());
        let first_line_to_end = first_line.saturating_sub(self.start.column.saturating_sub(1)) + 1;
        let in_between: usize = self
            .lines
            .iter()
            .skip(1)
            .take(self.end.line.saturating_sub(self.start.line + 1))
            .map(|l| l.chars().count() + 1)
            .sum();
        first_line_to_end + in_between + self.end.column
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}
