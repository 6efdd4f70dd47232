//! Byte-offset to line/column conversion.

pub use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// A zero-based line/column pair measured in UTF-8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Precomputed line starts for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset where each line begins; `line_starts[0] == 0`.
    line_starts: Vec<TextSize>,
    text: Box<str>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            text: text.into(),
        }
    }

    /// Convert a byte offset to a zero-based byte line/column. O(log n).
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        LineCol {
            line: line as u32,
            col: col.into(),
        }
    }

    /// Convert a byte offset to a [`Position`] (1-based line, 0-based character column).
    pub fn position(&self, offset: TextSize) -> Position {
        let lc = self.line_col(offset);
        let start = usize::from(self.line_starts[lc.line as usize]);
        let end = usize::from(offset).min(self.text.len());
        let column = self
            .text
            .get(start..end)
            .map(|s| s.chars().count() as u32)
            .unwrap_or(lc.col);
        Position::new(lc.line + 1, column)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_basic() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(TextSize::new(4)), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 2, col: 0 });
        assert_eq!(index.line_col(TextSize::new(8)), LineCol { line: 3, col: 1 });
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_position_counts_characters() {
        let index = LineIndex::new("x = 'é'\ny");
        // byte 7 is the closing quote, after a two-byte character
        assert_eq!(index.position(TextSize::new(7)), Position::new(1, 6));
        assert_eq!(index.position(TextSize::new(9)), Position::new(2, 0));
    }
}
