use std::ops::Range;

use serde::Serialize;

/// Byte-offset span into Logic source text. Start is inclusive, end is exclusive.
///
/// Spans only exist for trees that came out of the textual parser; JSON and
/// XML documents identify nodes by id alone. Line/column pairs are computed
/// on demand through [`LineIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// A zero-width span at `offset`.
    pub fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The span as a `usize` range, the form ariadne labels expect.
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Line start offsets of a source file, for turning byte offsets into
/// 1-based (line, column) pairs.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    ///
    /// Columns count bytes from the start of the line.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_empty() {
        let span = Span::new(4, 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::point(3).is_empty());
    }

    #[test]
    fn span_merge_covers_both() {
        let merged = Span::new(10, 12).merge(Span::new(2, 5));
        assert_eq!(merged, Span::new(2, 12));
    }

    #[test]
    fn span_to_range() {
        assert_eq!(Span::new(3, 7).to_range(), 3..7);
    }

    #[test]
    fn line_index_across_declarations() {
        let src = "let a = 1\nlet b = a\n\nlet c = b";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_col(0), (1, 1));
        // 'b' in "let b" is at offset 14
        assert_eq!(idx.line_col(14), (2, 5));
        // the blank line
        assert_eq!(idx.line_col(20), (3, 1));
        assert_eq!(idx.line_col(21), (4, 1));
        assert_eq!(idx.line_count(), 4);
    }

    #[test]
    fn line_index_newline_belongs_to_its_line() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_col(2), (1, 3));
        assert_eq!(idx.line_col(3), (2, 1));
    }
}
