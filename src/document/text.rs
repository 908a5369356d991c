//! Text utilities for position conversion.
//!
//! Provides byte offset <-> LSP position conversion with UTF-16 columns, and
//! identifier lookup around a cursor.

use std::ops::Range;

use tower_lsp::lsp_types::Position;

/// Pre-computed line index for position lookups.
///
/// LSP positions use line/column where column is in UTF-16 code units.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    source: String,
}

impl LineIndex {
    pub fn new(source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte range of `line`, excluding its newline.
    fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        Some(start..end)
    }

    /// Convert a byte offset to an LSP position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let start = self.line_starts[line];
        let offset = offset.min(self.source.len());

        let col: usize = self.source[start..]
            .char_indices()
            .take_while(|&(i, c)| start + i < offset && c != '\n')
            .map(|(_, c)| c.len_utf16())
            .sum();

        Position::new(line as u32, col as u32)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns None if the line is out of bounds; columns past the end of the
    /// line clamp to the line end.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let range = self.line_range(position.line as usize)?;

        let mut utf16_col = 0u32;
        for (i, c) in self.source[range.clone()].char_indices() {
            if utf16_col >= position.character {
                return Some(range.start + i);
            }
            utf16_col += c.len_utf16() as u32;
        }
        Some(range.end)
    }

    /// Convert a byte span to an LSP range.
    pub fn span_to_range(&self, span: &Range<usize>) -> tower_lsp::lsp_types::Range {
        tower_lsp::lsp_types::Range::new(
            self.offset_to_position(span.start),
            self.offset_to_position(span.end),
        )
    }

    /// Span of the identifier touching `offset`, if any.
    ///
    /// A cursor directly after the last character still counts as touching.
    pub fn identifier_at(&self, offset: usize) -> Option<Range<usize>> {
        let bytes = self.source.as_bytes();
        if offset > bytes.len() {
            return None;
        }

        let start = offset - bytes[..offset]
            .iter()
            .rev()
            .take_while(|&&b| is_ident_byte(b))
            .count();
        let end = offset
            + bytes[offset..]
                .iter()
                .take_while(|&&b| is_ident_byte(b))
                .count();

        if start == end || bytes[start].is_ascii_digit() {
            return None;
        }
        Some(start..end)
    }

    /// The partial identifier typed immediately before `offset`.
    pub fn prefix_before(&self, offset: usize) -> &str {
        let before = &self.source[..offset.min(self.source.len())];
        let len = before
            .bytes()
            .rev()
            .take_while(|&b| is_ident_byte(b))
            .count();
        &before[before.len() - len..]
    }
}

/// Identifier characters: ASCII alphanumerics and `$`.
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'$'
}
