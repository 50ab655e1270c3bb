use tower_lsp::lsp_types::{Position, Range};

use crate::parser::{Field, lexer};

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
}

impl DocumentState {
    pub fn new(content: String) -> Self {
        Self { content }
    }

    /// Text of a 0-based line, or "" past the end
    pub fn line(&self, idx: usize) -> &str {
        self.content.lines().nth(idx).unwrap_or("")
    }
}

/// Convert an LSP (UTF-16) column into a byte offset within `line`
pub fn byte_offset(line: &str, utf16_col: u32) -> usize {
    let mut units = 0u32;
    for (idx, ch) in line.char_indices() {
        if units >= utf16_col {
            return idx;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}

/// Convert a byte offset within `line` into an LSP (UTF-16) column
pub fn utf16_column(line: &str, byte: usize) -> u32 {
    let end = byte.min(line.len());
    line[..end].chars().map(|c| c.len_utf16() as u32).sum()
}

/// Range covering one field of a line, or its non-comment content when
/// `field` is `None` or the line has fewer columns
pub fn field_range(line: &str, line_idx: u32, field: Option<Field>) -> Range {
    let tokens = lexer::tokenize_line(line);

    let (start, end) = match field.and_then(|f| tokens.get(f.index())) {
        Some(token) => (token.start, token.end),
        None => match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0, line.len()),
        },
    };

    Range::new(
        Position::new(line_idx, utf16_column(line, start)),
        Position::new(line_idx, utf16_column(line, end)),
    )
}

/// Index of the column the cursor is in or about to start.
///
/// Returns `None` when the cursor sits inside a comment.
pub fn column_at(line: &str, byte: usize) -> Option<usize> {
    let prefix = &line[..byte.min(line.len())];
    if lexer::strip_comment(prefix).len() < prefix.len() {
        return None;
    }

    let tokens = lexer::tokenize_line(prefix);
    let starting_new = prefix.is_empty() || prefix.ends_with(char::is_whitespace);

    Some(if starting_new {
        tokens.len()
    } else {
        tokens.len().saturating_sub(1)
    })
}
