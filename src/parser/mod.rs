//! fstab Parser
//!
//! Turns raw text into structured entries or per-line structural errors.
//! Parsing never fails as a whole: a malformed line yields an error value
//! for that line and the remaining lines are still parsed.

pub mod ast;
pub mod lexer;

pub use ast::{Device, Field, FstabEntry, NumericField, Span, StructuralError};
pub use lexer::{Token, strip_comment, tokenize_line};

/// Number of whitespace-separated fields in a valid fstab line
pub const FIELD_COUNT: usize = 6;

/// Outcome of parsing a single content line
pub type ParsedLine = Result<FstabEntry, StructuralError>;

/// Parse a single line of fstab text.
///
/// Returns `None` for blank and comment-only lines. `line_number` is
/// 1-based and only used for provenance.
pub fn parse_line(line_number: usize, line: &str) -> Option<ParsedLine> {
    let tokens = lexer::tokenize_line(line);

    if tokens.is_empty() {
        return None;
    }

    if tokens.len() != FIELD_COUNT {
        return Some(Err(StructuralError::InvalidFieldCount {
            line: line_number,
            raw_line: line.to_string(),
            found: tokens.len(),
        }));
    }

    let mut spans = [Span::default(); FIELD_COUNT];
    for (span, token) in spans.iter_mut().zip(&tokens) {
        *span = Span {
            start: token.start,
            end: token.end,
        };
    }

    Some(Ok(FstabEntry {
        device: Device::classify(tokens[0].text),
        mount_point: tokens[1].text.to_string(),
        filesystem: tokens[2].text.to_string(),
        options: split_options(tokens[3].text),
        dump: NumericField::parse(tokens[4].text),
        pass: NumericField::parse(tokens[5].text),
        line_number,
        raw_line: line.to_string(),
        spans,
    }))
}

/// Parse a whole document, one result per content line in source order
pub fn parse_document(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

/// Split an options column on commas, trimming and dropping empty items
pub fn split_options(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|opt| !opt.is_empty())
        .map(str::to_string)
        .collect()
}
