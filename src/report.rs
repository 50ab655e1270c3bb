//! Whole-document reports.
//!
//! Folds per-line validation results into a pass/fail summary. Building a
//! report never fails: an empty or comment-only document is a valid
//! document with zero entries.

use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::parser;
use crate::validation::{Diagnostic, EntryValidator, ValidationResult};

/// Pass/fail summary of a validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub entries: Vec<ValidationResult>,
    pub overall_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub total_entries: usize,
}

impl Report {
    pub fn suggestion_count(&self) -> usize {
        self.entries.iter().map(|r| r.suggestions().len()).sum()
    }

    /// All diagnostics in line order; within a line errors come first
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().flat_map(ValidationResult::diagnostics)
    }
}

/// Aggregate per-line results into a report
pub fn summarize(results: Vec<ValidationResult>) -> Report {
    let error_count = results.iter().map(|r| r.errors().len()).sum();
    let warning_count = results.iter().map(|r| r.warnings().len()).sum();

    Report {
        total_entries: results.len(),
        overall_valid: error_count == 0,
        error_count,
        warning_count,
        entries: results,
    }
}

/// Parse, validate and summarize a document against the built-in catalog
pub fn validate_document(text: &str) -> Report {
    run(text, EntryValidator::default())
}

/// Parse, validate and summarize a document against a layered catalog
pub fn validate_document_with(text: &str, catalog: &Catalog) -> Report {
    run(text, EntryValidator::new(catalog))
}

fn run(text: &str, validator: EntryValidator<'_>) -> Report {
    let results: Vec<ValidationResult> = parser::parse_document(text)
        .iter()
        .map(|parsed| validator.validate_parsed(parsed))
        .collect();

    let report = summarize(results);
    log::debug!(
        "Validated {} entries: {} errors, {} warnings",
        report.total_entries,
        report.error_count,
        report.warning_count
    );
    report
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            if entry.diagnostics().next().is_none() {
                continue;
            }
            writeln!(f, "line {}: {}", entry.line, entry.raw_line.trim())?;
            for diagnostic in entry.diagnostics() {
                writeln!(
                    f,
                    "  {}: {} [{}]",
                    diagnostic.severity, diagnostic.message, diagnostic.rule
                )?;
            }
        }

        write!(
            f,
            "{} {} checked, {} {}, {} {}: {}",
            self.total_entries,
            plural(self.total_entries, "entry", "entries"),
            self.error_count,
            plural(self.error_count, "error", "errors"),
            self.warning_count,
            plural(self.warning_count, "warning", "warnings"),
            if self.overall_valid { "valid" } else { "invalid" }
        )
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DiagnosticKind;

    #[test]
    fn test_summarize_empty() {
        let report = summarize(Vec::new());
        assert_eq!(report.total_entries, 0);
        assert!(report.overall_valid);
        assert_eq!(report.error_count, 0);
        assert_eq!(report.warning_count, 0);
    }

    #[test]
    fn test_summarize_counts() {
        let mut bad = ValidationResult::new(1, "a");
        bad.add_error(DiagnosticKind::Range, None, "e1", "one".to_string());
        bad.add_error(DiagnosticKind::Field, None, "e2", "two".to_string());
        let mut warned = ValidationResult::new(2, "b");
        warned.add_warning(DiagnosticKind::Field, None, "w", "three".to_string());
        warned.add_suggestion(DiagnosticKind::Advisory, None, "s", "four".to_string());

        let report = summarize(vec![bad, warned]);
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.suggestion_count(), 1);
        assert!(!report.overall_valid);
        let lines: Vec<_> = report.diagnostics().map(|d| d.line).collect();
        assert_eq!(lines, [1, 1, 2, 2]);
    }

    #[test]
    fn test_structural_errors_count_as_entries() {
        let report = validate_document("/dev/sda1 /data\n/dev/sda2 /srv ext4 defaults 0 2\n");
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.error_count, 1);
        assert!(!report.overall_valid);
        assert!(report.entries[0].has_error_kind(DiagnosticKind::Structural));
    }

    #[test]
    fn test_display_summary_line() {
        let report = validate_document("# nothing here\n");
        assert_eq!(report.to_string(), "0 entries checked, 0 errors, 0 warnings: valid");

        let report = validate_document("/dev/sdb1 /mnt ext4 defaults 0 3\n");
        let text = report.to_string();
        assert!(text.starts_with("line 1: /dev/sdb1 /mnt ext4 defaults 0 3\n"));
        assert!(text.contains("  error: Pass field must be 0, 1 or 2, got '3' [pass-range]"));
        assert!(text.ends_with("1 entry checked, 1 error, 0 warnings: invalid"));
    }

    #[test]
    fn test_json_shape() {
        let report = validate_document("swap swap swap sw 0 0\n");
        let json = serde_json::to_value(&report).expect("serialize report");

        assert_eq!(json["overallValid"], true);
        assert_eq!(json["totalEntries"], 1);
        assert_eq!(json["entries"][0]["isValid"], true);
        assert_eq!(json["entries"][0]["rawLine"], "swap swap swap sw 0 0");
    }
}
