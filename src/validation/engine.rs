//! Validation Engine
//!
//! Core validation logic separated from parsing and LSP concerns.
//! Validating an entry runs every rule in `rules::RULES` and collects all
//! of their diagnostics; nothing returns early.

use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::parser::{self, Field, FstabEntry, StructuralError};
use crate::validation::rules::RULES;

static BUILTIN_CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
        };
        f.write_str(label)
    }
}

/// What kind of problem a diagnostic describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// The line does not have six fields
    Structural,
    /// An individual field is empty or malformed
    Field,
    /// Mutually exclusive options appear together
    Conflict,
    /// dump or pass outside its domain
    Range,
    /// Two fields contradict each other
    Consistency,
    /// Cautions and recommendations that concern no single defect
    Advisory,
}

/// A diagnostic message for a validation issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Column the diagnostic points at, if it concerns a single one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    /// Stable identifier of the check that produced it
    pub rule: &'static str,
    pub message: String,
}

/// Result of validating one content line.
///
/// Diagnostics are only added through `add_*`, which keeps `is_valid`
/// equal to "no errors recorded".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub line: usize,
    pub raw_line: String,
    is_valid: bool,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    suggestions: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new(line: usize, raw_line: impl Into<String>) -> Self {
        Self {
            line,
            raw_line: raw_line.into(),
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// The result for a line that never became an entry
    pub fn from_structural(error: &StructuralError) -> Self {
        let mut result = Self::new(error.line(), error.raw_line());

        match error {
            StructuralError::InvalidFieldCount { found, .. } => result.add_error(
                DiagnosticKind::Structural,
                None,
                "field-count",
                format!(
                    "Expected {} fields (device, mount point, filesystem, options, dump, pass), found {}",
                    parser::FIELD_COUNT,
                    found
                ),
            ),
        }

        result
    }

    pub fn add_error(
        &mut self,
        kind: DiagnosticKind,
        field: Option<Field>,
        rule: &'static str,
        message: String,
    ) {
        self.is_valid = false;
        let diagnostic = self.diagnostic(Severity::Error, kind, field, rule, message);
        self.errors.push(diagnostic);
    }

    pub fn add_warning(
        &mut self,
        kind: DiagnosticKind,
        field: Option<Field>,
        rule: &'static str,
        message: String,
    ) {
        let diagnostic = self.diagnostic(Severity::Warning, kind, field, rule, message);
        self.warnings.push(diagnostic);
    }

    pub fn add_suggestion(
        &mut self,
        kind: DiagnosticKind,
        field: Option<Field>,
        rule: &'static str,
        message: String,
    ) {
        let diagnostic = self.diagnostic(Severity::Suggestion, kind, field, rule, message);
        self.suggestions.push(diagnostic);
    }

    fn diagnostic(
        &self,
        severity: Severity,
        kind: DiagnosticKind,
        field: Option<Field>,
        rule: &'static str,
        message: String,
    ) -> Diagnostic {
        Diagnostic {
            line: self.line,
            severity,
            kind,
            field,
            rule,
            message,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn suggestions(&self) -> &[Diagnostic] {
        &self.suggestions
    }

    /// True if any error of the given kind was recorded
    pub fn has_error_kind(&self, kind: DiagnosticKind) -> bool {
        self.errors.iter().any(|d| d.kind == kind)
    }

    /// Errors, then warnings, then suggestions
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.suggestions)
    }
}

/// Runs the rule catalog against entries using a given vocabulary
#[derive(Debug, Clone, Copy)]
pub struct EntryValidator<'a> {
    catalog: &'a Catalog,
}

impl<'a> EntryValidator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Validate one entry; every rule runs regardless of earlier findings
    pub fn validate(&self, entry: &FstabEntry) -> ValidationResult {
        let mut result = ValidationResult::new(entry.line_number, entry.raw_line.as_str());

        for rule in &RULES {
            (rule.check)(entry, self.catalog, &mut result);
        }

        result
    }

    /// Validate a parse outcome, folding structural errors into a result
    pub fn validate_parsed(&self, parsed: &parser::ParsedLine) -> ValidationResult {
        match parsed {
            Ok(entry) => self.validate(entry),
            Err(error) => ValidationResult::from_structural(error),
        }
    }

    /// Parse and validate a single line; `None` for blank or comment lines
    pub fn validate_line(&self, line_number: usize, line: &str) -> Option<ValidationResult> {
        parser::parse_line(line_number, line).map(|parsed| self.validate_parsed(&parsed))
    }
}

impl Default for EntryValidator<'static> {
    fn default() -> Self {
        Self::new(&BUILTIN_CATALOG)
    }
}

/// Validate one entry against the built-in catalog
pub fn validate_entry(entry: &FstabEntry) -> ValidationResult {
    EntryValidator::default().validate(entry)
}

/// Validate one entry against a layered catalog
pub fn validate_entry_with(entry: &FstabEntry, catalog: &Catalog) -> ValidationResult {
    EntryValidator::new(catalog).validate(entry)
}
