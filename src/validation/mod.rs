//! Validation Engine
//!
//! Clean separation of validation logic from parsing and LSP concerns.

pub mod engine;
pub mod rules;

pub use engine::{
    Diagnostic, DiagnosticKind, EntryValidator, Severity, ValidationResult, validate_entry,
    validate_entry_with,
};
pub use rules::{RULES, Rule, RuleFn};
