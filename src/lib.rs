//! fstab Language Server
//!
//! Parsing and validation of `/etc/fstab` content, plus the hosts that
//! expose it.
//!
//! This library provides:
//! - fstab parsing into structured entries
//! - A deterministic rule catalog producing errors, warnings and suggestions
//! - Whole-document reports
//! - A TOML-defined vocabulary of filesystems and mount options
//! - LSP protocol implementation

pub mod catalog;
pub mod config;
pub mod lsp;
pub mod parser;
pub mod report;
pub mod validation;

// Re-exports for clean public API
pub use catalog::{Catalog, CatalogSources, load_catalog};
pub use config::Config;
pub use parser::{Device, FstabEntry, StructuralError, parse_document, parse_line};
pub use report::{Report, summarize, validate_document, validate_document_with};
pub use validation::{Diagnostic, DiagnosticKind, Severity, ValidationResult, validate_entry};
