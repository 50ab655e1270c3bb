//! Layered catalog loading
//!
//! Loading priority: built-in < user-global < workspace < explicit
//! directories. Each directory contributes its `*.toml` files in file-name
//! order. A file that fails to parse is skipped with a warning so one bad
//! layer never disables validation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::schema::{Catalog, CatalogFile, RootPassSeverity};

/// Where catalog layers come from and how they are post-processed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSources {
    /// Directories to scan, lowest priority first
    pub dirs: Vec<PathBuf>,
    /// Report a root entry without pass 1 as an error regardless of layers
    pub strict_root_pass: bool,
}

/// A problem encountered while loading a single layer
#[derive(Debug)]
pub struct LayerIssue {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Build the effective catalog from the built-in layer plus `sources`.
///
/// Returns the catalog and every layer that had to be skipped.
pub fn load_catalog(sources: &CatalogSources) -> (Catalog, Vec<LayerIssue>) {
    let mut catalog = Catalog::builtin();
    let mut issues = Vec::new();

    for dir in &sources.dirs {
        match catalog_files_in(dir) {
            Ok(files) => {
                for path in files {
                    match load_catalog_file(&path) {
                        Ok(file) => {
                            log::debug!("Applying catalog layer {}", path.display());
                            catalog.apply(file);
                        }
                        Err(error) => {
                            log::warn!("Skipping catalog layer: {:#}", error);
                            issues.push(LayerIssue { path, error });
                        }
                    }
                }
            }
            Err(error) => {
                log::warn!("Skipping catalog directory: {:#}", error);
                issues.push(LayerIssue {
                    path: dir.clone(),
                    error,
                });
            }
        }
    }

    if sources.strict_root_pass {
        catalog.root_pass_severity = RootPassSeverity::Error;
    }

    log::debug!(
        "Catalog ready: {} filesystems, {} options, layers {:?}",
        catalog.filesystems.len(),
        catalog.options.len(),
        catalog.layers
    );

    (catalog, issues)
}

/// List the `*.toml` files of a directory in file-name order.
///
/// A missing directory is not an error and yields no files.
pub fn catalog_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read catalog directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read catalog directory: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse a single catalog file
pub fn load_catalog_file(path: &Path) -> Result<CatalogFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    parse_catalog_content(&content, Some(path))
}

/// Parse catalog content from a TOML string
pub fn parse_catalog_content(content: &str, source_path: Option<&Path>) -> Result<CatalogFile> {
    toml::from_str(content).with_context(|| match source_path {
        Some(path) => format!("Failed to parse catalog TOML: {}", path.display()),
        None => "Failed to parse catalog TOML".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sources_is_builtin() {
        let (catalog, issues) = load_catalog(&CatalogSources::default());
        assert!(issues.is_empty());
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn test_strict_root_pass_overrides() {
        let sources = CatalogSources {
            dirs: Vec::new(),
            strict_root_pass: true,
        };
        let (catalog, _) = load_catalog(&sources);
        assert_eq!(catalog.root_pass_severity, RootPassSeverity::Error);
    }

    #[test]
    fn test_missing_directory_is_ignored() {
        let files = catalog_files_in(Path::new("/definitely/not/a/catalog/dir"))
            .expect("missing dir is fine");
        assert!(files.is_empty());
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = parse_catalog_content("[catalog", Some(Path::new("broken.toml")))
            .expect_err("invalid toml");
        assert!(format!("{:#}", err).contains("broken.toml"));
    }

    #[test]
    fn test_catalog_requires_name() {
        assert!(parse_catalog_content("[catalog]\n", None).is_err());
    }
}
