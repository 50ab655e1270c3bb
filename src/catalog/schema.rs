//! Catalog Schema Types
//!
//! The vocabulary the validator checks against: known filesystem types,
//! recognized mount options and a few tunable thresholds.

use std::collections::HashMap;

use serde::Deserialize;

const BUILTIN_CATALOG: &str = include_str!("../../resources/catalog/linux.fstab-catalog.toml");

/// Filesystems the validator accepts without a warning, even if the
/// embedded catalog cannot be read.
pub const CORE_FILESYSTEMS: [&str; 14] = [
    "ext4", "ext3", "ext2", "xfs", "btrfs", "ntfs", "fat32", "vfat", "iso9660", "tmpfs", "swap",
    "auto", "nfs", "cifs",
];

const CORE_OPTIONS: [&str; 8] = ["defaults", "ro", "rw", "sync", "async", "auto", "noauto", "sw"];

/// Root catalog file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogFile {
    pub catalog: CatalogMeta,
    #[serde(default)]
    pub filesystems: Vec<TermDef>,
    #[serde(default)]
    pub options: Vec<TermDef>,
}

/// Catalog metadata and scalar settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub min_label_length: Option<usize>,
    pub root_pass_severity: Option<RootPassSeverity>,
}

/// A filesystem type or mount option with optional documentation
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TermDef {
    pub name: String,
    pub description: Option<String>,
}

/// How a root entry with a pass value other than 1 is reported
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RootPassSeverity {
    #[default]
    Warning,
    Error,
}

/// Runtime catalog (optimized for lookups)
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Names of the layers applied, lowest priority first
    pub layers: Vec<String>,
    pub filesystems: HashMap<String, TermDef>,
    pub options: HashMap<String, TermDef>,
    pub min_label_length: usize,
    pub root_pass_severity: RootPassSeverity,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// An empty catalog with default thresholds
    pub fn empty() -> Self {
        Self {
            layers: Vec::new(),
            filesystems: HashMap::new(),
            options: HashMap::new(),
            min_label_length: 2,
            root_pass_severity: RootPassSeverity::Warning,
        }
    }

    /// The catalog embedded in the binary
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();

        match toml::from_str::<CatalogFile>(BUILTIN_CATALOG) {
            Ok(file) => catalog.apply(file),
            Err(e) => {
                log::warn!(
                    "Failed to parse embedded fstab catalog: {}. Using minimal fallback.",
                    e
                );
                catalog.add_minimal_fallback();
            }
        }

        catalog
    }

    fn add_minimal_fallback(&mut self) {
        for name in CORE_FILESYSTEMS {
            self.filesystems.insert(name.to_string(), TermDef::bare(name));
        }
        for name in CORE_OPTIONS {
            self.options.insert(name.to_string(), TermDef::bare(name));
        }
        self.layers.push("minimal-fallback".to_string());
    }

    /// Layer a catalog file on top of this one.
    ///
    /// Terms are only ever added (a later description replaces an earlier
    /// one); scalar settings are replaced when the file sets them.
    pub fn apply(&mut self, file: CatalogFile) {
        for term in file.filesystems {
            self.filesystems.insert(term.name.clone(), term);
        }
        for term in file.options {
            self.options.insert(term.name.clone(), term);
        }
        if let Some(min) = file.catalog.min_label_length {
            self.min_label_length = min;
        }
        if let Some(severity) = file.catalog.root_pass_severity {
            self.root_pass_severity = severity;
        }
        self.layers.push(file.catalog.name);
    }

    pub fn is_known_filesystem(&self, name: &str) -> bool {
        self.filesystems.contains_key(name)
    }

    pub fn is_known_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn filesystem(&self, name: &str) -> Option<&TermDef> {
        self.filesystems.get(name)
    }

    pub fn option(&self, name: &str) -> Option<&TermDef> {
        self.options.get(name)
    }

    /// Filesystem names in alphabetical order
    pub fn filesystem_names(&self) -> Vec<&str> {
        sorted_keys(&self.filesystems)
    }

    /// Option names in alphabetical order
    pub fn option_names(&self) -> Vec<&str> {
        sorted_keys(&self.options)
    }
}

impl TermDef {
    fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    pub fn describe(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }
}

fn sorted_keys(map: &HashMap<String, TermDef>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
