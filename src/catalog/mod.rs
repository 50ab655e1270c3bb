//! fstab Vocabulary Catalog
//!
//! Known filesystems and mount options, loaded from TOML layers.

pub mod loader;
pub mod manager;
pub mod schema;

pub use loader::{CatalogSources, LayerIssue, load_catalog};
pub use manager::CatalogManager;
pub use schema::{Catalog, CatalogFile, RootPassSeverity, TermDef};
