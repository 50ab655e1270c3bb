//! Configuration management for the fstab tools.
//!
//! Handles:
//! - Command-line argument parsing for `fstab-ls` and `fstab-check`
//! - Catalog directory discovery
//! - Logger initialisation

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

/// Flags shared by every binary
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// Extra catalog directories, applied after the default ones
    #[arg(long = "catalog-dir", help = "Directory containing catalog TOML files")]
    pub catalog_dirs: Vec<PathBuf>,

    /// Treat a root entry without pass 1 as an error
    #[arg(long, help = "Report root filesystems not checked first as errors")]
    pub strict_root_pass: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Command-line arguments for the fstab language server
#[derive(Debug, Parser)]
#[command(name = "fstab-ls")]
#[command(about = "Language server for /etc/fstab files")]
#[command(version)]
pub struct ServerArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format of `fstab-check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments for the fstab checker
#[derive(Debug, Parser)]
#[command(name = "fstab-check")]
#[command(about = "Validate fstab files and report errors, warnings and suggestions")]
#[command(version)]
pub struct CheckArgs {
    /// Files to check; `-` reads standard input
    #[arg(default_value = "-")]
    pub files: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Hide suggestions in text output
    #[arg(long)]
    pub quiet: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog directories, lowest priority first
    pub catalog_dirs: Vec<PathBuf>,
    pub strict_root_pass: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_common(args: CommonArgs) -> Result<Self> {
        let mut catalog_dirs = Vec::new();

        // User global directory: ~/.config/fstab-ls/catalog/
        if let Some(config_dir) = dirs::config_dir() {
            catalog_dirs.push(config_dir.join("fstab-ls").join("catalog"));
        }

        // Current workspace directory: ./.fstab-ls/catalog/
        catalog_dirs.push(std::env::current_dir()?.join(".fstab-ls").join("catalog"));

        catalog_dirs.extend(args.catalog_dirs);

        Ok(Config {
            catalog_dirs,
            strict_root_pass: args.strict_root_pass,
            log_level: args.log_level,
        })
    }

    pub fn catalog_sources(&self) -> crate::catalog::CatalogSources {
        crate::catalog::CatalogSources {
            dirs: self.catalog_dirs.clone(),
            strict_root_pass: self.strict_root_pass,
        }
    }

    /// Install the global logger; RUST_LOG wins over `--log-level`
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}
