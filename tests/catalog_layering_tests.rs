//! Catalog layers loaded from disk and their effect on validation
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use fstab_language_server::catalog::{CatalogSources, RootPassSeverity, load_catalog};
use fstab_language_server::{Catalog, validate_document_with};

fn write_layer(dir: &Path, file_name: &str, content: &str) {
    fs::write(dir.join(file_name), content).expect("write catalog layer");
}

fn sources(dirs: &[&TempDir]) -> CatalogSources {
    CatalogSources {
        dirs: dirs.iter().map(|d| d.path().to_path_buf()).collect(),
        strict_root_pass: false,
    }
}

#[test]
fn workspace_layer_adds_filesystems_and_options() {
    let dir = TempDir::new().expect("temp dir");
    write_layer(
        dir.path(),
        "site.toml",
        r#"
[catalog]
name = "site"

[[filesystems]]
name = "zfs"
description = "OpenZFS dataset"

[[options]]
name = "x-gvfs-show"
"#,
    );

    let (catalog, issues) = load_catalog(&sources(&[&dir]));
    assert!(issues.is_empty());
    assert!(catalog.is_known_filesystem("zfs"));
    assert!(catalog.is_known_filesystem("ext4"));
    assert!(catalog.is_known_option("x-gvfs-show"));
    assert_eq!(catalog.layers, ["linux", "site"]);

    let report = validate_document_with("UUID=ab12-cd34 /tank zfs x-gvfs-show 0 0", &catalog);
    assert!(report.overall_valid);
    assert_eq!(report.warning_count, 0);
}

#[test]
fn later_directories_override_scalar_settings() {
    let global = TempDir::new().expect("temp dir");
    let workspace = TempDir::new().expect("temp dir");
    write_layer(
        global.path(),
        "global.toml",
        "[catalog]\nname = \"global\"\nmin_label_length = 4\n",
    );
    write_layer(
        workspace.path(),
        "workspace.toml",
        "[catalog]\nname = \"workspace\"\nmin_label_length = 3\n",
    );

    let (catalog, _) = load_catalog(&sources(&[&global, &workspace]));
    assert_eq!(catalog.min_label_length, 3);
    assert_eq!(catalog.layers, ["linux", "global", "workspace"]);

    let report = validate_document_with("LABEL=ab /data ext4 noatime 1 2", &catalog);
    assert_eq!(report.entries[0].warnings()[0].rule, "device-label-short");
}

#[test]
fn files_in_one_directory_apply_in_name_order() {
    let dir = TempDir::new().expect("temp dir");
    write_layer(
        dir.path(),
        "20-late.toml",
        "[catalog]\nname = \"late\"\nmin_label_length = 8\n",
    );
    write_layer(
        dir.path(),
        "10-early.toml",
        "[catalog]\nname = \"early\"\nmin_label_length = 5\n",
    );
    write_layer(dir.path(), "notes.txt", "not a catalog");

    let (catalog, issues) = load_catalog(&sources(&[&dir]));
    assert!(issues.is_empty());
    assert_eq!(catalog.layers, ["linux", "early", "late"]);
    assert_eq!(catalog.min_label_length, 8);
}

#[test]
fn broken_layer_is_skipped_and_reported() {
    let dir = TempDir::new().expect("temp dir");
    write_layer(dir.path(), "a-broken.toml", "[catalog\nname = ");
    write_layer(
        dir.path(),
        "b-good.toml",
        "[catalog]\nname = \"good\"\n\n[[filesystems]]\nname = \"f2fs\"\n",
    );

    let (catalog, issues) = load_catalog(&sources(&[&dir]));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].path.ends_with("a-broken.toml"));
    assert!(format!("{:#}", issues[0].error).contains("a-broken.toml"));
    assert!(catalog.is_known_filesystem("f2fs"));
    assert_eq!(catalog.layers, ["linux", "good"]);
}

#[test]
fn missing_directories_fall_back_to_builtin() {
    let sources = CatalogSources {
        dirs: vec!["/no/such/fstab-ls/catalog".into()],
        strict_root_pass: false,
    };
    let (catalog, issues) = load_catalog(&sources);
    assert!(issues.is_empty());
    assert_eq!(catalog, Catalog::builtin());
}

#[test]
fn layer_can_make_root_pass_an_error() {
    let dir = TempDir::new().expect("temp dir");
    write_layer(
        dir.path(),
        "strict.toml",
        "[catalog]\nname = \"strict\"\nroot_pass_severity = \"error\"\n",
    );

    let (catalog, _) = load_catalog(&sources(&[&dir]));
    assert_eq!(catalog.root_pass_severity, RootPassSeverity::Error);

    let report = validate_document_with("UUID=1234-5678 / ext4 defaults 0 2", &catalog);
    assert!(!report.overall_valid);
    assert_eq!(report.entries[0].errors()[0].rule, "root-pass");
}

#[test]
fn strict_flag_wins_over_layers() {
    let dir = TempDir::new().expect("temp dir");
    write_layer(
        dir.path(),
        "lenient.toml",
        "[catalog]\nname = \"lenient\"\nroot_pass_severity = \"warning\"\n",
    );

    let mut sources = sources(&[&dir]);
    sources.strict_root_pass = true;
    let (catalog, _) = load_catalog(&sources);
    assert_eq!(catalog.root_pass_severity, RootPassSeverity::Error);

    let default_report =
        validate_document_with("UUID=1234-5678 / ext4 defaults 0 2", &Catalog::builtin());
    assert!(default_report.overall_valid);
    assert_eq!(default_report.warning_count, 2);
}
