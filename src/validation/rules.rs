//! The fstab rule catalog.
//!
//! Each rule inspects an entry and appends zero or more diagnostics. Rules
//! are independent and run in the order of `RULES`, which fixes the order
//! of the resulting diagnostics.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, RootPassSeverity};
use crate::parser::{Device, Field, FstabEntry};
use crate::validation::engine::{DiagnosticKind, ValidationResult};

/// Signature shared by every rule
pub type RuleFn = fn(&FstabEntry, &Catalog, &mut ValidationResult);

/// A named rule category
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: RuleFn,
}

pub const RULES: [Rule; 7] = [
    Rule {
        name: "device",
        check: check_device,
    },
    Rule {
        name: "mount-point",
        check: check_mount_point,
    },
    Rule {
        name: "filesystem",
        check: check_filesystem,
    },
    Rule {
        name: "options",
        check: check_options,
    },
    Rule {
        name: "numeric-range",
        check: check_numeric_ranges,
    },
    Rule {
        name: "consistency",
        check: check_consistency,
    },
    Rule {
        name: "suggestions",
        check: suggest_improvements,
    },
];

/// Hex groups separated by dashes: covers RFC 4122 UUIDs as well as the
/// short `ABCD-1234` serials of FAT and NTFS volumes.
static UUID_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]+(?:-[0-9A-Fa-f]+)*$").expect("UUID pattern is valid")
});

/// Mount-point placeholder written for swap areas; the consistency rule
/// reports it instead of the mount-point rule
const NO_MOUNT_POINT: &str = "none";

pub fn check_device(entry: &FstabEntry, catalog: &Catalog, result: &mut ValidationResult) {
    if entry.device.is_empty() {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::Device),
            "device-empty",
            "Device field is empty".to_string(),
        );
    }

    match &entry.device {
        Device::Uuid(uuid) => {
            if !UUID_SHAPE.is_match(uuid) {
                result.add_error(
                    DiagnosticKind::Field,
                    Some(Field::Device),
                    "device-uuid-format",
                    format!(
                        "Invalid UUID '{}': expected hexadecimal groups separated by dashes",
                        uuid
                    ),
                );
            }
        }
        Device::Label(label) => {
            if label.chars().count() < catalog.min_label_length {
                result.add_warning(
                    DiagnosticKind::Field,
                    Some(Field::Device),
                    "device-label-short",
                    format!(
                        "Label '{}' is shorter than {} characters and may not be unique",
                        label, catalog.min_label_length
                    ),
                );
            }
        }
        Device::Unknown(device) => {
            result.add_warning(
                DiagnosticKind::Field,
                Some(Field::Device),
                "device-unknown",
                format!(
                    "Unrecognized device '{}'; prefer UUID=... or LABEL=... identifiers",
                    device
                ),
            );
        }
        Device::Path(_) | Device::Swap => {}
    }
}

/// Mount points must be absolute or `swap`.
///
/// The whitespace check only fires for entries built by hand: the tokenizer
/// never yields a field containing whitespace.
pub fn check_mount_point(entry: &FstabEntry, _catalog: &Catalog, result: &mut ValidationResult) {
    let mount_point = entry.mount_point.as_str();
    let swap_placeholder = mount_point == NO_MOUNT_POINT && entry.filesystem == "swap";

    if mount_point.is_empty() {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::MountPoint),
            "mount-point-empty",
            "Mount point is empty".to_string(),
        );
    } else if !mount_point.starts_with('/') && mount_point != "swap" && !swap_placeholder {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::MountPoint),
            "mount-point-not-absolute",
            format!(
                "Mount point '{}' must be an absolute path or 'swap'",
                mount_point
            ),
        );
    }

    if mount_point == "/" {
        result.add_warning(
            DiagnosticKind::Advisory,
            Some(Field::MountPoint),
            "mount-point-root",
            "Root filesystem - be careful when changing this entry".to_string(),
        );
    }

    if mount_point.chars().any(char::is_whitespace) {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::MountPoint),
            "mount-point-whitespace",
            format!(
                "Mount point '{}' contains whitespace; escape spaces as \\040",
                mount_point
            ),
        );
    }
}

pub fn check_filesystem(entry: &FstabEntry, catalog: &Catalog, result: &mut ValidationResult) {
    let filesystem = entry.filesystem.as_str();

    if filesystem.is_empty() {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::Filesystem),
            "filesystem-empty",
            "Filesystem type is empty".to_string(),
        );
    } else if !catalog.is_known_filesystem(filesystem) {
        // Unknown types may still be valid on some systems.
        result.add_warning(
            DiagnosticKind::Field,
            Some(Field::Filesystem),
            "filesystem-unknown",
            format!("Unknown filesystem type '{}'", filesystem),
        );
    }
}

pub fn check_options(entry: &FstabEntry, catalog: &Catalog, result: &mut ValidationResult) {
    if entry.options.is_empty() {
        result.add_error(
            DiagnosticKind::Field,
            Some(Field::Options),
            "options-empty",
            "No mount options specified".to_string(),
        );
    }

    for option in &entry.options {
        if !option.contains('=') && !catalog.is_known_option(option) {
            result.add_warning(
                DiagnosticKind::Field,
                Some(Field::Options),
                "option-unknown",
                format!("Unknown mount option '{}'", option),
            );
        }
    }

    for (first, second, rule) in [
        ("ro", "rw", "options-ro-rw"),
        ("sync", "async", "options-sync-async"),
    ] {
        if entry.has_option(first) && entry.has_option(second) {
            result.add_error(
                DiagnosticKind::Conflict,
                Some(Field::Options),
                rule,
                format!(
                    "Conflicting options '{}' and '{}' cannot be used together",
                    first, second
                ),
            );
        }
    }
}

pub fn check_numeric_ranges(entry: &FstabEntry, _catalog: &Catalog, result: &mut ValidationResult) {
    if !entry.dump.is_one_of(&[0, 1]) {
        result.add_error(
            DiagnosticKind::Range,
            Some(Field::Dump),
            "dump-range",
            format!("Dump field must be 0 or 1, got '{}'", entry.dump.raw),
        );
    }

    if !entry.pass.is_one_of(&[0, 1, 2]) {
        result.add_error(
            DiagnosticKind::Range,
            Some(Field::Pass),
            "pass-range",
            format!("Pass field must be 0, 1 or 2, got '{}'", entry.pass.raw),
        );
    }
}

pub fn check_consistency(entry: &FstabEntry, catalog: &Catalog, result: &mut ValidationResult) {
    if entry.filesystem == "swap" && entry.mount_point != "swap" {
        result.add_error(
            DiagnosticKind::Consistency,
            Some(Field::MountPoint),
            "swap-mount-point",
            format!(
                "Swap filesystem requires mount point 'swap', found '{}'",
                entry.mount_point
            ),
        );
    }

    if entry.mount_point == "/" && !entry.pass.is(1) {
        let message = format!(
            "Root filesystem should be checked first (pass 1), found '{}'",
            entry.pass.raw
        );
        match catalog.root_pass_severity {
            RootPassSeverity::Warning => result.add_warning(
                DiagnosticKind::Consistency,
                Some(Field::Pass),
                "root-pass",
                message,
            ),
            RootPassSeverity::Error => result.add_error(
                DiagnosticKind::Consistency,
                Some(Field::Pass),
                "root-pass",
                message,
            ),
        }
    }
}

pub fn suggest_improvements(entry: &FstabEntry, _catalog: &Catalog, result: &mut ValidationResult) {
    match &entry.device {
        Device::Path(path) => result.add_suggestion(
            DiagnosticKind::Advisory,
            Some(Field::Device),
            "device-path-stable-id",
            format!(
                "Consider UUID=... or LABEL=... instead of '{}'; device names can change between boots",
                path
            ),
        ),
        Device::Uuid(_) | Device::Label(_) | Device::Swap | Device::Unknown(_) => {}
    }

    if entry.has_option("defaults") {
        result.add_suggestion(
            DiagnosticKind::Advisory,
            Some(Field::Options),
            "options-defaults",
            "Using 'defaults' is a sensible baseline for mount options".to_string(),
        );
    }

    if entry.dump.is(0) && entry.filesystem != "swap" {
        result.add_suggestion(
            DiagnosticKind::Advisory,
            Some(Field::Dump),
            "dump-backup",
            "Consider dump=1 if this filesystem should be picked up by backup tooling".to_string(),
        );
    }
}
