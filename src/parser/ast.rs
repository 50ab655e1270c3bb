//! Parsed fstab structure
//!
//! Plain data types for one mount-table line. No validation logic lives
//! here: anything that tokenizes into six fields becomes an entry.

use std::fmt;

use serde::Serialize;

/// The six columns of an fstab line, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Device,
    MountPoint,
    Filesystem,
    Options,
    Dump,
    Pass,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Device,
        Field::MountPoint,
        Field::Filesystem,
        Field::Options,
        Field::Dump,
        Field::Pass,
    ];

    /// Zero-based column index
    pub fn index(self) -> usize {
        match self {
            Field::Device => 0,
            Field::MountPoint => 1,
            Field::Filesystem => 2,
            Field::Options => 3,
            Field::Dump => 4,
            Field::Pass => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Device => "device",
            Field::MountPoint => "mount point",
            Field::Filesystem => "filesystem",
            Field::Options => "options",
            Field::Dump => "dump",
            Field::Pass => "pass",
        }
    }
}

/// Byte range of a field within its line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// How the first column identifies the block device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    /// A filesystem path such as `/dev/sda1`
    Path(String),
    /// `UUID=<value>`; holds the value only
    Uuid(String),
    /// `LABEL=<value>`; holds the value only
    Label(String),
    /// The literal `swap`
    Swap,
    /// Anything else (network shares, `tmpfs`, `none`, typos...)
    Unknown(String),
}

impl Device {
    /// Classify a raw device token.
    ///
    /// Priority: `swap`, `UUID=`, `LABEL=`, leading `/`, everything else.
    pub fn classify(token: &str) -> Device {
        if token == "swap" {
            Device::Swap
        } else if let Some(uuid) = token.strip_prefix("UUID=") {
            Device::Uuid(uuid.to_string())
        } else if let Some(label) = token.strip_prefix("LABEL=") {
            Device::Label(label.to_string())
        } else if token.starts_with('/') {
            Device::Path(token.to_string())
        } else {
            Device::Unknown(token.to_string())
        }
    }

    /// True when nothing at all was written in the device column
    pub fn is_empty(&self) -> bool {
        match self {
            Device::Path(v) | Device::Unknown(v) => v.is_empty(),
            Device::Uuid(_) | Device::Label(_) | Device::Swap => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Device::Path(_) => "path",
            Device::Uuid(_) => "uuid",
            Device::Label(_) => "label",
            Device::Swap => "swap",
            Device::Unknown(_) => "unknown",
        }
    }
}

/// Renders the device exactly as it appears in the file
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Path(v) | Device::Unknown(v) => write!(f, "{}", v),
            Device::Uuid(v) => write!(f, "UUID={}", v),
            Device::Label(v) => write!(f, "LABEL={}", v),
            Device::Swap => write!(f, "swap"),
        }
    }
}

/// A dump or pass column.
///
/// Parsing is permissive: a non-numeric token keeps its text and has no
/// value, so the range rules can report it instead of the parser failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericField {
    pub raw: String,
    pub value: Option<i64>,
}

impl NumericField {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            value: raw.parse().ok(),
        }
    }

    pub fn from_value(value: i64) -> Self {
        Self {
            raw: value.to_string(),
            value: Some(value),
        }
    }

    pub fn is_one_of(&self, allowed: &[i64]) -> bool {
        self.value.is_some_and(|v| allowed.contains(&v))
    }

    pub fn is(&self, expected: i64) -> bool {
        self.value == Some(expected)
    }
}

/// One non-comment, non-blank fstab line with exactly six fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstabEntry {
    pub device: Device,
    pub mount_point: String,
    pub filesystem: String,
    /// Comma-split options with empty items removed
    pub options: Vec<String>,
    pub dump: NumericField,
    pub pass: NumericField,
    /// 1-based line number in the source text
    pub line_number: usize,
    pub raw_line: String,
    /// Field spans within `raw_line`, indexed by `Field::index`
    pub spans: [Span; 6],
}

impl FstabEntry {
    pub fn span(&self, field: Field) -> Span {
        self.spans[field.index()]
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }
}

/// A line that could not be turned into an entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("line {line}: expected 6 fields, found {found}")]
    InvalidFieldCount {
        line: usize,
        raw_line: String,
        found: usize,
    },
}

impl StructuralError {
    pub fn line(&self) -> usize {
        match self {
            StructuralError::InvalidFieldCount { line, .. } => *line,
        }
    }

    pub fn raw_line(&self) -> &str {
        match self {
            StructuralError::InvalidFieldCount { raw_line, .. } => raw_line,
        }
    }
}
