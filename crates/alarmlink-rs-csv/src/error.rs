// crates/alarmlink-rs-csv/src/error.rs

use alarmlink_rs::StoreError;
use std::fmt;
use std::io;

/// File-level failures. Each aborts the file being processed at the
/// per-file barrier; the import/export loops log it and move on.
#[derive(Debug)]
pub enum CsvSyncError {
    /// An underlying I/O error.
    Io(io::Error),

    /// A malformed row in the delimited text (strict mode only).
    Format { line: u64, reason: String },

    /// The file contained no valid records.
    NoValidRecords,

    /// The file declared more than one entity type.
    MixedTypes(Vec<String>),

    /// The declared type is neither a project type nor a built-in catalog
    /// entry.
    UnresolvedType(String),

    /// The declared type resolved, but outside the alarm controller family.
    NotAnAlarmType(String),

    /// The declared type is abstract and cannot be instantiated.
    AbstractType(String),

    /// A tree mutation was rejected by the node store.
    Store(StoreError),
}

impl CsvSyncError {
    /// Mixed-type and empty files are expected operator mistakes and log
    /// as warnings; everything else logs as an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoValidRecords | Self::MixedTypes(_))
    }
}

impl fmt::Display for CsvSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Format { line, reason } => {
                write!(f, "Error processing line {line}. {reason}")
            }
            Self::NoValidRecords => {
                write!(f, "File does not contain valid objects to be imported")
            }
            Self::MixedTypes(types) => write!(
                f,
                "File contains data of more than one object type, found: '{}'",
                types.join(", ")
            ),
            Self::UnresolvedType(name) => {
                write!(f, "Object type '{name}' does not exist in the current project")
            }
            Self::NotAnAlarmType(name) => {
                write!(f, "Object type '{name}' is not an alarm subtype")
            }
            Self::AbstractType(name) => {
                write!(f, "Object type '{name}' is abstract and cannot be imported")
            }
            Self::Store(e) => write!(f, "Node store error: {e}"),
        }
    }
}

impl std::error::Error for CsvSyncError {}

impl From<io::Error> for CsvSyncError {
    fn from(e: io::Error) -> Self {
        CsvSyncError::Io(e)
    }
}

impl From<StoreError> for CsvSyncError {
    fn from(e: StoreError) -> Self {
        CsvSyncError::Store(e)
    }
}

/// Property-level failures. Collected per record and logged; never abort
/// the record, let alone the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindWarning {
    /// The addressed target variable was not found; the property was left
    /// unbound.
    UnresolvedReference { property: String, target: String },

    /// The value resolved to no variable and was kept as plain text.
    LiteralFallback { property: String, target: String },

    /// Duration text did not parse; the property was left unset.
    InvalidDuration { property: String, value: String },

    /// The node store rejected the write.
    Rejected { property: String, reason: String },
}

impl fmt::Display for BindWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference { property, target } => write!(
                f,
                "Unable to find the variable {target} for the alarm property {property}"
            ),
            Self::LiteralFallback { property, target } => write!(
                f,
                "Unable to find variable {target} for the alarm property {property}, value set as plain text and not as dynamic link"
            ),
            Self::InvalidDuration { property, value } => {
                write!(f, "Invalid duration string '{value}' for property {property}")
            }
            Self::Rejected { property, reason } => {
                write!(f, "Unable to set value for the alarm property {property}: {reason}")
            }
        }
    }
}
