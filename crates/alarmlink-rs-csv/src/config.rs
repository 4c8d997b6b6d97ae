// crates/alarmlink-rs-csv/src/config.rs

use std::path::PathBuf;

/// Configuration for one import or export invocation, read once up front.
///
/// The well-known common-property list is carried here explicitly so the
/// schema resolver and binder take it as an input instead of consulting
/// global state.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory scanned for `.csv` files on import and written on export.
    pub directory: PathBuf,
    /// Single-character field delimiter.
    pub field_delimiter: char,
    /// Whether fields are quote-wrapped.
    pub wrap_fields: bool,
    /// Lenient reading: malformed lines yield empty rows instead of
    /// failing the file.
    pub ignore_malformed_lines: bool,
    /// Ordered well-known property names bound on every imported alarm.
    pub common_properties: Vec<String>,
}

impl SyncConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            field_delimiter: ',',
            wrap_fields: false,
            ignore_malformed_lines: false,
            common_properties: Self::default_common_properties(),
        }
    }

    /// The stock well-known property set of the alarm controller family.
    pub fn default_common_properties() -> Vec<String> {
        [
            "Enabled",
            "AutoAcknowledge",
            "AutoConfirm",
            "Severity",
            "Message",
            "LocalizedMessage",
            "MessageHighHighState",
            "MessageHighState",
            "MessageLowState",
            "MessageLowLowState",
            "LocalizedMessageHighHighState",
            "LocalizedMessageHighState",
            "LocalizedMessageLowState",
            "LocalizedMessageLowLowState",
            "HighHighLimit",
            "HighLimit",
            "LowLowLimit",
            "LowLimit",
            "LastEvent",
            "InputValue",
            "NormalStateValue",
            "Setpoint",
            "PollingTime",
            "MaxTimeShelved",
            "PresetTimeShelved",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
