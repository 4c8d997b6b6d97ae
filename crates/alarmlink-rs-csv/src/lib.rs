// src/lib.rs

//! Bulk synchronization between delimited text files and an alarm
//! configuration tree.
//!
//! One file carries the instances of exactly one alarm type. The first
//! three columns of every file are reserved (`Name`, `TypeBrowsePath`,
//! `BrowsePath`); the remaining columns map positionally onto property
//! names from the header row. Property values may be literals, dynamic
//! links to other tree variables (optionally array- or bit-addressed), or
//! brace-delimited alias references.
//!
//! The engines consume the host tree through the
//! [`alarmlink_rs::NodeStore`] capability boundary:
//!
//! - [`import_alarms`]: reads every `.csv` file in a directory into the tree.
//! - [`export_alarms`]: writes one `.csv` file per concrete alarm type.

// --- Crate Modules ---

mod binder;
mod config;
mod error;
mod export;
mod import;
mod reader;
mod record;
mod registry;
mod schema;
mod writer;

// --- Public API Re-exports ---

pub use binder::{bind_property, render_property};
pub use config::SyncConfig;
pub use error::{BindWarning, CsvSyncError};
pub use export::{export_alarms, export_type_to_writer, ExportSummary};
pub use import::{import_alarms, import_records, FileImport, ImportSummary};
pub use reader::CsvFileReader;
pub use record::CsvEntityRecord;
pub use registry::discover_concrete_types;
pub use schema::resolve_properties;
pub use writer::CsvFileWriter;
