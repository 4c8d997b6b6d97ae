// crates/alarmlink-rs-csv/src/import.rs

//! The import engine: reads one entity type's instances per file and
//! replays them into the tree.

use crate::binder::bind_property;
use crate::config::SyncConfig;
use crate::error::{BindWarning, CsvSyncError};
use crate::reader::CsvFileReader;
use crate::record::{record_from_row, CsvEntityRecord};
use crate::registry;
use alarmlink_rs::types::PATH_SEPARATOR;
use alarmlink_rs::{LocalizedText, NodeClass, NodeId, NodeStore, ScalarValue};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Aggregate outcome of an import run over a directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub entities_created: usize,
    pub warnings: usize,
}

/// Outcome of importing a single file.
#[derive(Debug, Default)]
pub struct FileImport {
    pub entities_created: usize,
    pub warnings: Vec<BindWarning>,
}

/// Imports every `.csv` file in the configured directory.
///
/// Each file is processed behind its own barrier: a failing file is logged
/// and skipped, and the loop continues with the next one. Only an
/// unreadable directory aborts the run.
pub fn import_alarms(
    store: &mut dyn NodeStore,
    config: &SyncConfig,
) -> Result<ImportSummary, CsvSyncError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(&config.directory)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    let mut summary = ImportSummary::default();
    for path in paths {
        match import_file(store, config, &path) {
            Ok(outcome) => {
                info!("Alarms successfully imported from {}", path.display());
                summary.files_imported += 1;
                summary.entities_created += outcome.entities_created;
                summary.warnings += outcome.warnings.len();
            }
            Err(e) if e.is_warning() => {
                warn!("{e}. CSV file '{}' will be skipped!", path.display());
                summary.files_skipped += 1;
            }
            Err(e) => {
                error!("Unable to import alarms from {}: {e}", path.display());
                summary.files_skipped += 1;
            }
        }
    }
    Ok(summary)
}

fn import_file(
    store: &mut dyn NodeStore,
    config: &SyncConfig,
    path: &Path,
) -> Result<FileImport, CsvSyncError> {
    let file = fs::File::open(path)?;
    import_records(store, config, BufReader::new(file))
}

/// Imports one file's worth of rows from any buffered reader.
///
/// State machine per file: read header, parse and validate every row, check
/// that all valid records declare the same entity type, resolve that type,
/// then create or replace one entity per record and bind its properties.
pub fn import_records<R: BufRead>(
    store: &mut dyn NodeStore,
    config: &SyncConfig,
    reader: R,
) -> Result<FileImport, CsvSyncError> {
    let mut csv = CsvFileReader::new(reader);
    csv.field_delimiter = config.field_delimiter;
    csv.wrap_fields = config.wrap_fields;
    csv.ignore_malformed_lines = config.ignore_malformed_lines;

    let header = csv.read_line()?;
    let mut records = Vec::new();
    while !csv.end_of_file() {
        let row = csv.read_line()?;
        if let Some(record) = record_from_row(&row, &header) {
            records.push(record);
        }
    }
    if records.is_empty() {
        return Err(CsvSyncError::NoValidRecords);
    }

    // One file carries exactly one declared type; anything else would make
    // the import ambiguous.
    let declared_types: BTreeSet<&str> = records
        .iter()
        .map(|r| r.type_browse_path.as_str())
        .collect();
    if declared_types.len() > 1 {
        return Err(CsvSyncError::MixedTypes(
            declared_types.into_iter().map(String::from).collect(),
        ));
    }

    let declared = records[0].type_browse_path.clone();
    let ty = resolve_declared_type(store, &declared)?;

    let mut outcome = FileImport::default();
    for record in &records {
        let folder = ensure_folder_path(store, &record.browse_path)?;
        // Replace semantics: a same-named prior instance is dropped, not
        // merged into.
        store.remove_child_by_name(folder, &record.name);
        let alarm = store.make_object(&record.name, ty)?;
        bind_record(store, alarm, record, config, &mut outcome.warnings);
        store.add_child(folder, alarm)?;
        outcome.entities_created += 1;
    }
    Ok(outcome)
}

/// Resolves a declared type: first as a project browse path, then against
/// the built-in catalog. The result must be a concrete alarm-family type.
fn resolve_declared_type(
    store: &mut dyn NodeStore,
    declared: &str,
) -> Result<NodeId, CsvSyncError> {
    let ty = store
        .find(declared)
        .filter(|&node| store.node_class(node) == Some(NodeClass::ObjectType))
        .or_else(|| registry::match_builtin_type(store, declared))
        .ok_or_else(|| CsvSyncError::UnresolvedType(declared.to_string()))?;
    if !registry::is_alarm_family(store, ty) {
        return Err(CsvSyncError::NotAnAlarmType(declared.to_string()));
    }
    if store.is_abstract(ty) {
        return Err(CsvSyncError::AbstractType(declared.to_string()));
    }
    Ok(ty)
}

/// Creates the folder chain for a destination path, segment by segment.
/// Existing segments are reused.
fn ensure_folder_path(
    store: &mut dyn NodeStore,
    path: &str,
) -> Result<NodeId, CsvSyncError> {
    let mut current = store.root();
    for segment in path.split(PATH_SEPARATOR) {
        current = store.ensure_folder(current, segment)?;
    }
    Ok(current)
}

fn bind_record(
    store: &mut dyn NodeStore,
    alarm: NodeId,
    record: &CsvEntityRecord,
    config: &SyncConfig,
    warnings: &mut Vec<BindWarning>,
) {
    let alarm_name = store.browse_name(alarm).unwrap_or_default();

    for property in &config.common_properties {
        if property.contains("Message") {
            set_alarm_message(store, alarm, property, record.properties.get(property));
            continue;
        }
        let Some(text) = record.properties.get(property) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        // Common properties apply only where the type chain declares them.
        if store.declared_kind(alarm, property).is_none() {
            continue;
        }
        let variable = match store.get_or_create_variable(alarm, property) {
            Ok(v) => v,
            Err(e) => {
                let warning = BindWarning::Rejected {
                    property: property.clone(),
                    reason: e.to_string(),
                };
                warn!("{warning} in the alarm {alarm_name}");
                warnings.push(warning);
                continue;
            }
        };
        if let Err(warning) = bind_property(store, variable, property, text) {
            warn!("{warning} in the alarm {alarm_name}");
            warnings.push(warning);
        }
    }

    // Remaining declared-but-uncommon properties of this alarm.
    for child in store.children(alarm) {
        if store.node_class(child) != Some(NodeClass::Variable) {
            continue;
        }
        let Some(name) = store.browse_name(child) else {
            continue;
        };
        if config.common_properties.contains(&name) {
            continue;
        }
        let Some(text) = record.properties.get(&name) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if let Err(warning) = bind_property(store, child, &name, text) {
            warn!("{warning} in the alarm {alarm_name}");
            warnings.push(warning);
        }
    }
}

/// Applies the message pairing rules: a non-empty translation key clears
/// the paired plain message and stores the key; a plain message is stored
/// only while no key is present.
fn set_alarm_message(
    store: &mut dyn NodeStore,
    alarm: NodeId,
    property: &str,
    value: Option<&String>,
) {
    let Some(text) = value else {
        return;
    };
    if text.is_empty() {
        return;
    }

    if property.contains("Localized") {
        let plain = property.replacen("Localized", "", 1);
        if let Some(plain_var) = store.child_by_name(alarm, &plain) {
            let _ = store.write_value(plain_var, ScalarValue::String(String::new()));
        }
        if let Some(var) = store.child_by_name(alarm, property) {
            let _ = store.write_value(
                var,
                ScalarValue::LocalizedText(LocalizedText::from_key(text.clone())),
            );
        }
    } else {
        let localized = format!("Localized{property}");
        let has_key = store
            .child_by_name(alarm, &localized)
            .and_then(|v| store.read_value(v))
            .is_some_and(|v| matches!(v, ScalarValue::LocalizedText(lt) if lt.has_text_id()));
        if has_key {
            return;
        }
        if let Some(var) = store.child_by_name(alarm, property) {
            let _ = store.write_value(var, ScalarValue::String(text.clone()));
        }
    }
}
