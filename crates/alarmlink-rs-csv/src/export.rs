// crates/alarmlink-rs-csv/src/export.rs

//! The export engine: one file per concrete alarm type, one row per
//! instance.

use crate::binder::render_property;
use crate::config::SyncConfig;
use crate::error::CsvSyncError;
use crate::registry::{discover_concrete_types, is_limit_family};
use crate::schema::extend_with_type_properties;
use crate::writer::CsvFileWriter;
use alarmlink_rs::types::ALARM_CONTROLLER_TYPE;
use alarmlink_rs::{NodeId, NodeStore, ScalarValue};
use log::{error, info};
use std::fs;
use std::io::Write;

/// Aggregate outcome of an export run over a directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub files_written: usize,
    pub types_skipped: usize,
    pub entities_exported: usize,
}

/// Internal sub-slots of an indirect binding; never exported as columns.
const INTERNAL_COLUMNS: &[&str] = &["InputValueArrayIndex", "InputValueArraySubIndex"];

/// Exports every concrete alarm type with at least one live instance into
/// `<TypeName>.csv` inside the configured directory.
///
/// Each type is processed behind its own barrier: a failing file is logged
/// and the loop continues with the next type.
pub fn export_alarms(
    store: &dyn NodeStore,
    config: &SyncConfig,
) -> Result<ExportSummary, CsvSyncError> {
    let root_type = store
        .find_object_type(ALARM_CONTROLLER_TYPE)
        .ok_or_else(|| CsvSyncError::UnresolvedType(ALARM_CONTROLLER_TYPE.to_string()))?;

    info!("Exporting alarms to: {}", config.directory.display());
    let mut summary = ExportSummary::default();
    for ty in discover_concrete_types(store, root_type) {
        let type_name = store.browse_name(ty).unwrap_or_default();
        if store.instances_of(ty).is_empty() {
            info!("No alarms to export for {type_name}");
            summary.types_skipped += 1;
            continue;
        }

        let path = config.directory.join(format!("{type_name}.csv"));
        let result = fs::File::create(&path)
            .map_err(CsvSyncError::from)
            .and_then(|file| export_type_to_writer(store, ty, config, file));
        match result {
            Ok(rows) => {
                summary.files_written += 1;
                summary.entities_exported += rows;
            }
            Err(e) => error!("Unable to export alarms for {type_name}: {e}"),
        }
    }
    info!(
        "Alarms successfully exported to {}",
        config.directory.display()
    );
    Ok(summary)
}

/// Writes one type's header and instance rows to any sink. Returns the
/// number of rows written.
pub fn export_type_to_writer<W: Write>(
    store: &dyn NodeStore,
    ty: NodeId,
    config: &SyncConfig,
    writer: W,
) -> Result<usize, CsvSyncError> {
    let columns = build_columns(store, ty, &config.common_properties);

    let mut csv = CsvFileWriter::new(writer);
    csv.field_delimiter = config.field_delimiter;
    csv.wrap_fields = config.wrap_fields;
    csv.write_line(&columns)?;

    let mut rows = 0;
    for alarm in store.instances_of(ty) {
        csv.write_line(&build_row(store, ty, alarm, &columns))?;
        rows += 1;
    }
    Ok(rows)
}

/// Column set for a type: the fixed identity and message columns, the
/// threshold message columns for the limit family, then the schema-resolved
/// remaining properties. Header and rows stay strictly 1:1.
fn build_columns(store: &dyn NodeStore, ty: NodeId, common_properties: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = ["Name", "Type", "Path", "Message", "LocalizedMessage"]
        .into_iter()
        .map(String::from)
        .collect();
    if is_limit_family(store, ty) {
        columns.extend(
            [
                "MessageHighHighState",
                "MessageHighState",
                "MessageLowState",
                "MessageLowLowState",
                "LocalizedMessageHighHighState",
                "LocalizedMessageHighState",
                "LocalizedMessageLowState",
                "LocalizedMessageLowLowState",
            ]
            .into_iter()
            .map(String::from),
        );
    }
    extend_with_type_properties(store, ty, common_properties, &mut columns);
    columns.retain(|c| !INTERNAL_COLUMNS.contains(&c.as_str()));
    columns
}

fn build_row(
    store: &dyn NodeStore,
    ty: NodeId,
    alarm: NodeId,
    columns: &[String],
) -> Vec<String> {
    let mut fields = vec![
        store.browse_name(alarm).unwrap_or_default(),
        store.browse_name(ty).unwrap_or_default(),
        owner_path(store, alarm),
    ];
    for column in &columns[3..] {
        fields.push(column_value(store, alarm, column));
    }
    fields
}

fn column_value(store: &dyn NodeStore, alarm: NodeId, column: &str) -> String {
    match column {
        "Message" | "MessageHighHighState" | "MessageHighState" | "MessageLowState"
        | "MessageLowLowState" => match read_child_value(store, alarm, column) {
            Some(ScalarValue::String(text)) => text,
            _ => String::new(),
        },
        "LocalizedMessage"
        | "LocalizedMessageHighHighState"
        | "LocalizedMessageHighState"
        | "LocalizedMessageLowState"
        | "LocalizedMessageLowLowState" => match read_child_value(store, alarm, column) {
            // Only a real translation key is exported.
            Some(ScalarValue::LocalizedText(lt)) if lt.has_text_id() => {
                lt.text_id.unwrap_or_default()
            }
            _ => String::new(),
        },
        "MaxTimeShelved" | "PresetTimeShelved" => match read_child_value(store, alarm, column) {
            Some(ScalarValue::Duration(d)) => d.to_string(),
            _ => String::new(),
        },
        _ => match store.child_by_name(alarm, column) {
            Some(variable) => render_property(store, variable),
            None => String::new(),
        },
    }
}

fn read_child_value(store: &dyn NodeStore, alarm: NodeId, name: &str) -> Option<ScalarValue> {
    store
        .child_by_name(alarm, name)
        .and_then(|v| store.read_value(v))
}

/// The browse path of the node's owner, i.e. the destination folder an
/// import would need to recreate the instance.
fn owner_path(store: &dyn NodeStore, node: NodeId) -> String {
    let path = store.browse_path(node).unwrap_or_default();
    match path.rfind('/') {
        Some(pos) => path[..pos].to_string(),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alarmlink_rs::predefined::populate_alarm_types;
    use alarmlink_rs::AddressSpace;

    #[test]
    fn test_limit_family_gets_threshold_message_columns() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        let common = SyncConfig::default_common_properties();

        let limit_type = space
            .find_object_type("ExclusiveLimitAlarmController")
            .unwrap();
        let columns = build_columns(&space, limit_type, &common);
        assert!(columns.contains(&"MessageHighHighState".to_string()));
        assert!(columns.contains(&"HighHighLimit".to_string()));

        let digital = space.find_object_type("DigitalAlarmController").unwrap();
        let columns = build_columns(&space, digital, &common);
        assert!(!columns.contains(&"MessageHighHighState".to_string()));
        assert!(columns.contains(&"NormalStateValue".to_string()));
    }

    #[test]
    fn test_columns_are_unique() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        let common = SyncConfig::default_common_properties();
        let limit_type = space
            .find_object_type("NonExclusiveLimitAlarmController")
            .unwrap();
        let columns = build_columns(&space, limit_type, &common);
        let unique: std::collections::BTreeSet<_> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
    }

    #[test]
    fn test_export_writes_header_and_one_row_per_instance() {
        let mut space = AddressSpace::new();
        populate_alarm_types(&mut space).unwrap();
        let digital = space.find_object_type("DigitalAlarmController").unwrap();
        let root = space.root();
        let folder = space.ensure_folder(root, "Plant").unwrap();
        for name in ["A1", "A2"] {
            let alarm = space.make_object(name, digital).unwrap();
            space.add_child(folder, alarm).unwrap();
        }

        let config = SyncConfig::new("unused");
        let mut out = Vec::new();
        let rows = export_type_to_writer(&space, digital, &config, &mut out).unwrap();
        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name,Type,Path,Message,LocalizedMessage"));
        assert!(lines[1].starts_with("A1,DigitalAlarmController,Plant,"));
        assert!(lines[2].starts_with("A2,DigitalAlarmController,Plant,"));

        // Every row must have exactly as many fields as the header.
        let header_fields = lines[0].split(',').count();
        assert_eq!(lines[1].split(',').count(), header_fields);
    }
}
