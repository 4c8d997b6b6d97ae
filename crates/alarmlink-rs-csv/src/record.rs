// crates/alarmlink-rs-csv/src/record.rs

use log::error;
use std::collections::BTreeMap;

/// One parsed data row: the three reserved fields plus the property values
/// keyed by header column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvEntityRecord {
    pub name: String,
    pub type_browse_path: String,
    pub browse_path: String,
    pub properties: BTreeMap<String, String>,
}

impl CsvEntityRecord {
    /// A record is valid iff all three reserved fields are non-blank.
    pub fn is_valid(&self) -> bool {
        !self.type_browse_path.trim().is_empty()
            && !self.name.trim().is_empty()
            && !self.browse_path.trim().is_empty()
    }
}

/// Builds a record from a data row against the header. Invalid records
/// (blank reserved fields, or rows shorter than the header) are discarded
/// with a diagnostic and `None` is returned; the file keeps processing.
pub fn record_from_row(row: &[String], header: &[String]) -> Option<CsvEntityRecord> {
    let record = CsvEntityRecord {
        name: row.first().cloned().unwrap_or_default(),
        type_browse_path: row.get(1).cloned().unwrap_or_default(),
        browse_path: row.get(2).cloned().unwrap_or_default(),
        properties: BTreeMap::new(),
    };

    if !record.is_valid() {
        error!(
            "Invalid object with name '{}'. Please check its properties.",
            record.name
        );
        return None;
    }
    if row.len() < header.len() {
        error!(
            "Invalid object with name '{}': row has {} fields but the header has {} columns.",
            record.name,
            row.len(),
            header.len()
        );
        return None;
    }

    let mut record = record;
    for i in 3..header.len() {
        record.properties.insert(header[i].clone(), row[i].clone());
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_properties_map_positionally() {
        let header = row(&["Name", "TypeBrowsePath", "BrowsePath", "Message", "InputValue"]);
        let data = row(&["Motor1", "PumpAlarm", "Model/Pumps", "Input>0", "{Alias}/Speed"]);
        let record = record_from_row(&data, &header).unwrap();
        assert_eq!(record.name, "Motor1");
        assert_eq!(record.type_browse_path, "PumpAlarm");
        assert_eq!(record.browse_path, "Model/Pumps");
        assert_eq!(record.properties["Message"], "Input>0");
        assert_eq!(record.properties["InputValue"], "{Alias}/Speed");
    }

    #[test]
    fn test_blank_reserved_fields_invalidate_the_record() {
        let header = row(&["Name", "TypeBrowsePath", "BrowsePath"]);
        assert!(record_from_row(&row(&["", "T", "P"]), &header).is_none());
        assert!(record_from_row(&row(&["N", "  ", "P"]), &header).is_none());
        assert!(record_from_row(&row(&["N", "T", ""]), &header).is_none());
        assert!(record_from_row(&row(&["N"]), &header).is_none());
    }

    #[test]
    fn test_short_row_is_discarded() {
        let header = row(&["Name", "TypeBrowsePath", "BrowsePath", "Message"]);
        assert!(record_from_row(&row(&["N", "T", "P"]), &header).is_none());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let header = row(&["Name", "TypeBrowsePath", "BrowsePath"]);
        let record = record_from_row(&row(&["N", "T", "P", "extra"]), &header).unwrap();
        assert!(record.properties.is_empty());
    }
}
