// crates/alarmlink-rs-csv/src/writer.rs

use crate::error::CsvSyncError;
use std::io::Write;

/// Serializes rows of string fields as delimited text.
///
/// In wrap mode every field is enclosed in the quote character and internal
/// quote characters are doubled. Output is flushed after every line so a
/// crash mid-export loses at most the line being written.
pub struct CsvFileWriter<W> {
    writer: W,
    pub field_delimiter: char,
    pub quote_char: char,
    pub wrap_fields: bool,
}

impl<W: Write> CsvFileWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            field_delimiter: ',',
            quote_char: '"',
            wrap_fields: false,
        }
    }

    pub fn write_line(&mut self, fields: &[String]) -> Result<(), CsvSyncError> {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if self.wrap_fields {
                line.push(self.quote_char);
                line.push_str(&self.escape_field(field));
                line.push(self.quote_char);
            } else {
                line.push_str(field);
            }
            if i != fields.len() - 1 {
                line.push(self.field_delimiter);
            }
        }
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn escape_field(&self, field: &str) -> String {
        let quote = self.quote_char.to_string();
        field.replace(&quote, &format!("{quote}{quote}"))
    }
}
