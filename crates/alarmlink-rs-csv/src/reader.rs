// crates/alarmlink-rs-csv/src/reader.rs

use crate::error::CsvSyncError;
use std::io::BufRead;

/// Streams delimited text into rows of string fields.
///
/// Two dialects are supported. Without `wrap_fields` a line is split
/// verbatim on the delimiter. With `wrap_fields` every field must be
/// enclosed in the quote character; a doubled quote inside a field is an
/// escaped literal quote, a lone quote closes the field, and whitespace
/// before an opening quote is skipped. Malformed lines fail with a
/// [`CsvSyncError::Format`] carrying the 1-based line number, or yield an
/// empty row when `ignore_malformed_lines` is set.
pub struct CsvFileReader<R> {
    reader: R,
    pub field_delimiter: char,
    pub quote_char: char,
    pub wrap_fields: bool,
    pub ignore_malformed_lines: bool,
    current_line_number: u64,
    eof: bool,
}

impl<R: BufRead> CsvFileReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            field_delimiter: ',',
            quote_char: '"',
            wrap_fields: false,
            ignore_malformed_lines: false,
            current_line_number: 1,
            eof: false,
        }
    }

    /// Whether the underlying stream is exhausted.
    pub fn end_of_file(&mut self) -> bool {
        if !self.eof {
            self.eof = self.reader.fill_buf().map(|b| b.is_empty()).unwrap_or(true);
        }
        self.eof
    }

    /// Reads the next row. Returns an empty row at end of stream.
    pub fn read_line(&mut self) -> Result<Vec<String>, CsvSyncError> {
        if self.end_of_file() {
            return Ok(Vec::new());
        }

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        let result = if self.wrap_fields {
            self.parse_line_wrapping_fields(&line)
        } else {
            self.parse_line_without_wrapping_fields(&line)
        }?;

        self.current_line_number += 1;
        Ok(result)
    }

    fn malformed(&self, reason: String) -> Result<Vec<String>, CsvSyncError> {
        if self.ignore_malformed_lines {
            Ok(Vec::new())
        } else {
            Err(CsvSyncError::Format {
                line: self.current_line_number,
                reason,
            })
        }
    }

    fn parse_line_without_wrapping_fields(
        &self,
        line: &str,
    ) -> Result<Vec<String>, CsvSyncError> {
        if line.is_empty() {
            return self.malformed("Line cannot be empty".into());
        }
        Ok(line
            .split(self.field_delimiter)
            .map(str::to_string)
            .collect())
    }

    fn parse_line_wrapping_fields(&self, line: &str) -> Result<Vec<String>, CsvSyncError> {
        let mut fields = Vec::new();
        let mut buffer = String::new();
        let mut field_parsing = false;

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !field_parsing {
                if chars[i].is_whitespace() {
                    i += 1;
                    continue;
                }

                // Column numbers are 1-based in messages to the user.
                if i == 0 {
                    // A line must begin with the quotation mark.
                    if chars[i] != self.quote_char {
                        return self
                            .malformed(format!("Expected quotation marks at column {}", i + 1));
                    }
                    field_parsing = true;
                } else if chars[i] == self.quote_char {
                    field_parsing = true;
                } else if chars[i] != self.field_delimiter {
                    return self.malformed(format!("Wrong field delimiter at column {}", i + 1));
                }

                i += 1;
            } else if chars[i] == self.quote_char
                && i != chars.len() - 1
                && chars[i + 1] == self.quote_char
            {
                // Doubled quote: an escaped literal quote character.
                buffer.push(self.quote_char);
                i += 2;
            } else if chars[i] == self.quote_char {
                fields.push(std::mem::take(&mut buffer));
                field_parsing = false;
                i += 1;
            } else {
                buffer.push(chars[i]);
                i += 1;
            }
        }

        Ok(fields)
    }
}
