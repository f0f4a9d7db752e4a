use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;

/// Separator and decimal conventions of a delimited text file.
///
/// Records are copied verbatim, so the decimal point only documents the
/// locale the separator was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
    /// Descriptive only; field contents are never parsed or rewritten.
    pub decimal_point: char,
}

impl CsvFormat {
    /// `1.5,2.5` style files.
    pub const DECIMAL_POINT: CsvFormat = CsvFormat {
        delimiter: b',',
        decimal_point: '.',
    };
    /// `1,5;2,5` style files.
    pub const DECIMAL_COMMA: CsvFormat = CsvFormat {
        delimiter: b';',
        decimal_point: ',',
    };
    pub const ENGLISH: CsvFormat = CsvFormat::DECIMAL_POINT;

    pub fn new(delimiter: u8, decimal_point: char) -> Self {
        Self {
            delimiter,
            decimal_point,
        }
    }

    // headers are handled by the caller so the first row is never swallowed
    pub(crate) fn open_reader(&self, path: &Path) -> Result<csv::Reader<File>> {
        let reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        Ok(reader)
    }

    pub(crate) fn open_writer(&self, path: &Path) -> Result<csv::Writer<File>> {
        let writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        Ok(writer)
    }
}

impl Default for CsvFormat {
    fn default() -> Self {
        CsvFormat::ENGLISH
    }
}
