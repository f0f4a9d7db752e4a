use std::path::Path;

use csv::ByteRecord;
use log::info;

use crate::error::Result;
use crate::format::CsvFormat;

/// What a counting pass learned about the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Data rows, header excluded.
    pub record_count: u64,
    /// Field count of the first data row (or of the header when there is none).
    pub column_count: usize,
    pub headers: Option<ByteRecord>,
}

/// Read the whole input once, counting records and capturing the header row.
pub fn analyze(path: &Path, format: &CsvFormat, expect_headers: bool) -> Result<Analysis> {
    let mut reader = format.open_reader(path)?;
    let mut record = ByteRecord::new();

    let mut headers = None;
    if expect_headers && reader.read_byte_record(&mut record)? {
        headers = Some(record.clone());
    }

    let mut record_count: u64 = 0;
    let mut column_count = headers.as_ref().map_or(0, ByteRecord::len);
    while reader.read_byte_record(&mut record)? {
        if record_count == 0 {
            column_count = record.len();
        }
        record_count += 1;
    }

    info!(
        "Analyzed {}: {} records, {} columns",
        path.display(),
        record_count,
        column_count
    );

    Ok(Analysis {
        record_count,
        column_count,
        headers,
    })
}
