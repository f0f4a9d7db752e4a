use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use log::debug;

use crate::error::Result;
use crate::format::CsvFormat;
use crate::target::Target;

/// Forward-only stream of input records.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<ByteRecord>>;
}

/// Destination for one target's records.
///
/// A sink dropped without `finish` is still released; only the final flush
/// error is lost.
pub trait RecordSink {
    fn write_record(&mut self, record: &ByteRecord) -> Result<()>;
    fn finish(self) -> Result<()>;
}

/// Creates the sink for a target when the partitioner reaches it.
pub trait SinkOpener {
    type Sink: RecordSink;

    fn open(&mut self, target: &Target) -> Result<Self::Sink>;
}

/// Reads records from a delimited file, skipping the header row if expected.
pub struct CsvSource {
    reader: csv::Reader<File>,
}

impl CsvSource {
    pub fn open(path: &Path, format: &CsvFormat, expect_headers: bool) -> Result<Self> {
        let mut reader = format.open_reader(path)?;
        if expect_headers {
            let mut header = ByteRecord::new();
            reader.read_byte_record(&mut header)?;
        }
        debug!("Opened source {}", path.display());
        Ok(Self { reader })
    }
}

impl RecordSource for CsvSource {
    fn next_record(&mut self) -> Result<Option<ByteRecord>> {
        let mut record = ByteRecord::new();
        if self.reader.read_byte_record(&mut record)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}

/// Creates one delimited output file per target, optionally starting with
/// the input's header row.
pub struct CsvSinkOpener {
    format: CsvFormat,
    headers: Option<ByteRecord>,
}

impl CsvSinkOpener {
    pub fn new(format: CsvFormat, headers: Option<ByteRecord>) -> Self {
        Self { format, headers }
    }
}

impl SinkOpener for CsvSinkOpener {
    type Sink = CsvSink;

    fn open(&mut self, target: &Target) -> Result<CsvSink> {
        let path = target.output().to_path_buf();
        let mut writer = self.format.open_writer(&path)?;
        if let Some(headers) = &self.headers {
            writer.write_byte_record(headers)?;
        }
        debug!("Opened output {}", path.display());
        Ok(CsvSink { writer, path })
    }
}

pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl RecordSink for CsvSink {
    fn write_record(&mut self, record: &ByteRecord) -> Result<()> {
        self.writer.write_byte_record(record)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        debug!("Closed output {}", self.path.display());
        Ok(())
    }
}
