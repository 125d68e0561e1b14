//! Record sink trait and output errors

use crate::extract::ProductRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of extracted product records
///
/// The coordinator hands every record to the sink as soon as it is
/// extracted. A sink error stops the crawl.
pub trait RecordSink {
    /// Writes one record
    fn write_record(&mut self, record: &ProductRecord) -> OutputResult<()>;

    /// Flushes buffered output at the end of the crawl
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Collects records in memory
impl RecordSink for Vec<ProductRecord> {
    fn write_record(&mut self, record: &ProductRecord) -> OutputResult<()> {
        self.push(record.clone());
        Ok(())
    }
}
