//! JSON-lines record output
//!
//! One JSON object per line, in the order records were extracted.

use crate::extract::ProductRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes records as JSON lines to any writer
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, record: &ProductRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Opens the records sink for a path, `-` meaning stdout
pub fn open_records_sink(path: &str) -> OutputResult<JsonLinesSink<Box<dyn Write>>> {
    let writer: Box<dyn Write> = if path == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(Path::new(path))
            .map_err(|e| OutputError::Write(format!("cannot create '{}': {}", path, e)))?;
        Box::new(BufWriter::new(file))
    };

    Ok(JsonLinesSink::new(writer))
}
