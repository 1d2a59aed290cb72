use std::io::Write as _;
use std::sync::Mutex;

use serde::Serialize;

use morgoth_core::error::{MorgothError, Result};
use morgoth_core::MetricId;

/// Records emitted by supervisors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// A supervisor started tracking a series.
    SeriesTracked { metric: MetricId, pattern: String },
}

/// Destination for supervisor output.
pub trait Writer: Send + Sync {
    fn write(&self, record: &Record) -> Result<()>;
}

/// Discards every record.
#[derive(Debug, Default)]
pub struct NullWriter;

impl Writer for NullWriter {
    fn write(&self, _record: &Record) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory, in write order.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    records: Mutex<Vec<Record>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        match self.records.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Writer for MemoryWriter {
    fn write(&self, record: &Record) -> Result<()> {
        let mut g = self
            .records
            .lock()
            .map_err(|_| MorgothError::Sink("memory writer poisoned".into()))?;
        g.push(record.clone());
        Ok(())
    }
}

/// One JSON object per line.
pub struct JsonLinesWriter<W: std::io::Write + Send> {
    out: Mutex<W>,
}

impl<W: std::io::Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: std::io::Write + Send> Writer for JsonLinesWriter<W> {
    fn write(&self, record: &Record) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| MorgothError::Sink(format!("encode failed: {e}")))?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| MorgothError::Sink("json writer poisoned".into()))?;
        writeln!(out, "{line}").map_err(|e| MorgothError::Sink(format!("write failed: {e}")))?;
        Ok(())
    }
}
