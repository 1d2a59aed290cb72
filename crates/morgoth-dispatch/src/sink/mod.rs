//! Output sink handed to every supervisor.
//!
//! The manager never writes here itself; it only passes the handle through
//! when supervisors are constructed.

pub mod writer;

pub use writer::{JsonLinesWriter, MemoryWriter, NullWriter, Record, Writer};

use std::sync::Arc;

use crate::config::SinkKind;

/// Build the writer selected by `sink.kind`.
pub fn from_kind(kind: SinkKind) -> Arc<dyn Writer> {
    match kind {
        SinkKind::Stdout => Arc::new(JsonLinesWriter::new(std::io::stdout())),
        SinkKind::Null => Arc::new(NullWriter),
    }
}
