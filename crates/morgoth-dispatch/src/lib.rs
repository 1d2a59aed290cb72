//! morgoth metric dispatcher library entry.
//!
//! This crate wires configuration, the supervisor registry, the identifier
//! set, and the output sink into the ingestion `Manager`. It is intended to be
//! consumed by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod ingest;
pub mod obs;
pub mod sink;
pub mod supervisor;

pub use ingest::{IdentifierSet, Manager};
pub use supervisor::{Registry, Supervisor};
