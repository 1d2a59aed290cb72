//! Shared application state for the dispatcher process.
//!
//! Builds the output sink and the manager from a validated config. Startup
//! errors are returned, never panicked on.

use std::sync::Arc;

use morgoth_core::error::Result;

use crate::config::MorgothConfig;
use crate::ingest::Manager;
use crate::sink::{self, Writer};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: MorgothConfig,
    manager: Manager,
}

impl AppState {
    /// Build state with the sink selected by `cfg.sink.kind`.
    pub fn new(cfg: MorgothConfig) -> Result<Self> {
        let writer = sink::from_kind(cfg.sink.kind);
        Self::with_writer(cfg, writer)
    }

    pub fn with_writer(cfg: MorgothConfig, writer: Arc<dyn Writer>) -> Result<Self> {
        let manager = Manager::new(&cfg.metrics, writer)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, manager }),
        })
    }

    pub fn cfg(&self) -> &MorgothConfig {
        &self.inner.cfg
    }

    pub fn manager(&self) -> &Manager {
        &self.inner.manager
    }
}
