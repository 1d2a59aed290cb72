//! Dispatcher config loader (strict parsing).

pub mod schema;

use std::fs;

use morgoth_core::error::{MorgothError, Result};

pub use schema::{
    DetectorConf, MetricConf, MgofConf, MgofWindow, MorgothConfig, SinkKind, SinkSection,
    ThresholdConf,
};

pub fn load_from_file(path: &str) -> Result<MorgothConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MorgothError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MorgothConfig> {
    let cfg: MorgothConfig = serde_yaml::from_str(s)
        .map_err(|e| MorgothError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
