use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use morgoth_core::error::{MorgothError, Result};
use morgoth_core::Pattern;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MorgothConfig {
    pub version: u32,

    #[serde(default)]
    pub sink: SinkSection,

    /// Supervisor definitions. Order is precedence: the first pattern that
    /// matches a metric owns it.
    #[serde(default)]
    pub metrics: Vec<MetricConf>,
}

impl MorgothConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MorgothError::UnsupportedVersion);
        }
        if self.metrics.is_empty() {
            return Err(MorgothError::BadConfig("metrics must not be empty".into()));
        }

        let mut seen = HashSet::with_capacity(self.metrics.len());
        for (idx, m) in self.metrics.iter().enumerate() {
            m.validate()
                .map_err(|e| annotate(e, &format!("metrics[{idx}]")))?;
            if !seen.insert(m.pattern.as_str()) {
                return Err(MorgothError::DuplicatePattern(format!(
                    "metrics[{idx}].pattern {:?} is already declared",
                    m.pattern
                )));
            }
        }
        Ok(())
    }
}

fn annotate(e: MorgothError, at: &str) -> MorgothError {
    match e {
        MorgothError::InvalidPattern(m) => MorgothError::InvalidPattern(format!("{at}: {m}")),
        MorgothError::BadConfig(m) => MorgothError::BadConfig(format!("{at}: {m}")),
        other => other,
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SinkSection {
    #[serde(default)]
    pub kind: SinkKind,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// JSON lines on stdout.
    #[default]
    Stdout,
    /// Discard everything.
    Null,
}

/// One supervisor definition: the pattern it owns plus its detector settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConf {
    pub pattern: String,

    #[serde(default)]
    pub detectors: Vec<DetectorConf>,
}

impl MetricConf {
    /// Definition with no detectors; handy for wiring and tests.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            detectors: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Pattern::parse(&self.pattern)?;
        for (idx, d) in self.detectors.iter().enumerate() {
            d.validate()
                .map_err(|e| annotate(e, &format!("detectors[{idx}]")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectorConf {
    Threshold(ThresholdConf),
    Mgof(MgofConf),
}

impl DetectorConf {
    pub fn name(&self) -> &'static str {
        match self {
            DetectorConf::Threshold(_) => "threshold",
            DetectorConf::Mgof(_) => "mgof",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            DetectorConf::Threshold(t) => t.validate(),
            DetectorConf::Mgof(m) => m.validate(),
        }
    }
}

/// Window is anomalous when the given percentile of its data exceeds
/// `threshold`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConf {
    pub threshold: f64,
    pub percentile: u8,
}

impl ThresholdConf {
    pub fn validate(&self) -> Result<()> {
        if self.percentile > 100 {
            return Err(MorgothError::BadConfig(
                "threshold.percentile must be between 0 and 100".into(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(MorgothError::BadConfig("threshold.threshold must be finite".into()));
        }
        Ok(())
    }
}

/// Multinomial goodness-of-fit detector settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MgofConf {
    #[serde(default = "default_period")]
    pub period: String,

    #[serde(default = "default_duration")]
    pub duration: String,

    #[serde(default = "default_n_bins")]
    pub n_bins: u32,

    #[serde(default = "default_count_threshold")]
    pub count_threshold: u32,

    #[serde(default = "default_chi2_percentage")]
    pub chi2_percentage: f64,

    #[serde(default)]
    pub windows: Vec<MgofWindow>,
}

impl MgofConf {
    pub fn validate(&self) -> Result<()> {
        parse_duration(&self.period)?;
        parse_duration(&self.duration)?;
        for w in &self.windows {
            parse_duration(&w.offset)?;
            parse_duration(&w.duration)?;
        }
        if self.n_bins == 0 {
            return Err(MorgothError::BadConfig("mgof.n_bins must be at least 1".into()));
        }
        if !(self.chi2_percentage > 0.0 && self.chi2_percentage < 1.0) {
            return Err(MorgothError::BadConfig(
                "mgof.chi2_percentage must be between 0 and 1 (exclusive)".into(),
            ));
        }
        if self.windows.len() <= self.count_threshold as usize {
            tracing::warn!(
                count_threshold = self.count_threshold,
                windows = self.windows.len(),
                "mgof count_threshold does not allow for any bad training windows"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MgofWindow {
    pub offset: String,
    pub duration: String,
}

fn default_period() -> String {
    "15m".into()
}
fn default_duration() -> String {
    "15m".into()
}
fn default_n_bins() -> u32 {
    20
}
fn default_count_threshold() -> u32 {
    1
}
fn default_chi2_percentage() -> f64 {
    0.95
}

/// Parse `<int><unit>` where unit is one of `s`, `m`, `h`, `d`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let bad = || MorgothError::BadConfig(format!("invalid duration: {s:?} (expected e.g. 15m)"));

    let (unit_at, _) = s.char_indices().last().ok_or_else(bad)?;
    let (num, unit) = s.split_at(unit_at);
    let n: u64 = num.parse().map_err(|_| bad())?;
    let secs = match unit {
        "s" => n,
        "m" => n.checked_mul(60).ok_or_else(bad)?,
        "h" => n.checked_mul(3_600).ok_or_else(bad)?,
        "d" => n.checked_mul(86_400).ok_or_else(bad)?,
        _ => return Err(bad()),
    };
    Ok(Duration::from_secs(secs))
}
