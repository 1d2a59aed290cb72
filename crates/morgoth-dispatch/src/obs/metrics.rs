//! Counter and gauge families for the dispatcher.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Label values on the hot path are low-cardinality (`path`,
//! configured `pattern`), never raw metric ids.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let key = label_key(labels);
        // Read lock first; the series almost always exists already.
        if let Some(c) = self.map.get(&key) {
            c.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

/// Which branch an `observe` call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservePath {
    /// Already in the identifier set.
    Known,
    /// First sight, registered with a supervisor.
    New,
    /// No pattern matched.
    Unmonitored,
}

impl ObservePath {
    pub fn as_str(self) -> &'static str {
        match self {
            ObservePath::Known => "known",
            ObservePath::New => "new",
            ObservePath::Unmonitored => "unmonitored",
        }
    }
}

#[derive(Default)]
pub struct DispatchMetrics {
    // One plain atomic per path: the known path runs on every sample and
    // must not build label vectors.
    observed_known: AtomicU64,
    observed_new: AtomicU64,
    observed_unmonitored: AtomicU64,
    /// First-sight registrations per owning pattern. Since the identifier
    /// set never shrinks, this is also the number of series each pattern owns.
    pub registered: CounterVec,
}

impl DispatchMetrics {
    pub fn record(&self, path: ObservePath) {
        self.slot(path).fetch_add(1, Ordering::Relaxed);
    }

    pub fn observed(&self, path: ObservePath) -> u64 {
        self.slot(path).load(Ordering::Relaxed)
    }

    fn slot(&self, path: ObservePath) -> &AtomicU64 {
        match path {
            ObservePath::Known => &self.observed_known,
            ObservePath::New => &self.observed_new,
            ObservePath::Unmonitored => &self.observed_unmonitored,
        }
    }

    /// Render all registered metrics plus any extra lines provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# TYPE morgoth_observed_total counter");
        for path in [ObservePath::Known, ObservePath::New, ObservePath::Unmonitored] {
            let _ = writeln!(
                out,
                "morgoth_observed_total{{path=\"{}\"}} {}",
                path.as_str(),
                self.observed(path)
            );
        }
        self.registered.render("morgoth_registered_total", &mut out);
        for (k, v) in extra {
            let _ = writeln!(out, "{} {}", k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("a", "1"), ("b", "2")]);
        c.inc(&[("b", "2"), ("a", "1")]);
        assert_eq!(c.get(&[("a", "1"), ("b", "2")]), 2);
    }

    #[test]
    fn render_prometheus_text() {
        let m = DispatchMetrics::default();
        m.record(ObservePath::New);
        m.registered.inc(&[("pattern", "db.\"x\"")]);
        let out = m.render(&[("morgoth_supervisors", 2)]);
        assert!(out.contains("# TYPE morgoth_observed_total counter"));
        assert!(out.contains("morgoth_observed_total{path=\"new\"} 1"));
        assert!(out.contains("morgoth_observed_total{path=\"known\"} 0"));
        assert!(out.contains("morgoth_registered_total{pattern=\"db.\\\"x\\\"\"} 1"));
        assert!(out.ends_with("morgoth_supervisors 2\n"));
    }
}
