#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use morgoth_dispatch::config::{self, DetectorConf, SinkKind};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  - pattern: "db.*"
    detektors: [] # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
metrics:
  - pattern: "db.latency"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.sink.kind, SinkKind::Stdout);
    assert_eq!(cfg.metrics[0].pattern, "db.latency");
    assert!(cfg.metrics[0].detectors.is_empty());
}

#[test]
fn full_config_keeps_order_and_defaults() {
    let ok = r#"
version: 1
sink:
  kind: "null"
metrics:
  - pattern: "app.*.errors"
    detectors:
      - type: threshold
        threshold: 1000
        percentile: 50
  - pattern: "app.web.errors"
    detectors:
      - type: mgof
        windows:
          - { offset: "1d", duration: "15m" }
          - { offset: "2d", duration: "15m" }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.sink.kind, SinkKind::Null);

    let order: Vec<&str> = cfg.metrics.iter().map(|m| m.pattern.as_str()).collect();
    assert_eq!(order, ["app.*.errors", "app.web.errors"]);

    match &cfg.metrics[0].detectors[0] {
        DetectorConf::Threshold(t) => {
            assert_eq!(t.threshold, 1000.0);
            assert_eq!(t.percentile, 50);
        }
        other => panic!("unexpected detector {}", other.name()),
    }
    match &cfg.metrics[1].detectors[0] {
        DetectorConf::Mgof(m) => {
            assert_eq!(m.period, "15m");
            assert_eq!(m.n_bins, 20);
            assert_eq!(m.count_threshold, 1);
            assert_eq!(m.chi2_percentage, 0.95);
            assert_eq!(m.windows.len(), 2);
        }
        other => panic!("unexpected detector {}", other.name()),
    }
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\nmetrics: [{ pattern: a }]\n").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn empty_metrics_rejected() {
    let err = config::load_from_str("version: 1\n").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}

#[test]
fn duplicate_patterns_rejected() {
    let bad = r#"
version: 1
metrics:
  - pattern: "db.*"
  - pattern: "app.**"
  - pattern: "db.*"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DUPLICATE_PATTERN");
}

#[test]
fn invalid_pattern_rejected() {
    let err = config::load_from_str("version: 1\nmetrics: [{ pattern: \"db..x\" }]\n")
        .expect_err("must fail");
    assert_eq!(err.kind().as_str(), "INVALID_PATTERN");
    assert!(err.to_string().contains("metrics[0]"));
}

#[test]
fn detector_ranges_checked() {
    let bad_percentile = r#"
version: 1
metrics:
  - pattern: "db.*"
    detectors:
      - { type: threshold, threshold: 1.0, percentile: 101 }
"#;
    let err = config::load_from_str(bad_percentile).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");

    let bad_chi2 = r#"
version: 1
metrics:
  - pattern: "db.*"
    detectors:
      - { type: mgof, chi2_percentage: 1.5 }
"#;
    let err = config::load_from_str(bad_chi2).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");

    let bad_duration = r#"
version: 1
metrics:
  - pattern: "db.*"
    detectors:
      - { type: mgof, period: "fifteen" }
"#;
    let err = config::load_from_str(bad_duration).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}
