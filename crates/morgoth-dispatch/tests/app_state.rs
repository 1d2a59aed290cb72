#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use morgoth_dispatch::app_state::AppState;
use morgoth_dispatch::config;
use morgoth_dispatch::sink::{MemoryWriter, Record};

const CFG: &str = r#"
version: 1
sink:
  kind: "null"
metrics:
  - pattern: "app.*.errors"
  - pattern: "hosts/*/cpu/**"
"#;

#[test]
fn builds_manager_from_config() {
    let state = AppState::new(config::load_from_str(CFG).unwrap()).unwrap();
    assert_eq!(state.manager().registry().len(), 2);

    state.manager().observe_str("hosts/h1/cpu/0/idle");
    state.manager().observe_str("hosts.h1.cpu");
    assert_eq!(state.manager().known_count(), 1);
}

#[test]
fn clones_share_one_manager() {
    let writer = Arc::new(MemoryWriter::new());
    let state = AppState::with_writer(config::load_from_str(CFG).unwrap(), writer.clone()).unwrap();
    let other = state.clone();

    state.manager().observe_str("app.web.errors");
    other.manager().observe_str("app.web.errors");

    assert_eq!(
        writer.records(),
        vec![Record::SeriesTracked {
            metric: "app.web.errors".into(),
            pattern: "app.*.errors".into()
        }]
    );
}
