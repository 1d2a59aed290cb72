//! Top-level facade crate for morgoth.
//!
//! Re-exports core types and the dispatch library so users can depend on a single crate.

pub mod core {
    pub use morgoth_core::*;
}

pub mod dispatch {
    pub use morgoth_dispatch::*;
}
