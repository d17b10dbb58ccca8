//! SwingTrace Common Utilities
//!
//! Shared infrastructure for all SwingTrace crates:
//! - Error types and result aliases
//! - Playback clock mapping media time to frame indices
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
