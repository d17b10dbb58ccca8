//! SwingTrace Processing Core
//!
//! Ball tracking that turns a loaded video into tracer points. Real
//! detection is not implemented: [`SyntheticTracker`] produces a fixed,
//! deterministic launch curve so the editing and export pipeline can be
//! exercised end to end.
//!
//! This crate is pure computation: no I/O, no platform dependencies.

pub mod auto_trace;

pub use auto_trace::{BallTracker, SyntheticTracker, SyntheticTrackerConfig};
