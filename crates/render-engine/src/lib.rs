//! SwingTrace Render Engine
//!
//! Turns the tracer timeline into pixels, either live over playback or
//! baked into an exported video.
//!
//! # Pipeline Architecture
//!
//! ```text
//! session ──┬── overlay::render_playback ──► draw commands (live path)
//!           ├── overlay::render_editor ────► draw commands (edit handles)
//!           │
//!           └── projector::project_overlay ─► overlay.svg
//!                                                │
//! source.mp4 ──── probe::probe_media ───────────┤ (real dimensions)
//!                                                ▼
//!                                     export::ExportSession (ffmpeg)
//!                                                │
//!                                                ▼
//!                                           output.mp4
//! ```

pub mod export;
pub mod overlay;
pub mod probe;
pub mod projector;

pub use export::*;
pub use overlay::*;
pub use probe::*;
pub use projector::*;
