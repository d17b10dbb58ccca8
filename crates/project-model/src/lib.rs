//! SwingTrace Project Model
//!
//! Defines the core data contracts for a tracing session:
//! - **Points:** Sparse `(frame, x, y)` ball-position samples in video pixel space
//! - **Store:** The ordered timeline of points and its edit operations
//! - **History:** Linear undo/redo over full timeline snapshots
//! - **Session:** The observable editing façade tying store, history, clock, and style together
//! - **Project:** The on-disk session file
//!
//! Coordinates are video pixels, not normalized values: the overlay has to
//! line up with the source frame exactly when baked into an export.

pub mod history;
pub mod media;
pub mod point;
pub mod project;
pub mod session;
pub mod store;
pub mod style;

pub use history::*;
pub use media::*;
pub use point::*;
pub use project::*;
pub use session::*;
pub use store::*;
pub use style::*;
