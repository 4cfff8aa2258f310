//! Control surface: panel edits mapped to change events.
//!
//! # Invariants
//! - Values leaving the panel are already clamped.
//! - An event is raised only when a value actually changes.
//! - At most one pending event of each kind.

pub mod event;
pub mod panel;

pub use event::ControlEvent;
pub use panel::ControlPanel;
