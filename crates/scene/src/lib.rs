//! Frame driver: the demo's single "running" state.
//!
//! # Invariants
//! - State changes only through explicit control events.
//! - Each GPU mesh and program has exactly one owner; a replaced one is
//!   released once its successor exists.
//! - A rejected shader change leaves the previous program active.
//! - Elapsed time starts at 0 and never decreases.

pub mod clock;
pub mod driver;

pub use clock::FrameClock;
pub use driver::{DriverStats, FrameDriver, FrameInfo, SceneMeshes};
