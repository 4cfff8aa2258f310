//! Shared control types: the panel's configuration record and its selectors.
//!
//! # Invariants
//! - `Controls::sanitized` is the only place bounded fields are clamped.
//! - Selector enums are closed; every consumer matches them exhaustively.

mod preset;
mod types;

pub use preset::PresetError;
pub use types::{Controls, FragmentShader, MAX_TESSELLATION, Rgba, Shape, VertexShader};
