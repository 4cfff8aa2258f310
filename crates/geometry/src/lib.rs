//! Procedural mesh generators.
//!
//! Generators return CPU-side [`MeshData`]; uploading to the GPU is a
//! separate step owned by the render backend.
//!
//! # Invariants
//! - Every index references a valid vertex.
//! - Triangles wind counter-clockwise seen from outside.
//! - Output depends only on the inputs.

mod icosphere;
mod mesh;
mod primitives;

pub use icosphere::{icosphere, icosphere_triangle_count, icosphere_vertex_count};
pub use mesh::{MeshData, MeshError};
pub use primitives::{cube, square};
