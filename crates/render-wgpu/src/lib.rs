//! wgpu render backend.
//!
//! Implements [`facet_render::Renderer`] on top of a wgpu device: one render
//! pipeline per shader program, one vertex/index buffer pair per mesh, a
//! depth attachment sized to the viewport.
//!
//! # Invariants
//! - Shader compile and link failures are captured with error scopes and
//!   returned as `ShaderError`; they never reach the uncaptured-error handler.
//! - Released meshes and programs destroy their buffers immediately.

mod context;
mod gpu;
mod mesh;
mod program;

pub use context::{GpuContext, GpuInitError};
pub use gpu::WgpuRenderer;
pub use mesh::{GpuMesh, Vertex, interleave};
pub use program::ShaderProgram;
