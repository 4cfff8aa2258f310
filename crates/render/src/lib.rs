//! Rendering interface: backend-agnostic renderer trait, camera, shader
//! library and uniform staging.
//!
//! # Invariants
//! - A program handle exists only once linked; drawing with an unlinked
//!   program is unrepresentable.
//! - Uniform setters for uniforms a program does not read are no-ops.
//! - The projection matrix changes only through `update_projection_matrix`.
//!
//! The [`DebugTextRenderer`] backend records operations as text so the frame
//! driver and CLI can run without a GPU. The wgpu backend lives in
//! `facet-render-wgpu`.

mod camera;
mod renderer;
pub mod shaders;
mod stage;
mod uniforms;

pub use camera::Camera;
pub use renderer::{
    DebugMesh, DebugProgram, DebugTextRenderer, DrawRecord, Renderer, stage_draw_uniforms,
};
pub use stage::{ShaderError, ShaderStage, StageKind, split_stages};
pub use uniforms::{BindPoint, Globals, ProgramUniforms, Uniform, UniformSet, VERTEX_ATTRIBUTES};
