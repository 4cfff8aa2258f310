use crate::camera::Camera;
use crate::stage::{ShaderError, ShaderStage, split_stages};
use crate::uniforms::{Globals, ProgramUniforms, UniformSet};
use facet_geometry::MeshData;
use glam::{Mat4, Vec4};

/// Backend-agnostic renderer interface. All backends implement this trait.
///
/// Meshes and programs are owned handles: `create_*` hands one out and
/// `release_*` consumes it, so a GPU resource cannot be uploaded twice into
/// the same handle or freed twice. A `Program` only exists once linked.
pub trait Renderer {
    /// What a frame is drawn into (a surface texture view, or nothing).
    type Target: ?Sized;
    type Mesh;
    type Program;

    /// Allocate and fill GPU buffers for a mesh.
    fn create_mesh(&mut self, mesh: &MeshData) -> Self::Mesh;

    fn release_mesh(&mut self, mesh: Self::Mesh);

    /// Compile each stage and link them into one program.
    fn create_program(&mut self, stages: &[ShaderStage]) -> Result<Self::Program, ShaderError>;

    fn release_program(&mut self, program: Self::Program);

    /// Resize the viewport.
    fn set_size(&mut self, width: u32, height: u32);

    fn viewport(&self) -> (u32, u32);

    /// Clear color and depth.
    fn clear(&mut self, target: &Self::Target);

    /// Draw each mesh with `program`, uploading camera, color and time
    /// uniforms first.
    fn render(
        &mut self,
        target: &Self::Target,
        camera: &Camera,
        program: &mut Self::Program,
        meshes: &[&Self::Mesh],
        color: Vec4,
        time: f32,
    );
}

/// Stage uniforms for one draw the way every backend does it.
pub fn stage_draw_uniforms(
    uniforms: &mut ProgramUniforms,
    camera: &Camera,
    color: Vec4,
    time: f32,
) {
    uniforms.set_model_matrix(Mat4::IDENTITY);
    uniforms.set_camera_matrices(camera.view_matrix(), camera.projection_matrix());
    uniforms.set_color(color);
    uniforms.set_time(time);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMesh {
    pub id: u32,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

#[derive(Debug, Clone)]
pub struct DebugProgram {
    pub id: u32,
    pub labels: [&'static str; 2],
    pub uniforms: ProgramUniforms,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub program: u32,
    pub mesh: u32,
    pub triangle_count: usize,
    pub globals: Globals,
}

/// Headless renderer that records every operation as text.
///
/// Useful for CLI output, logging, and testing the frame driver without a
/// GPU. Tracks live resources so tests can spot leaks.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    lines: Vec<String>,
    draws: Vec<DrawRecord>,
    viewport: (u32, u32),
    next_id: u32,
    live_meshes: usize,
    live_programs: usize,
    programs_built: usize,
    clears: usize,
    fail_compiles: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `create_program` fail, to exercise error paths.
    pub fn set_fail_compiles(&mut self, fail: bool) {
        self.fail_compiles = fail;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn live_meshes(&self) -> usize {
        self.live_meshes
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs
    }

    /// Programs successfully linked so far.
    pub fn programs_built(&self) -> usize {
        self.programs_built
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl Renderer for DebugTextRenderer {
    type Target = ();
    type Mesh = DebugMesh;
    type Program = DebugProgram;

    fn create_mesh(&mut self, mesh: &MeshData) -> DebugMesh {
        let id = self.next_id();
        self.live_meshes += 1;
        self.lines.push(format!(
            "create mesh #{id}: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        ));
        DebugMesh {
            id,
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
        }
    }

    fn release_mesh(&mut self, mesh: DebugMesh) {
        self.live_meshes -= 1;
        self.lines.push(format!("release mesh #{}", mesh.id));
    }

    fn create_program(&mut self, stages: &[ShaderStage]) -> Result<DebugProgram, ShaderError> {
        let (vertex, fragment) = split_stages(stages)?;
        for stage in [vertex, fragment] {
            if self.fail_compiles || !stage.declares_entry_point() {
                tracing::debug!("text renderer rejected stage {}", stage.label);
                return Err(ShaderError::Compilation {
                    stage: stage.kind,
                    label: stage.label.to_string(),
                    log: format!("entry point `{}` not found", stage.kind.entry_point()),
                });
            }
        }

        let id = self.next_id();
        self.live_programs += 1;
        self.programs_built += 1;
        self.lines.push(format!(
            "create program #{id}: {} + {}",
            vertex.label, fragment.label
        ));
        Ok(DebugProgram {
            id,
            labels: [vertex.label, fragment.label],
            uniforms: ProgramUniforms::new(UniformSet::scan([vertex.source, fragment.source])),
        })
    }

    fn release_program(&mut self, program: DebugProgram) {
        self.live_programs -= 1;
        self.lines.push(format!("release program #{}", program.id));
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.lines.push(format!("viewport {width}x{height}"));
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn clear(&mut self, _target: &()) {
        self.clears += 1;
        self.lines.push("clear".into());
    }

    fn render(
        &mut self,
        _target: &(),
        camera: &Camera,
        program: &mut DebugProgram,
        meshes: &[&DebugMesh],
        color: Vec4,
        time: f32,
    ) {
        for mesh in meshes {
            stage_draw_uniforms(&mut program.uniforms, camera, color, time);
            program.uniforms.flush();
            self.lines.push(format!(
                "draw mesh #{} with program #{} ({} triangles) t={time:.3}",
                mesh.id, program.id, mesh.triangle_count
            ));
            self.draws.push(DrawRecord {
                program: program.id,
                mesh: mesh.id,
                triangle_count: mesh.triangle_count,
                globals: *program.uniforms.staged(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders;
    use facet_common::{FragmentShader, VertexShader};
    use facet_geometry::cube;
    use glam::Vec3;

    #[test]
    fn mesh_lifecycle_is_tracked() {
        let mut r = DebugTextRenderer::new();
        let m = r.create_mesh(&cube(Vec3::ZERO));
        assert_eq!(m.triangle_count, 12);
        assert_eq!(r.live_meshes(), 1);
        r.release_mesh(m);
        assert_eq!(r.live_meshes(), 0);
    }

    #[test]
    fn program_from_library_links() {
        let mut r = DebugTextRenderer::new();
        let p = r
            .create_program(&shaders::stages(VertexShader::Wave, FragmentShader::Lambert))
            .unwrap();
        assert_eq!(p.labels, ["wave_vert", "lambert_frag"]);
        assert!(p.uniforms.binding("time").is_some());
        assert_eq!(r.programs_built(), 1);
    }

    #[test]
    fn failed_compile_builds_nothing() {
        let mut r = DebugTextRenderer::new();
        r.set_fail_compiles(true);
        let err = r
            .create_program(&shaders::stages(VertexShader::Lambert, FragmentShader::Lambert))
            .unwrap_err();
        assert!(matches!(err, ShaderError::Compilation { .. }));
        assert_eq!(r.live_programs(), 0);
    }

    #[test]
    fn render_records_one_draw_per_mesh() {
        let mut r = DebugTextRenderer::new();
        let a = r.create_mesh(&cube(Vec3::ZERO));
        let b = r.create_mesh(&cube(Vec3::X));
        let mut p = r
            .create_program(&shaders::stages(VertexShader::Lambert, FragmentShader::PulsingGlow))
            .unwrap();
        let cam = Camera::default();
        r.render(&(), &cam, &mut p, &[&a, &b], Vec4::ONE, 1.5);

        assert_eq!(r.draws().len(), 2);
        assert_eq!(r.draws()[1].mesh, b.id);
        assert_eq!(r.draws()[0].globals.time, 1.5);
        assert_eq!(
            r.draws()[0].globals.view_proj,
            cam.view_projection().to_cols_array_2d()
        );
        assert!(r.output().contains("draw mesh"));
    }
}
