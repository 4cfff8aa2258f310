use crate::clock::FrameClock;
use facet_common::{Controls, Shape};
use facet_geometry::{MeshData, cube, icosphere, square};
use facet_input::ControlEvent;
use facet_render::{Camera, Renderer, ShaderError, shaders};
use glam::Vec3;
use std::time::Instant;

const SPHERE_RADIUS: f32 = 1.0;

/// The three demo meshes, one GPU handle each.
#[derive(Debug)]
pub struct SceneMeshes<M> {
    pub sphere: M,
    pub square: M,
    pub cube: M,
}

impl<M> SceneMeshes<M> {
    pub fn get(&self, shape: Shape) -> &M {
        match shape {
            Shape::Sphere => &self.sphere,
            Shape::Square => &self.square,
            Shape::Cube => &self.cube,
        }
    }
}

fn sphere_data(tessellation: u32) -> MeshData {
    icosphere(Vec3::ZERO, SPHERE_RADIUS, tessellation)
}

/// Counters for what the driver has done since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub frames: u64,
    /// Programs built, including the initial one.
    pub shader_builds: u64,
    /// Meshes regenerated after startup.
    pub mesh_rebuilds: u64,
}

/// What one tick drew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame: u64,
    pub time: f32,
    pub shape: Shape,
}

/// Owns the scene's GPU resources and drives one frame per tick.
///
/// All state changes arrive as [`ControlEvent`]s through [`handle`]; the
/// driver never polls the panel. Replaced meshes and programs are released
/// through the renderer as soon as their successor exists.
///
/// [`handle`]: FrameDriver::handle
pub struct FrameDriver<R: Renderer> {
    controls: Controls,
    camera: Camera,
    meshes: SceneMeshes<R::Mesh>,
    program: R::Program,
    clock: FrameClock,
    stats: DriverStats,
}

impl<R: Renderer> FrameDriver<R> {
    /// Build the initial program and upload every mesh. A program failure
    /// here is fatal to startup.
    pub fn new(renderer: &mut R, controls: Controls, camera: Camera) -> Result<Self, ShaderError> {
        let controls = controls.sanitized();
        let program = renderer.create_program(&shaders::stages(
            controls.vertex_shader,
            controls.fragment_shader,
        ))?;
        let meshes = SceneMeshes {
            sphere: renderer.create_mesh(&sphere_data(controls.tessellation)),
            square: renderer.create_mesh(&square(Vec3::ZERO)),
            cube: renderer.create_mesh(&cube(Vec3::ZERO)),
        };

        tracing::info!(
            tessellation = controls.tessellation,
            shape = controls.shape.label(),
            "scene loaded"
        );

        Ok(Self {
            controls,
            camera,
            meshes,
            program,
            clock: FrameClock::new(),
            stats: DriverStats {
                shader_builds: 1,
                ..DriverStats::default()
            },
        })
    }

    /// The values the driver is currently drawing with. These can lag the
    /// panel when a shader change was rejected.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn program(&self) -> &R::Program {
        &self.program
    }

    pub fn meshes(&self) -> &SceneMeshes<R::Mesh> {
        &self.meshes
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Apply one control change.
    ///
    /// A shader change that fails to build leaves the previous program
    /// active and returns the driver's diagnostic.
    pub fn handle(&mut self, renderer: &mut R, event: ControlEvent) -> Result<(), ShaderError> {
        match event {
            ControlEvent::TessellationChanged(level) => {
                let level = level.min(facet_common::MAX_TESSELLATION);
                if level != self.controls.tessellation {
                    self.controls.tessellation = level;
                    self.rebuild_sphere(renderer);
                }
            }
            ControlEvent::ShapeChanged(shape) => self.controls.shape = shape,
            ControlEvent::ColorChanged(color) => self.controls.color = color.clamped(),
            ControlEvent::ShaderChanged { vertex, fragment } => {
                let stages = shaders::stages(vertex, fragment);
                let program = renderer.create_program(&stages).inspect_err(|e| {
                    tracing::warn!("shader change rejected, keeping previous program: {e}");
                })?;
                let old = std::mem::replace(&mut self.program, program);
                renderer.release_program(old);
                self.controls.vertex_shader = vertex;
                self.controls.fragment_shader = fragment;
                self.stats.shader_builds += 1;
                tracing::debug!(?vertex, ?fragment, "shader program replaced");
            }
            ControlEvent::ReloadScene => self.reload(renderer),
        }
        Ok(())
    }

    /// Apply every event in order. Later events still apply after a failure;
    /// the first error is returned.
    pub fn handle_all(
        &mut self,
        renderer: &mut R,
        events: impl IntoIterator<Item = ControlEvent>,
    ) -> Result<(), ShaderError> {
        let mut first_error = None;
        for event in events {
            if let Err(e) = self.handle(renderer, event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Match the viewport and camera to a new surface size.
    pub fn resize(&mut self, renderer: &mut R, width: u32, height: u32) {
        renderer.set_size(width, height);
        self.camera
            .set_aspect_ratio(width as f32 / height.max(1) as f32);
        self.camera.update_projection_matrix();
    }

    /// Draw one frame into `target`.
    pub fn tick(&mut self, renderer: &mut R, target: &R::Target, now: Instant) -> FrameInfo {
        self.camera.update();
        let time = self.clock.tick(now);

        renderer.clear(target);
        let mesh = self.meshes.get(self.controls.shape);
        renderer.render(
            target,
            &self.camera,
            &mut self.program,
            &[mesh],
            self.controls.color.to_unit(),
            time,
        );

        self.stats.frames += 1;
        FrameInfo {
            frame: self.stats.frames,
            time,
            shape: self.controls.shape,
        }
    }

    /// Release every GPU resource the driver owns.
    pub fn release(self, renderer: &mut R) {
        let SceneMeshes {
            sphere,
            square,
            cube,
        } = self.meshes;
        for mesh in [sphere, square, cube] {
            renderer.release_mesh(mesh);
        }
        renderer.release_program(self.program);
    }

    fn rebuild_sphere(&mut self, renderer: &mut R) {
        let fresh = renderer.create_mesh(&sphere_data(self.controls.tessellation));
        let old = std::mem::replace(&mut self.meshes.sphere, fresh);
        renderer.release_mesh(old);
        self.stats.mesh_rebuilds += 1;
        tracing::debug!(level = self.controls.tessellation, "icosphere rebuilt");
    }

    fn reload(&mut self, renderer: &mut R) {
        self.rebuild_sphere(renderer);
        for (slot, data) in [
            (&mut self.meshes.square, square(Vec3::ZERO)),
            (&mut self.meshes.cube, cube(Vec3::ZERO)),
        ] {
            let old = std::mem::replace(slot, renderer.create_mesh(&data));
            renderer.release_mesh(old);
            self.stats.mesh_rebuilds += 1;
        }
        tracing::info!("scene reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_common::{FragmentShader, Rgba, VertexShader};
    use facet_geometry::icosphere_triangle_count;
    use facet_input::ControlPanel;
    use facet_render::DebugTextRenderer;
    use std::time::Duration;

    fn setup(controls: Controls) -> (DebugTextRenderer, FrameDriver<DebugTextRenderer>) {
        let mut r = DebugTextRenderer::new();
        let d = FrameDriver::new(&mut r, controls, Camera::default()).unwrap();
        (r, d)
    }

    #[test]
    fn startup_uploads_three_meshes_and_one_program() {
        let (r, d) = setup(Controls::default());
        assert_eq!(r.live_meshes(), 3);
        assert_eq!(r.live_programs(), 1);
        assert_eq!(d.stats().shader_builds, 1);
        assert_eq!(
            d.meshes().sphere.triangle_count,
            icosphere_triangle_count(5)
        );
    }

    #[test]
    fn startup_fails_without_program() {
        let mut r = DebugTextRenderer::new();
        r.set_fail_compiles(true);
        assert!(FrameDriver::new(&mut r, Controls::default(), Camera::default()).is_err());
        assert_eq!(r.live_meshes(), 0);
    }

    #[test]
    fn tessellation_change_replaces_only_sphere() {
        let (mut r, mut d) = setup(Controls::default());
        let square_id = d.meshes().square.id;
        let old_sphere = d.meshes().sphere.id;

        d.handle(&mut r, ControlEvent::TessellationChanged(2)).unwrap();

        assert_ne!(d.meshes().sphere.id, old_sphere);
        assert_eq!(d.meshes().square.id, square_id);
        assert_eq!(d.meshes().sphere.triangle_count, icosphere_triangle_count(2));
        assert_eq!(r.live_meshes(), 3);
        assert_eq!(d.stats().mesh_rebuilds, 1);
    }

    #[test]
    fn same_tessellation_is_ignored() {
        let (mut r, mut d) = setup(Controls::default());
        d.handle(&mut r, ControlEvent::TessellationChanged(5)).unwrap();
        assert_eq!(d.stats().mesh_rebuilds, 0);
    }

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let (mut r, mut d) = setup(Controls::default());
        d.resize(&mut r, 1280, 720);
        assert_eq!(r.viewport(), (1280, 720));
        assert!((d.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
        let expected = glam::Mat4::perspective_rh(
            d.camera().fovy,
            1280.0 / 720.0,
            d.camera().near,
            d.camera().far,
        );
        assert!(d.camera().projection_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn shape_switch_changes_only_drawn_mesh() {
        let (mut r, mut d) = setup(Controls::default());
        let t0 = Instant::now();
        d.tick(&mut r, &(), t0);
        let camera_before = d.camera().clone();
        let program_before = d.program().id;

        for shape in Shape::ALL {
            d.handle(&mut r, ControlEvent::ShapeChanged(shape)).unwrap();
            let info = d.tick(&mut r, &(), t0);
            assert_eq!(info.shape, shape);
            let last = r.draws().last().unwrap();
            assert_eq!(last.mesh, d.meshes().get(shape).id);
            assert_eq!(last.program, program_before);
        }

        assert_eq!(d.camera(), &camera_before);
        assert_eq!(d.program().id, program_before);
        assert_eq!(r.programs_built(), 1);
    }

    #[test]
    fn shader_switch_recompiles_once_before_next_frame() {
        let (mut r, mut d) = setup(Controls::default());
        let mut panel = ControlPanel::new(Controls::default());
        let old_program = d.program().id;

        panel.set_vertex_shader(VertexShader::Wave);
        panel.set_fragment_shader(FragmentShader::Lambert);
        d.handle_all(&mut r, panel.drain_events()).unwrap();
        d.tick(&mut r, &(), Instant::now());

        assert_eq!(r.programs_built(), 2);
        assert_eq!(r.live_programs(), 1);
        let new_program = d.program().id;
        assert_ne!(new_program, old_program);
        assert_eq!(r.draws().last().unwrap().program, new_program);
        assert_eq!(d.program().labels, ["wave_vert", "lambert_frag"]);
    }

    #[test]
    fn failed_shader_keeps_previous_program() {
        let (mut r, mut d) = setup(Controls::default());
        let old_program = d.program().id;

        r.set_fail_compiles(true);
        let err = d
            .handle(
                &mut r,
                ControlEvent::ShaderChanged {
                    vertex: VertexShader::Wave,
                    fragment: FragmentShader::Lambert,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ShaderError::Compilation { .. }));

        d.tick(&mut r, &(), Instant::now());
        assert_eq!(d.program().id, old_program);
        assert_eq!(r.draws().last().unwrap().program, old_program);
        assert_eq!(d.controls().vertex_shader, VertexShader::Lambert);
        assert_eq!(r.live_programs(), 1);
    }

    #[test]
    fn handle_all_continues_after_failure() {
        let (mut r, mut d) = setup(Controls::default());
        r.set_fail_compiles(true);
        let result = d.handle_all(
            &mut r,
            [
                ControlEvent::ShaderChanged {
                    vertex: VertexShader::Wave,
                    fragment: FragmentShader::Lambert,
                },
                ControlEvent::ShapeChanged(Shape::Sphere),
            ],
        );
        assert!(result.is_err());
        assert_eq!(d.controls().shape, Shape::Sphere);
    }

    #[test]
    fn elapsed_time_starts_at_zero_and_never_decreases() {
        let (mut r, mut d) = setup(Controls::default());
        let t0 = Instant::now();
        let mut last = -1.0;
        for ms in [0, 16, 33, 50, 49, 100] {
            let info = d.tick(&mut r, &(), t0 + Duration::from_millis(ms));
            if last < 0.0 {
                assert_eq!(info.time, 0.0);
            }
            assert!(info.time >= last);
            last = info.time;
        }
        assert_eq!(r.draws()[0].globals.time, 0.0);
    }

    #[test]
    fn color_reaches_uniforms_normalized() {
        let (mut r, mut d) = setup(Controls::default());
        d.handle(&mut r, ControlEvent::ColorChanged(Rgba([255.0, 0.0, 0.0, 0.5])))
            .unwrap();
        d.tick(&mut r, &(), Instant::now());
        assert_eq!(r.draws().last().unwrap().globals.color, [1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn every_frame_clears_first() {
        let (mut r, mut d) = setup(Controls::default());
        d.tick(&mut r, &(), Instant::now());
        d.tick(&mut r, &(), Instant::now());
        assert_eq!(r.clears(), 2);
        assert_eq!(d.stats().frames, 2);
    }

    #[test]
    fn reload_regenerates_every_mesh() {
        let (mut r, mut d) = setup(Controls::default());
        let before = [
            d.meshes().sphere.id,
            d.meshes().square.id,
            d.meshes().cube.id,
        ];
        d.handle(&mut r, ControlEvent::ReloadScene).unwrap();
        let after = [
            d.meshes().sphere.id,
            d.meshes().square.id,
            d.meshes().cube.id,
        ];
        assert!(before.iter().zip(&after).all(|(a, b)| a != b));
        assert_eq!(r.live_meshes(), 3);
        assert_eq!(d.stats().mesh_rebuilds, 3);
    }

    #[test]
    fn release_frees_everything() {
        let (mut r, d) = setup(Controls::default());
        d.release(&mut r);
        assert_eq!(r.live_meshes(), 0);
        assert_eq!(r.live_programs(), 0);
    }
}
