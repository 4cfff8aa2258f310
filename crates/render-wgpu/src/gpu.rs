use crate::context::GpuContext;
use crate::mesh::GpuMesh;
use crate::program::{ShaderProgram, compile_stage};
use facet_geometry::MeshData;
use facet_render::{Camera, Renderer, ShaderError, ShaderStage, shaders};
use glam::{Mat4, Vec4};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu-based renderer: clears the frame and draws meshes with a shader
/// program into a surface texture.
pub struct WgpuRenderer {
    ctx: GpuContext,
    surface_format: wgpu::TextureFormat,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    viewport: (u32, u32),
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    pub fn new(
        ctx: GpuContext,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let (depth_texture, depth_view) = Self::create_depth_texture(&ctx.device, width, height);
        Self {
            ctx,
            surface_format,
            depth_texture,
            depth_view,
            viewport: (width, height),
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Compile every stage in the embedded library once. Called at startup so
    /// a broken shader fails fast instead of on first selection.
    pub fn validate_library(&self) -> Result<(), ShaderError> {
        for stage in shaders::all_stages() {
            compile_stage(&self.ctx, &stage)?;
        }
        tracing::debug!("shader library validated");
        Ok(())
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: bool,
    ) -> wgpu::RenderPass<'e> {
        let (color_load, depth_load) = if clear {
            (wgpu::LoadOp::Clear(self.clear_color), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };
        encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(if clear { "clear_pass" } else { "main_pass" }),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            })
    }
}

impl Renderer for WgpuRenderer {
    type Target = wgpu::TextureView;
    type Mesh = GpuMesh;
    type Program = ShaderProgram;

    fn create_mesh(&mut self, mesh: &MeshData) -> GpuMesh {
        GpuMesh::new(&self.ctx, mesh)
    }

    fn release_mesh(&mut self, mesh: GpuMesh) {
        mesh.release();
    }

    fn create_program(&mut self, stages: &[ShaderStage]) -> Result<ShaderProgram, ShaderError> {
        ShaderProgram::new(&self.ctx, self.surface_format, stages)
    }

    fn release_program(&mut self, program: ShaderProgram) {
        program.release();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.depth_texture.destroy();
        let (texture, view) = Self::create_depth_texture(&self.ctx.device, width, height);
        self.depth_texture = texture;
        self.depth_view = view;
        self.viewport = (width, height);
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn clear(&mut self, target: &wgpu::TextureView) {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        drop(self.begin_pass(&mut encoder, target, true));
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn render(
        &mut self,
        target: &wgpu::TextureView,
        camera: &Camera,
        program: &mut ShaderProgram,
        meshes: &[&GpuMesh],
        color: Vec4,
        time: f32,
    ) {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = self.begin_pass(&mut encoder, target, false);
            for mesh in meshes {
                program.bind(&mut pass);
                program.set_model_matrix(Mat4::IDENTITY);
                program.set_camera_matrices(camera.view_matrix(), camera.projection_matrix());
                program.set_color(color);
                program.set_time(time);
                program.flush(&self.ctx.queue);
                mesh.draw(&mut pass);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}
