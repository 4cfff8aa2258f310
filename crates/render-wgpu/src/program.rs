use crate::context::GpuContext;
use crate::mesh::Vertex;
use facet_render::{
    BindPoint, Globals, ProgramUniforms, ShaderError, ShaderStage, UniformSet, VERTEX_ATTRIBUTES,
    split_stages,
};
use glam::{Mat4, Vec4};

/// Compile one stage into a shader module, capturing validation errors.
pub(crate) fn compile_stage(
    ctx: &GpuContext,
    stage: &ShaderStage,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let (module, error) = ctx.capture_validation(|device| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(stage.label),
            source: wgpu::ShaderSource::Wgsl(stage.source.into()),
        })
    });
    match error {
        Some(log) => Err(ShaderError::Compilation {
            stage: stage.kind,
            label: stage.label.to_string(),
            log,
        }),
        None => Ok(module),
    }
}

/// A vertex + fragment stage pair linked into a render pipeline, with its own
/// uniform buffer.
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: ProgramUniforms,
    attributes: Vec<(&'static str, u32)>,
}

impl ShaderProgram {
    /// Compile every stage, then link them. Nothing is returned unless both
    /// steps succeed.
    pub fn new(
        ctx: &GpuContext,
        surface_format: wgpu::TextureFormat,
        stages: &[ShaderStage],
    ) -> Result<Self, ShaderError> {
        let (vertex, fragment) = split_stages(stages)?;
        let vs_module = compile_stage(ctx, vertex)?;
        let fs_module = compile_stage(ctx, fragment)?;
        let label = format!("{}+{}", vertex.label, fragment.label);

        let (linked, error) = ctx.capture_validation(|device| {
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("program_uniform_buffer"),
                size: std::mem::size_of::<Globals>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("globals_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("globals_bind_group"),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("program_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vs_module,
                    entry_point: Some(vertex.kind.entry_point()),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fs_module,
                    entry_point: Some(fragment.kind.entry_point()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: crate::gpu::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            });

            (pipeline, uniform_buffer, bind_group)
        });

        let (pipeline, uniform_buffer, bind_group) = linked;
        if let Some(log) = error {
            uniform_buffer.destroy();
            return Err(ShaderError::Link { log });
        }

        let attributes = VERTEX_ATTRIBUTES
            .into_iter()
            .filter(|(name, loc)| {
                vertex
                    .source
                    .contains(&format!("@location({loc}) {name}:"))
            })
            .collect();

        tracing::debug!("linked shader program {label}");

        Ok(Self {
            label,
            pipeline,
            uniform_buffer,
            bind_group,
            uniforms: ProgramUniforms::new(UniformSet::scan([vertex.source, fragment.source])),
            attributes,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bind point of a uniform the program reads.
    pub fn binding(&self, name: &str) -> Option<BindPoint> {
        self.uniforms.binding(name)
    }

    /// Shader location of a vertex attribute the vertex stage declares.
    pub fn attribute(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, loc)| *loc)
    }

    pub fn set_time(&mut self, time: f32) {
        self.uniforms.set_time(time);
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.uniforms.set_color(color);
    }

    pub fn set_camera_matrices(&mut self, view: Mat4, projection: Mat4) {
        self.uniforms.set_camera_matrices(view, projection);
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.uniforms.set_model_matrix(model);
    }

    /// Upload staged uniforms if any changed.
    pub(crate) fn flush(&mut self, queue: &wgpu::Queue) {
        if let Some(globals) = self.uniforms.flush() {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(globals));
        }
    }

    pub(crate) fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Free the uniform buffer now; the pipeline goes with the value.
    pub fn release(self) {
        tracing::debug!("released shader program {}", self.label);
        self.uniform_buffer.destroy();
    }
}
