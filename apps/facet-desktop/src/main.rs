use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use egui::Context as EguiContext;
use facet_common::{Controls, FragmentShader, MAX_TESSELLATION, Rgba, Shape, VertexShader};
use facet_input::{ControlEvent, ControlPanel};
use facet_render::Camera;
use facet_render_wgpu::{GpuContext, GpuInitError, WgpuRenderer};
use facet_scene::{DriverStats, FrameDriver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Distance multiplier per wheel line.
const ZOOM_STEP: f32 = 0.9;
const PIXELS_PER_LINE: f32 = 40.0;

#[derive(Parser)]
#[command(name = "facet-desktop", about = "Interactive mesh and shader demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// YAML file with the starting control values
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Icosphere subdivision level (0-8), overrides the preset
    #[arg(long)]
    tessellation: Option<u32>,

    /// Shape to show first, overrides the preset
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Sphere,
    Square,
    Cube,
}

impl From<ShapeArg> for Shape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Sphere => Shape::Sphere,
            ShapeArg::Square => Shape::Square,
            ShapeArg::Cube => Shape::Cube,
        }
    }
}

impl Cli {
    fn initial_controls(&self) -> Result<Controls> {
        let mut controls = match &self.preset {
            Some(path) => Controls::load_preset(path)
                .with_context(|| format!("loading preset {}", path.display()))?,
            None => Controls::default(),
        };
        if let Some(level) = self.tessellation {
            controls.tessellation = level;
        }
        if let Some(shape) = self.shape {
            controls.shape = shape.into();
        }
        Ok(controls.sanitized())
    }
}

/// Everything that only exists once the window and device are up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    driver: FrameDriver<WgpuRenderer>,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct App {
    size: PhysicalSize<u32>,
    panel: ControlPanel,
    shader_error: Option<String>,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(controls: Controls, size: PhysicalSize<u32>) -> Self {
        Self {
            size,
            panel: ControlPanel::new(controls),
            shader_error: None,
            dragging: false,
            cursor: None,
            egui_ctx: EguiContext::default(),
            gpu: None,
            fatal: None,
        }
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Facet")
            .with_inner_size(self.size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(GpuInitError::from)?;
        let (ctx, adapter) = GpuContext::request(&instance, Some(&surface))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, surface_format, None, 1, false);
        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let mut renderer = WgpuRenderer::new(ctx, surface_format, config.width, config.height);
        renderer.validate_library()?;
        let mut driver = FrameDriver::new(&mut renderer, *self.panel.controls(), Camera::default())?;
        driver.resize(&mut renderer, config.width, config.height);

        Ok(Gpu {
            window,
            surface,
            config,
            renderer,
            driver,
            egui_winit,
            egui_renderer,
        })
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.take() {
            let Gpu {
                mut renderer,
                driver,
                ..
            } = gpu;
            driver.release(&mut renderer);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface
                    .configure(&gpu.renderer.context().device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let readout = Readout {
            fps: gpu.driver.clock().fps(),
            stats: gpu.driver.stats(),
            shader_error: self.shader_error.as_deref(),
        };
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_panel(ctx, &mut self.panel, &readout);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        for event in self.panel.drain_events() {
            let shader_change = matches!(event, ControlEvent::ShaderChanged { .. });
            match gpu.driver.handle(&mut gpu.renderer, event) {
                Ok(()) if shader_change => self.shader_error = None,
                Ok(()) => {}
                Err(e) => self.shader_error = Some(e.to_string()),
            }
        }

        gpu.driver.tick(&mut gpu.renderer, &view, Instant::now());

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &gpu.renderer.context().device;
        let queue = &gpu.renderer.context().queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

/// Read-only values shown in the panel.
struct Readout<'a> {
    fps: Option<f64>,
    stats: DriverStats,
    shader_error: Option<&'a str>,
}

fn combo<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    options: &[T],
    name: fn(T) -> &'static str,
) {
    egui::ComboBox::from_label(label)
        .selected_text(name(*value))
        .show_ui(ui, |ui| {
            for &option in options {
                ui.selectable_value(value, option, name(option));
            }
        });
}

fn draw_panel(ctx: &EguiContext, panel: &mut ControlPanel, readout: &Readout<'_>) {
    egui::SidePanel::right("controls")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Controls");
            ui.separator();

            let mut controls = *panel.controls();
            ui.add(
                egui::Slider::new(&mut controls.tessellation, 0..=MAX_TESSELLATION)
                    .text("Tessellation"),
            );
            combo(ui, "Shape", &mut controls.shape, &Shape::ALL, Shape::label);
            combo(
                ui,
                "Fragment shader",
                &mut controls.fragment_shader,
                &FragmentShader::ALL,
                FragmentShader::label,
            );
            combo(
                ui,
                "Vertex shader",
                &mut controls.vertex_shader,
                &VertexShader::ALL,
                VertexShader::label,
            );

            // Only write the color back on edits; the 0-255 round trip is lossy.
            let mut rgba = controls.color.to_unit().to_array();
            let picked = ui
                .horizontal(|ui| {
                    ui.label("Color");
                    ui.color_edit_button_rgba_unmultiplied(&mut rgba)
                })
                .inner;
            if picked.changed() {
                controls.color = Rgba::from_unit(rgba);
            }
            panel.apply(controls);

            if ui.button("Load Scene").clicked() {
                panel.request_reload();
            }

            ui.separator();
            ui.label(match readout.fps {
                Some(fps) => format!("{fps:.0} fps"),
                None => "-- fps".to_string(),
            });
            ui.label(format!(
                "Frames: {}  Programs: {}  Mesh rebuilds: {}",
                readout.stats.frames, readout.stats.shader_builds, readout.stats.mesh_rebuilds
            ));
            if let Some(err) = readout.shader_error {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, err);
            }

            ui.separator();
            ui.small("LMB drag: orbit | Wheel: zoom");
        });
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            if matches!(
                event,
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    ..
                }
            ) {
                self.dragging = false;
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(new_size) => {
                gpu.config.width = new_size.width.max(1);
                gpu.config.height = new_size.height.max(1);
                gpu.surface
                    .configure(&gpu.renderer.context().device, &gpu.config);
                gpu.driver
                    .resize(&mut gpu.renderer, gpu.config.width, gpu.config.height);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.cursor) {
                    gpu.driver.camera_mut().orbit(
                        (position.x - last.x) as f32,
                        (position.y - last.y) as f32,
                    );
                }
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                gpu.driver.camera_mut().zoom(ZOOM_STEP.powf(lines));
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("facet-desktop starting");

    let controls = cli.initial_controls()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(controls, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
