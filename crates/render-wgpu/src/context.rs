/// Errors from acquiring a GPU device.
#[derive(Debug, thiserror::Error)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Device and queue, passed explicitly to everything that touches the GPU.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Pick an adapter able to present to `surface` and open a device on it.
    pub fn request(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<(Self, wgpu::Adapter), GpuInitError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuInitError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("facet_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        tracing::info!(
            "GPU initialized: {} ({} backend)",
            adapter.get_info().name,
            adapter.get_info().backend.to_str()
        );

        Ok((Self { device, queue }, adapter))
    }

    /// Run `f` inside a validation error scope and return the captured error
    /// text, if any.
    pub(crate) fn capture_validation<T>(&self, f: impl FnOnce(&wgpu::Device) -> T) -> (T, Option<String>) {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(&self.device);
        let error = pollster::block_on(self.device.pop_error_scope());
        (value, error.map(|e| e.to_string()))
    }
}
