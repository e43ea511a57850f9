use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Initialization parameters for the GPU layer.
///
/// Intentionally small; add flags only when a concrete backend requirement
/// exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is broadly supported and paces
    /// presentation to the display without tearing.
    pub present_mode: wgpu::PresentMode,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Owns the wgpu core objects and the surface configuration for one window.
///
/// The surface borrows the window; the window must outlive the `Gpu`.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

/// A single acquired frame.
///
/// Short-lived: holding the surface texture blocks acquisition of subsequent
/// frames. Presentation happens when the texture is dropped after submission.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers block
    /// on this with `pollster`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vista-engine device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format =
            choose_surface_format(&caps, init.prefer_srgb).context("no supported surface formats")?;

        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu cannot configure a 0x0 surface; in that case only internal state
    /// is updated and configuration is deferred to the next nonzero resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            self.size = new_size;
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture and creates an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vista frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands; dropping the texture presents.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        drop(frame.surface_texture);
    }

    /// Converts a `SurfaceError` into a higher-level action.
    ///
    /// Lost/outdated surfaces are reconfigured in place so the next frame can
    /// proceed; timeouts skip a frame; out-of-memory is fatal.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}
