//! Ambient Particle Backdrop
//!
//! Drifting particles linked by fading lines. `T` toggles the light/dark
//! theme, `Space` pauses, `Escape` quits. Set `BACKDROP_THEME=light` to start
//! in the light theme.

mod error;
mod stats;

use error::AppError;
use particle_field::{AnimationLoop, Bounds, DeviceClass, FieldConfig, ParticleField, Tick};
use particle_renderer::{Backdrop, FieldRenderer, Theme};
use stats::FrameStats;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const THEME_ENV: &str = "BACKDROP_THEME";

/// Theme from the raw environment value; unknown values fall back to the default
fn theme_from_env_value(value: Option<&str>) -> Theme {
    match value {
        None => Theme::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("{}; using {} theme", e, Theme::default());
            Theme::default()
        }),
    }
}

/// Field bounds are kept in logical pixels so particle sizes match across DPIs
fn logical_bounds(size: PhysicalSize<u32>, scale_factor: f64) -> Bounds {
    let logical = size.to_logical::<f32>(scale_factor);
    Bounds::new(logical.width, logical.height)
}

/// Acquire the frame target, then advance; a failed acquire leaves the
/// animation where it was
fn acquire_then_step<T: Tick, F, E>(
    animation: &mut AnimationLoop<T>,
    acquire: impl FnOnce() -> Result<F, E>,
) -> Result<F, E> {
    let target = acquire()?;
    animation.step();
    Ok(target)
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    renderer: FieldRenderer,
    animation: AnimationLoop<Backdrop>,

    stats: FrameStats,
    scale_factor: f64,
}

impl GpuState {
    async fn new(window: Arc<Window>, theme: Theme) -> Result<Self, AppError> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(AppError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // The device class is decided once, from the startup viewport
        let viewport = logical_bounds(size, scale_factor);
        let bounds = Bounds::new(viewport.width.max(1.0), viewport.height.max(1.0));
        let device_class = DeviceClass::from_viewport_width(bounds.width);
        log::info!(
            "Viewport {:.0}x{:.0} -> {:?} device class",
            bounds.width,
            bounds.height,
            device_class
        );

        let field = ParticleField::new(FieldConfig::for_device_class(device_class), bounds)?;
        let renderer = FieldRenderer::new(&device, surface_format);
        log::info!("✓ Renderer initialized");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            animation: AnimationLoop::new(Backdrop::new(field, theme)),
            stats: FrameStats::new(Instant::now()),
            scale_factor,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            log::debug!("Skipping resize to empty surface");
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        let backdrop = self.animation.component_mut();
        match backdrop.resize(logical_bounds(new_size, self.scale_factor)) {
            Ok(()) => backdrop.redraw(),
            Err(e) => log::warn!("Ignoring resize: {}", e),
        }
    }

    fn set_scale_factor(&mut self, scale_factor: f64, size: PhysicalSize<u32>) {
        self.scale_factor = scale_factor;
        self.resize(size);
    }

    fn toggle_theme(&mut self) {
        let backdrop = self.animation.component_mut();
        backdrop.toggle_theme();
        // Paused loops do not re-record, so refresh the frame now
        backdrop.redraw();
    }

    fn toggle_pause(&mut self) {
        let running = self.animation.toggle();
        log::info!("Animation {}", if running { "resumed" } else { "paused" });
    }

    /// Advance one frame and present it
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = acquire_then_step(&mut self.animation, || {
            self.surface.get_current_texture()
        })?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        self.renderer.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            self.animation.component().frame(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.stats.record(Instant::now());
        Ok(())
    }

    fn title(&self) -> String {
        let backdrop = self.animation.component();
        format!(
            "Particle Backdrop - {:.0} FPS ({:.2}ms) - {} particles - {}{}",
            self.stats.fps(),
            self.stats.average_frame_time(),
            backdrop.field().len(),
            backdrop.theme(),
            if self.animation.is_running() { "" } else { " - paused" }
        )
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    theme: Theme,
    startup_error: Option<AppError>,
}

impl App {
    fn new(theme: Theme) -> Self {
        Self {
            window: None,
            gpu_state: None,
            theme,
            startup_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Particle Backdrop")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.theme))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::KeyT => gpu_state.toggle_theme(),
                KeyCode::Space => gpu_state.toggle_pause(),
                _ => {}
            },

            WindowEvent::Resized(physical_size) => gpu_state.resize(physical_size),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                gpu_state.set_scale_factor(scale_factor, window.inner_size())
            }

            WindowEvent::RedrawRequested => match gpu_state.render() {
                Ok(()) => window.set_title(&gpu_state.title()),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.resize(window.inner_size())
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            },

            _ => {}
        }

        window.request_redraw();
    }
}

fn run() -> Result<(), AppError> {
    let theme = theme_from_env_value(std::env::var(THEME_ENV).ok().as_deref());
    log::info!("Starting particle backdrop ({} theme)...", theme);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(theme);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use particle_field::Particle;

    #[test]
    fn test_theme_from_env_value() {
        assert_eq!(theme_from_env_value(None), Theme::Dark);
        assert_eq!(theme_from_env_value(Some("light")), Theme::Light);
        assert_eq!(theme_from_env_value(Some("Dark")), Theme::Dark);
        assert_eq!(theme_from_env_value(Some("neon")), Theme::Dark);
    }

    #[test]
    fn test_failed_acquire_does_not_advance() {
        let particle = Particle::new(Vec2::new(10.0, 10.0), Vec2::new(0.25, 0.0), 1.0);
        let field =
            ParticleField::from_particles(FieldConfig::default(), Bounds::new(100.0, 100.0), vec![particle])
                .unwrap();
        let mut animation = AnimationLoop::new(Backdrop::new(field, Theme::Dark));

        let result: Result<(), wgpu::SurfaceError> =
            acquire_then_step(&mut animation, || Err(wgpu::SurfaceError::Outdated));
        assert_eq!(result, Err(wgpu::SurfaceError::Outdated));
        assert_eq!(animation.frames(), 0);
        assert_eq!(
            animation.component().field().particles()[0].position,
            Vec2::new(10.0, 10.0)
        );

        let result: Result<u32, wgpu::SurfaceError> = acquire_then_step(&mut animation, || Ok(7));
        assert_eq!(result, Ok(7));
        assert_eq!(animation.frames(), 1);
        assert_eq!(
            animation.component().field().particles()[0].position,
            Vec2::new(10.25, 10.0)
        );
    }

    #[test]
    fn test_logical_bounds_scale() {
        let bounds = logical_bounds(PhysicalSize::new(2560, 1600), 2.0);
        assert_eq!(bounds, Bounds::new(1280.0, 800.0));
        assert_eq!(
            DeviceClass::from_viewport_width(bounds.width),
            DeviceClass::Full
        );

        let phone = logical_bounds(PhysicalSize::new(1170, 2532), 3.0);
        assert_eq!(phone, Bounds::new(390.0, 844.0));
        assert_eq!(
            DeviceClass::from_viewport_width(phone.width),
            DeviceClass::Constrained
        );
    }
}
