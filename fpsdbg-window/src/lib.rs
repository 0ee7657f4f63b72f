/// Windowed renderer for the fpsdbg demo
use std::sync::Arc;
use std::time::Instant;

use fpsdbg_core::{stl, Mesh, World};
use nalgebra::{Point3, Vector3};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowBuilder};

pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod renderer;
pub mod shaders;
pub mod vertex;

pub use config::Cli;
pub use context::Context;
pub use error::AppError;
pub use renderer::{GpuMesh, Renderer};

const WINDOW_TITLE: &str = "fpsdbg";

/// Open the window and run until it is closed or a fatal error occurs.
pub fn run(cli: &Cli) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let app = App::new(cli, &event_loop)?;
    app.run(event_loop)
}

/// The mesh named on the command line, or the unit cube centered on the origin.
pub fn load_mesh(cli: &Cli) -> Result<Mesh, AppError> {
    match &cli.mesh {
        Some(path) => Ok(stl::read_stl(path)?),
        None => Ok(Mesh::cuboid(
            Point3::new(-0.5, -0.5, -0.5),
            Vector3::new(1.0, 1.0, 1.0),
        )),
    }
}

/// Main application struct for the demo window
pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    world: World<GpuMesh>,
    context: Context,
    started: Instant,
}

impl App {
    pub fn new(cli: &Cli, event_loop: &EventLoop<()>) -> Result<Self, AppError> {
        let monitor = event_loop.primary_monitor().map(|monitor| {
            let size = monitor.size();
            (size.width, size.height)
        });
        let (width, height) = cli.window_size(monitor)?;

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(WINDOW_TITLE)
                .with_inner_size(PhysicalSize::new(width, height))
                .build(event_loop)?,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(AppError::NoAdapter)?;

        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("fpsdbg_device"),
                required_features,
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        tracing::info!(
            backend = ?adapter.get_info().backend,
            adapter = %adapter.get_info().name,
            wireframe_supported,
            "GPU initialized"
        );

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(AppError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(AppError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        tracing::info!(width = config.width, height = config.height, ?format, "window created");

        let sample_count = renderer::supported_sample_count(&adapter, format, cli.samples);
        let shaders = shaders::ShaderPair::load(&cli.shader_dir)?;
        let renderer = Renderer::new(
            &device,
            format,
            (config.width, config.height),
            sample_count,
            &shaders,
            wireframe_supported,
        )?;

        let mesh = load_mesh(cli)?;
        let mut world = World::with_capacity(1);
        world.push(renderer.upload(&device, &mesh));

        Ok(Self {
            window,
            surface,
            device,
            queue,
            context: Context::new(config.width, config.height, wireframe_supported),
            config,
            renderer,
            world,
            started: Instant::now(),
        })
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<(), AppError> {
        let mut fatal = None;

        event_loop.run(|event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                if let Err(e) = self.handle_window_event(event) {
                    tracing::error!("{e}");
                    fatal = Some(e);
                    elwt.exit();
                }
                if self.context.is_closing() {
                    elwt.exit();
                }
            }
            Event::AboutToWait => self.window.request_redraw(),
            _ => {}
        })?;

        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent) -> Result<(), AppError> {
        match event {
            WindowEvent::CloseRequested => self.context.apply(input::Action::Close),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(action) = input::action_for_key(code) {
                    self.context.apply(action);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(action) = input::action_for_scroll(delta) {
                    self.context.apply(action);
                }
            }
            WindowEvent::RedrawRequested => self.render()?,
            _ => {}
        }
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        // Minimized windows report a zero size; keep the last configuration.
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.renderer.resize(&self.device, size.width, size.height);
        self.context.resize(size.width, size.height);
        tracing::debug!(width = size.width, height = size.height, "resized");
    }

    fn render(&mut self) -> Result<(), AppError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("timed out waiting for surface texture");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let angle = self.started.elapsed().as_secs_f32();

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &self.world,
            &self.context,
            angle,
        );
        frame.present();
        Ok(())
    }
}
