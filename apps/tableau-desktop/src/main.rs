use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tableau_common::Preset;
use tableau_input::{Key, KeyInput, KeyState};
use tableau_render::Renderer;
use tableau_render_wgpu::{FramePlanner, WgpuRenderer};
use tableau_stage::{Stage, StageConfig};
use tableau_tools::SceneInspector;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tableau-desktop", about = "Interactive mesh scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model directory, overrides the configured asset root
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Preset to show at startup
    #[arg(long)]
    preset: Option<Preset>,

    /// Seed for the army's pose picks
    #[arg(long)]
    seed: Option<u64>,
}

/// Translate a physical key to the stage's key set.
fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit2,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Digit3,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Digit4,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::Equals,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn key_input(event: &KeyEvent) -> Option<KeyInput> {
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    Some(KeyInput {
        key: map_key_code(code),
        state: match event.state {
            ElementState::Pressed => KeyState::Pressed,
            ElementState::Released => KeyState::Released,
        },
        repeat: event.repeat,
    })
}

/// Application state independent of the GPU.
struct AppState {
    stage: Stage,
    show_hud: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            show_hud: true,
            last_frame: Instant::now(),
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = SceneInspector::summary(self.stage.scene(), self.stage.camera());
        let mut requested = None;

        egui::SidePanel::left("hud")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Tableau");
                ui.separator();
                let preset = self
                    .stage
                    .preset()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "none".into());
                ui.label(format!("Preset: {preset}"));
                ui.label(format!(
                    "Objects: {}  Meshes: {}  Lights: {}",
                    summary.object_count, summary.mesh_count, summary.light_count
                ));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    summary.camera_position[0],
                    summary.camera_position[1],
                    summary.camera_position[2]
                ));
                ui.label(format!("Aspect: {:.3}", summary.camera_aspect));

                if let Some(info) = self
                    .stage
                    .current_object()
                    .and_then(|id| SceneInspector::inspect_object(self.stage.scene(), id))
                {
                    ui.separator();
                    ui.heading("Current object");
                    ui.label(format!("{} {}", info.id, info.meshes.join(", ")));
                    ui.label(format!("Scale: {:.2}", info.scale[0]));
                }

                ui.separator();
                ui.heading("Presets");
                for preset in Preset::ALL {
                    if ui.button(preset.name()).clicked() {
                        requested = Some(preset);
                    }
                }

                ui.separator();
                ui.small("1-4: Presets | Arrows: Rotate | WASD/Space/Ctrl: Camera");
                ui.small("+/-: Scale | F1: Toggle HUD | Esc: Quit");
            });

        if let Some(preset) = requested {
            if let Err(e) = self.stage.apply_preset(preset) {
                tracing::warn!("preset {preset} unavailable: {e}");
            }
        }
    }
}

/// Window and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, size: (u32, u32)) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Tableau")
            .with_inner_size(PhysicalSize::new(size.0, size.1));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tableau_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw_hud(
        &mut self,
        egui_ctx: &EguiContext,
        state: &mut AppState,
        view: &wgpu::TextureView,
    ) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(stage: Stage) -> Self {
        Self {
            state: AppState::new(stage),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f64().min(0.1);
        self.state.last_frame = now;
        self.state.stage.tick(dt);

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        let stage = &self.state.stage;
        let frame = FramePlanner.render(stage.scene(), stage.camera());
        gpu.renderer
            .draw(&gpu.device, &gpu.queue, &view, stage.scene(), &frame);

        gpu.draw_hud(&self.egui_ctx, &mut self.state, &view);

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx, self.state.stage.window_size()) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state
                    .stage
                    .handle_window_resize(size.width as f32, size.height as f32);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
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
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.state
                    .stage
                    .handle_window_resize(new_size.width as f32, new_size.height as f32);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::F1)
                    && event.state == ElementState::Pressed
                    && !event.repeat
                {
                    self.state.show_hud = !self.state.show_hud;
                    return;
                }
                if let Some(input) = key_input(&event) {
                    self.state.stage.handle_input(input);
                }
                if self.state.stage.exit_requested() {
                    event_loop.exit();
                }
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

fn load_config(cli: &Cli) -> Result<StageConfig> {
    let mut config = match &cli.config {
        Some(path) => StageConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StageConfig::default(),
    };
    if let Some(assets) = &cli.assets {
        config.asset_root = assets.clone();
    }
    if let Some(preset) = cli.preset {
        config.startup_preset = preset;
    }
    if let Some(seed) = cli.seed {
        config.army_seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("tableau-desktop starting");

    let config = load_config(&cli)?;
    let mut stage = Stage::from_config(config);
    stage.setup_camera();
    if let Err(e) = stage.setup_scene() {
        // The viewer stays up with an empty scene; number keys can still
        // switch to a preset whose models exist.
        tracing::warn!("startup preset unavailable: {e}");
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(stage);
    event_loop.run_app(&mut app)?;

    Ok(())
}
