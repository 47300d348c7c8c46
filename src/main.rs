mod canvas;
mod cli;
mod color;
mod effect;
mod framepace;
mod gpu;
mod gui;
mod particle;
mod registry;
mod render;
mod simulation;
mod surface;

#[cfg(feature = "capture")]
mod capture;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use canvas::Canvas;
use clap::Parser;
use framepace::Framepacer;
use glam::Vec2;
use gpu::GpuContext;
use gui::EguiIntegration;
use log::{debug, info, warn};
use render::RenderModule;
use simulation::{Cursor, InputEvent, Simulation, TickStats};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

const STATS_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = cli::Args::parse();
    let effect = args.effect();
    info!("Running the {:?} effect", args.variant);
    debug!("{effect:?}");

    let framepace = Framepacer::new(args.framerate);

    #[cfg(feature = "capture")]
    let capture = match (&args.capture, args.framerate.filter(|&f| f > 0)) {
        (Some(path), Some(_)) => Some(capture::CaptureModule::create(path)?),
        (Some(_), None) => {
            warn!("Capture can't run without a fixed framerate, ignoring `--capture`.");
            None
        }
        (None, _) => None,
    };

    // Captured frames advance by exactly one frame of the fixed framerate
    #[cfg(feature = "capture")]
    let fixed_dt = capture
        .as_ref()
        .and(args.framerate)
        .map(|framerate| framepace::fixed_ticks(framerate, args.time_scale));
    #[cfg(not(feature = "capture"))]
    let fixed_dt = None;

    // Setup Winit
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // State
    let mut app_state = AppState {
        tokio_rt: tokio::runtime::Runtime::new()?,
        gfx: None,
        canvas: Canvas::new(0, 0),
        sim: Simulation::new(effect, args.seed),
        framepace,
        #[cfg(feature = "capture")]
        capture,

        cursor: Cursor::default(),
        overlay: args.overlay,
        time_scale: args.time_scale,
        fixed_dt,

        stats: TickStats::default(),
        last_report: Instant::now(),
        error: None,
    };

    event_loop.run_app(&mut app_state)?;
    app_state.error.map_or(Ok(()), Err)
}

struct GfxState {
    window: Arc<Window>,
    gpu: GpuContext,
    render_module: RenderModule,
    egui: Option<EguiIntegration>,
}

struct AppState {
    tokio_rt: tokio::runtime::Runtime,
    gfx: Option<GfxState>,
    canvas: Canvas,
    sim: Simulation,
    framepace: Framepacer,
    #[cfg(feature = "capture")]
    capture: Option<capture::CaptureModule>,

    cursor: Cursor,
    overlay: bool,
    time_scale: f32,
    fixed_dt: Option<f32>,

    stats: TickStats,
    last_report: Instant,
    /// Startup failure to report once the event loop has exited
    error: Option<anyhow::Error>,
}

impl AppState {
    fn create_gfx(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<GfxState> {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Particle Trails"))
                .context("Failed to create window")?,
        );
        let window_size = window.inner_size();

        let gpu = self.tokio_rt.block_on(GpuContext::new(window.clone()))?;
        let render_module = RenderModule::new(
            &gpu.device,
            gpu.surface_format(),
            window_size.width,
            window_size.height,
        );
        let egui = self.overlay.then(|| {
            let mut egui = EguiIntegration::new(&gpu.device, gpu.surface_format());
            egui.resize(window_size.width, window_size.height);
            egui
        });

        self.sim.handle_input(
            InputEvent::Resize {
                width: window_size.width,
                height: window_size.height,
            },
            &mut self.canvas,
            true,
        );

        Ok(GfxState {
            window,
            gpu,
            render_module,
            egui,
        })
    }

    /// Pointer input reaches the overlay first and spawns nothing while over it
    fn pointer_input(&mut self, event: InputEvent) {
        let spawn = match self.gfx.as_mut().and_then(|gfx| gfx.egui.as_mut()) {
            Some(egui) => {
                let over_overlay = egui.wants_pointer();
                egui.input(event);
                !over_overlay
            }
            None => true,
        };

        self.sim.handle_input(event, &mut self.canvas, spawn);
    }

    fn report_stats(&mut self) {
        if self.last_report.elapsed() < STATS_INTERVAL {
            return;
        }

        debug!(
            "{:.1} FPS, {} particles, {} links, hue {:.0}",
            self.framepace.framerate(),
            self.stats.particles,
            self.stats.links,
            self.sim.hue
        );
        self.last_report = Instant::now();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        match self.create_gfx(event_loop) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(err) => {
                self.error = Some(err);
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
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed, stopping");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                debug!("Resized to {}x{}", new_size.width, new_size.height);

                gfx.gpu.resize(new_size.width, new_size.height);
                gfx.render_module
                    .resize(&gfx.gpu.device, new_size.width, new_size.height);

                let resize = InputEvent::Resize {
                    width: new_size.width,
                    height: new_size.height,
                };
                if let Some(egui) = gfx.egui.as_mut() {
                    egui.input(resize);
                }
                self.sim.handle_input(resize, &mut self.canvas, true);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match (state, self.cursor.position()) {
                (ElementState::Pressed, _) => {
                    if let Some(press) = self.cursor.pressed() {
                        self.pointer_input(press);
                    }
                }
                (ElementState::Released, Some(position)) => {
                    if let Some(egui) = gfx.egui.as_mut() {
                        egui.pointer_released(position);
                    }
                }
                (ElementState::Released, None) => (),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let moved = self
                    .cursor
                    .moved(Vec2::new(position.x as f32, position.y as f32));
                self.pointer_input(moved);
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        self.framepace.begin_frame();
        let dt = self
            .fixed_dt
            .unwrap_or_else(|| self.framepace.delta_ticks(self.time_scale));
        self.stats = self.sim.tick(&mut self.canvas, dt);

        #[cfg(feature = "capture")]
        if let Some(capture) = self.capture.as_mut() {
            if let Err(err) = capture.write_frame(&self.canvas) {
                warn!("Stopping capture after {} frames: {err:#}", capture.frames());
                self.capture = None;
            }
        }

        gfx.render_module.upload(&gfx.gpu.queue, &self.canvas);

        let frame = match gfx.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                gfx.gpu.reconfigure_surface();
                self.framepace.end_frame();
                return;
            }
            Err(err) => {
                warn!("Skipping frame: {err}");
                self.framepace.end_frame();
                return;
            }
        };
        let mut encoder = gfx
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        if let Some(egui) = gfx.egui.as_mut() {
            egui.run(|ctx| {
                egui::Window::new("Effect")
                    .default_width(145.0)
                    .show(ctx, |ui| {
                        ui.label(format!("FPS {:.1}", self.framepace.framerate()));
                        ui.separator();
                        ui.label(format!("Particles {}", self.stats.particles));
                        ui.label(format!("Links {}", self.stats.links));
                        ui.label(format!("Evicted {}", self.stats.evicted));
                        ui.label(format!("Hue {:.0}", self.sim.hue));
                    });
            });

            egui.pre_render(
                &gfx.gpu.device,
                &gfx.gpu.queue,
                &mut encoder,
                self.framepace.frametime(),
            );
        }

        // Render
        {
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());

            let mut rpass = gfx.render_module.begin_pass(&mut encoder, &view);
            if let Some(egui) = gfx.egui.as_mut() {
                egui.render(&mut rpass);
            }
        }

        gfx.gpu.queue.submit(Some(encoder.finish()));
        gfx.window.pre_present_notify();
        frame.present();

        self.report_stats();
        self.framepace.end_frame();
    }
}
