use anyhow::{anyhow, Context};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use maze_viewer::cli::Cli;
use maze_viewer::core::{Clock, TickScheduler, Viewport};
use maze_viewer::renderer::MazeRenderer;
use maze_viewer::AppContext;

const WINDOW_TITLE: &str = "Maze Viewer";

// === Application ===

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<MazeRenderer>,
    context: AppContext<wgpu::Buffer>,
    clock: Clock,
    scheduler: TickScheduler,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli) -> Self {
        let scheduler = TickScheduler::from_millis(cli.tick_ms);
        Self {
            cli,
            window: None,
            renderer: None,
            context: AppContext::new(),
            clock: Clock::new(),
            scheduler,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        eprintln!("Error: {:#}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let renderer = pollster::block_on(MazeRenderer::new(window.clone(), !self.cli.no_ui))
            .map_err(|e| anyhow!("Failed to initialize renderer: {e}"))?;

        self.context.load_world(&self.cli.world);
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput { .. } => self.context.controller.process_event(&event),
            WindowEvent::Focused(false) => self.context.controller.release_all(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(Viewport::from(*size));
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    renderer.set_status(self.context.load_status());
                    let viewport = Viewport::from(window.inner_size());
                    if let Err(e) = self.context.render(renderer, viewport) {
                        log::error!("Render error: {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let now = Instant::now();
        if self.scheduler.poll(now) {
            self.context.tick(self.clock.millis_at(now), renderer);
            window.request_redraw();
        }

        if let Some(deadline) = self.scheduler.next_deadline() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);

    println!("Maze Viewer - Controls: arrows/WASD to walk and turn, Page Up/Down to look, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
