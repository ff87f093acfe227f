use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scroll_showcase::app::Showcase;
use scroll_showcase::cli::Cli;
use scroll_showcase::config::ViewerConfig;
use scroll_showcase::core::WinitScrollAdapter;
use scroll_showcase::loaders::{load_cube_map, AssetLoader, CubeMapData};
use scroll_showcase::renderer::Renderer;
use scroll_showcase::ui;

/// Environment colour used when the cube faces can't be loaded
const FALLBACK_ENV_COLOR: [u8; 4] = [128, 128, 128, 255];

struct App {
    config: ViewerConfig,
    showcase: Showcase,
    wheel: WinitScrollAdapter,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    loader: Option<AssetLoader>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            showcase: Showcase::new(&config, config.window_width, config.window_height),
            wheel: WinitScrollAdapter::new(config.line_height),
            config,
            window: None,
            renderer: None,
            loader: None,
        }
    }

    fn load_env_map(&self) -> CubeMapData {
        match load_cube_map(&self.config.env_map) {
            Ok(env_map) => env_map,
            Err(e) => {
                log::warn!("{e:#}; using a plain environment");
                CubeMapData::solid(FALLBACK_ENV_COLOR)
            }
        }
    }

    fn poll_loader(&mut self) {
        let Some(loader) = &mut self.loader else {
            return;
        };
        for event in loader.poll() {
            if let Some(model) = self.showcase.handle_load_event(event) {
                if let Some(renderer) = &mut self.renderer {
                    renderer.upload_model(model);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let show_ui = self.config.show_ui;
        let showcase = &self.showcase;
        let mut actions = Vec::new();

        let result = renderer.render(window, &showcase.frame_inputs(), |ctx| {
            if show_ui {
                actions = ui::draw_menu(ctx, &showcase.controller, &showcase.scene);
            }
        });

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e}"),
        }

        self.showcase.apply_actions(actions);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Scroll Showcase")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let env_map = self.load_env_map();
        let renderer = match pollster::block_on(Renderer::new(window.clone(), &env_map)) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = renderer.size();
        self.showcase.resize(width, height);

        if self.loader.is_none() {
            log::info!("Loading model from {}", self.config.model.display());
            self.loader = Some(AssetLoader::spawn(&self.config.model));
        }

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
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
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.showcase.resize(size.width, size.height);
                }
            }
            WindowEvent::MouseWheel { .. } => {
                self.wheel.process_event(&event);
                let dy = self.wheel.take_scroll();
                self.showcase.scroll_by(dy);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.poll_loader();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ViewerConfig::resolve(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Scroll Showcase - mouse wheel to scroll, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
