//! Focus
//!
//! A first-person puzzle game: keep the target in view long enough and
//! reach the goal platform to finish each level.

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use focus::config::AppConfig;
use focus::systems::{HeadlessRenderer, SimulationSystem, WindowSystem};
use focus_game::{GameControl, LevelRegistry};
use focus_input::InputState;

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    input: InputState,
    simulation: SimulationSystem,
    game: GameControl<HeadlessRenderer>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, focus_game::GameError> {
        let registry = LevelRegistry::standard(&config.game.level_dir);
        let mut game = GameControl::new(registry, HeadlessRenderer::new(config.game.fov_degrees))
            .with_level_config(config.to_level_config());
        game.initialize()?;

        let simulation = SimulationSystem::new(
            config.game.fixed_timestep,
            config.game.max_steps_per_frame,
        );

        Ok(Self {
            config,
            window: None,
            input: InputState::new(),
            simulation,
            game,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.simulation.frame_time();
        let snapshot = self.input.snapshot();

        if let Err(e) = self.simulation.run_frame(&mut self.game, &snapshot, dt) {
            log::error!("{}", e);
            event_loop.exit();
            return;
        }
        if self.game.is_stopped() {
            log::info!("Game stopped");
            event_loop.exit();
            return;
        }

        let paused = self.game.is_paused();
        if let Some(window) = &mut self.window {
            window.sync_cursor(paused);
            if self.config.debug.show_title_stats {
                if let Some(level) = self.game.current() {
                    let score = level.logic.runtime().map_or(0.0, |r| r.score().value());
                    window.update_title(level.logic.name(), score, paused);
                }
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match WindowSystem::create(event_loop, &self.config.window) {
            Ok(mut window) => {
                window.sync_cursor(self.game.is_paused());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Focused(false) => {
                self.input.clear();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Focus");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
