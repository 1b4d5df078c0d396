use std::any::Any;
use std::env;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::info;
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{
    ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use pit_maze::app::{exit_code, outcome_banner, print_final_state, run_headless};
use pit_maze::script::{parse_script, ScriptCommand};
use pit_maze::{
    build_draw_list, Control, GameConfig, GameState, KeyAction, KeyCode, MouseButton, NamedKey,
    Renderer, TickGate,
};

const USAGE: &str = "Usage: pit-maze [--seed <u64>] [--plain] [--headless] [--script <path>] \
                     [--ticks <n>] [--width <px>] [--height <px>]";
const DEFAULT_IDLE_TICKS: u32 = 100;

fn main() {
    env_logger::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let options = CliOptions::parse(env::args().skip(1))?;
    let config = options.config();
    let script = match &options.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {path}"))?;
            Some(parse_script(&source).with_context(|| format!("invalid script {path}"))?)
        }
        None => None,
    };

    if options.headless || script.is_some() {
        return Ok(headless(&config, script.as_deref(), options.ticks));
    }

    match run_interactive(&config) {
        Ok(code) => Ok(code),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --headless mode (set DISPLAY or install X11 libs to enable rendering)."
                );
                Ok(headless(&config, None, options.ticks))
            } else {
                Err(err)
            }
        }
    }
}

fn headless(config: &GameConfig, script: Option<&[ScriptCommand]>, ticks: Option<u32>) -> i32 {
    let (state, quit) = run_headless(config, script, ticks.unwrap_or(DEFAULT_IDLE_TICKS));
    print_final_state(&state, quit);
    exit_code(state.outcome())
}

fn run_interactive(config: &GameConfig) -> Result<i32> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GameApp {
        state: GameState::new(config),
        gate: TickGate::new(config.tick_interval, Instant::now()),
        size: LogicalSize::new(config.window_width, config.window_height),
        renderer: None,
        quit: false,
        last_error: None,
    };
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.last_error {
        return Err(err);
    }
    print_final_state(&app.state, app.quit);
    Ok(exit_code(app.state.outcome()))
}

struct GameApp {
    state: GameState,
    gate: TickGate,
    size: LogicalSize<u32>,
    renderer: Option<Renderer>,
    quit: bool,
    last_error: Option<anyhow::Error>,
}

impl GameApp {
    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
        let attrs = Window::default_attributes()
            .with_title("Pit Maze")
            .with_inner_size(self.size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );
        let size = window.inner_size();
        let renderer = block_on(Renderer::new(window))?;
        info!("window ready at {}x{}", size.width, size.height);
        Ok(renderer)
    }

    fn handle_keyboard(&mut self, event: &KeyEvent) -> Control {
        if event.repeat {
            return Control::Continue;
        }
        let action = match event.state {
            ElementState::Pressed => KeyAction::Press,
            ElementState::Released => KeyAction::Release,
        };
        if let PhysicalKey::Code(code) = event.physical_key {
            if let Some(key) = map_keycode(code) {
                if self.state.on_key_event(key, action) == Control::Quit {
                    return Control::Quit;
                }
            }
        }
        if action == KeyAction::Press {
            if let Some(text) = event.text.as_ref() {
                for ch in text.chars() {
                    if self.state.on_character(ch) == Control::Quit {
                        return Control::Quit;
                    }
                }
            }
        }
        Control::Continue
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        if self.gate.ready(Instant::now()) {
            if let Some(outcome) = self.state.tick() {
                println!("{}", outcome_banner(outcome));
                event_loop.exit();
            }
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let camera = self.state.camera();
        let items = build_draw_list(&self.state);
        match renderer.render(&camera, &items) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(err) => {
                info!("surface error ({err}); retrying next frame");
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for GameApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                let size = renderer.window().inner_size();
                self.state.resize(size.width, size.height);
                self.renderer = Some(renderer);
            }
            Err(err) => {
                self.last_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.renderer.as_ref().map(Renderer::window_id) != Some(window_id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.quit = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.state.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if self.handle_keyboard(&event) == Control::Quit {
                    self.quit = true;
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let action = match state {
                    ElementState::Pressed => KeyAction::Press,
                    ElementState::Released => KeyAction::Release,
                };
                self.state.on_mouse_button(map_mouse_button(button), action);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y,
                };
                self.state.on_scroll(delta_y);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(event_loop) {
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

fn map_keycode(code: WinitKeyCode) -> Option<KeyCode> {
    use WinitKeyCode as Key;
    Some(match code {
        Key::Space => KeyCode::Named(NamedKey::Space),
        Key::ArrowLeft => KeyCode::Named(NamedKey::Left),
        Key::ArrowRight => KeyCode::Named(NamedKey::Right),
        Key::ArrowUp => KeyCode::Named(NamedKey::Up),
        Key::ArrowDown => KeyCode::Named(NamedKey::Down),
        Key::Escape => KeyCode::Named(NamedKey::Escape),
        Key::Digit0 => KeyCode::Digit(0),
        Key::Digit1 => KeyCode::Digit(1),
        Key::Digit2 => KeyCode::Digit(2),
        Key::Digit3 => KeyCode::Digit(3),
        Key::Digit4 => KeyCode::Digit(4),
        Key::Digit5 => KeyCode::Digit(5),
        Key::Digit6 => KeyCode::Digit(6),
        Key::Digit7 => KeyCode::Digit(7),
        Key::Digit8 => KeyCode::Digit(8),
        Key::Digit9 => KeyCode::Digit(9),
        Key::KeyA => KeyCode::Character('A'),
        Key::KeyD => KeyCode::Character('D'),
        Key::KeyE => KeyCode::Character('E'),
        Key::KeyF => KeyCode::Character('F'),
        Key::KeyQ => KeyCode::Character('Q'),
        Key::KeyS => KeyCode::Character('S'),
        Key::KeyW => KeyCode::Character('W'),
        _ => return None,
    })
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    let index = match button {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Right => 1,
        WinitMouseButton::Middle => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(value) => value.min(u8::MAX as u16) as u8,
    };
    MouseButton::new(index)
}

#[derive(Debug, Default)]
struct CliOptions {
    seed: Option<u64>,
    plain: bool,
    headless: bool,
    script: Option<String>,
    ticks: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

impl CliOptions {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => options.seed = Some(parse_value(&arg, args.next())?),
                "--plain" => options.plain = true,
                "--headless" => options.headless = true,
                "--script" => {
                    options.script = Some(
                        args.next()
                            .ok_or_else(|| anyhow!("--script expects a path\n{USAGE}"))?,
                    )
                }
                "--ticks" => options.ticks = Some(parse_value(&arg, args.next())?),
                "--width" => options.width = Some(parse_value(&arg, args.next())?),
                "--height" => options.height = Some(parse_value(&arg, args.next())?),
                other => return Err(anyhow!("Unknown argument: {other}\n{USAGE}")),
            }
        }
        Ok(options)
    }

    fn config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        GameConfig {
            seed: self.seed,
            plain_board: self.plain,
            window_width: self.width.unwrap_or(defaults.window_width).max(1),
            window_height: self.height.unwrap_or(defaults.window_height).max(1),
            ..defaults
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value.ok_or_else(|| anyhow!("{flag} expects a value\n{USAGE}"))?;
    value
        .parse()
        .map_err(|_| anyhow!("invalid value for {flag}: {value}\n{USAGE}"))
}
