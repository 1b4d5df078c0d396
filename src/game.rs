use std::time::{Duration, Instant};

use glam::Vec2;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::camera::{CameraParams, CameraRig, ViewMode};
use crate::config::GameConfig;
use crate::input::{InputCommand, InputState, KeyAction, KeyCode, MouseButton};
use crate::physics::{self, MatchOutcome};
use crate::player::Player;

/// What the host loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Everything one match needs: board, player, camera and input.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub player: Player,
    pub input: InputState,
    pub rig: CameraRig,
    view: ViewMode,
    step: f32,
    boosted_step: f32,
    outcome: Option<MatchOutcome>,
    ticks: u64,
    seed: u64,
}

impl GameState {
    /// Generates a fresh board from the configured (or a random) seed.
    pub fn new(config: &GameConfig) -> Self {
        let seed = config.resolve_seed();
        info!("board seed {seed}");
        let board = if config.plain_board {
            Board::plain()
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            Board::generate(&config.excluded_tiles, &mut rng)
        };
        let mut state = Self::with_board(board, config);
        state.seed = seed;
        state
    }

    pub fn with_board(board: Board, config: &GameConfig) -> Self {
        Self {
            board,
            player: Player::default(),
            input: InputState::new(),
            rig: CameraRig::new(config.window_width, config.window_height),
            view: ViewMode::default(),
            step: config.base_step,
            boosted_step: config.boosted_step,
            outcome: None,
            ticks: 0,
            seed: 0,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if view != self.view {
            info!("view {:?} -> {view:?}", self.view);
        }
        self.view = view;
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn on_key_event(&mut self, key: KeyCode, action: KeyAction) -> Control {
        let command = self.input.on_key_event(key, action);
        self.apply(command)
    }

    pub fn on_character(&mut self, ch: char) -> Control {
        let command = self.input.on_character(ch);
        self.apply(command)
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, action: KeyAction) {
        self.input.on_mouse_button(button, action);
    }

    pub fn on_scroll(&mut self, delta_y: f64) {
        self.input.on_scroll(delta_y);
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) {
        self.input.set_cursor(position);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.rig.resize(width, height);
    }

    fn apply(&mut self, command: Option<InputCommand>) -> Control {
        match command {
            Some(InputCommand::SelectView(view)) => self.set_view(view),
            Some(InputCommand::BoostStep) => {
                if self.step != self.boosted_step {
                    debug!("step {} -> {}", self.step, self.boosted_step);
                }
                self.step = self.boosted_step;
            }
            Some(InputCommand::Quit) => return Control::Quit,
            None => {}
        }
        Control::Continue
    }

    /// Runs one gameplay update. Once the match is decided this does nothing
    /// and keeps reporting the same outcome.
    pub fn tick(&mut self) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.ticks += 1;
        let intent = self.input.intent();
        self.outcome = physics::resolve_tick(&mut self.board, &mut self.player, &intent, self.step);
        if self.view == ViewMode::FreeZoom {
            self.rig.steer(intent.look);
        }
        self.input.end_tick();
        if let Some(outcome) = self.outcome {
            info!("match over after {} ticks: {outcome:?}", self.ticks);
        }
        self.outcome
    }

    /// Camera for the current view, player position and free-camera input.
    pub fn camera(&self) -> CameraParams {
        self.rig.camera(
            self.view,
            self.player.position,
            self.input.cursor(),
            self.input.zoom(),
        )
    }
}

/// Frame-skip throttle: opens at most once per call when the interval has
/// elapsed and never catches up on missed intervals.
#[derive(Debug, Clone)]
pub struct TickGate {
    interval: Duration,
    last: Instant,
}

impl TickGate {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.interval {
            return false;
        }
        self.last = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{TileId, TileKind};
    use crate::camera::BASE_BOUNDS;
    use crate::input::NamedKey;

    fn state() -> GameState {
        GameState::new(&GameConfig::with_seed(11))
    }

    #[test]
    fn same_seed_same_board() {
        assert_eq!(state().board, state().board);
        assert_eq!(state().seed(), 11);
    }

    #[test]
    fn plain_board_config_skips_generation() {
        let config = GameConfig {
            plain_board: true,
            ..GameConfig::with_seed(11)
        };
        let game = GameState::new(&config);
        assert_eq!(game.board, Board::plain());
        assert_eq!(game.seed(), 11);
    }

    #[test]
    fn excluded_tiles_stay_plain_in_generated_state() {
        let game = state();
        for id in [TileId(13), TileId(151)] {
            assert_eq!(game.board.get(id).map(|tile| tile.kind()), Some(TileKind::Plain));
        }
    }

    #[test]
    fn switching_to_free_zoom_without_scroll_keeps_base_bounds() {
        let mut game = GameState::with_board(Board::plain(), &GameConfig::default());
        game.on_key_event(KeyCode::Digit(3), KeyAction::Release);
        assert_eq!(game.view(), ViewMode::Isometric);
        game.on_key_event(KeyCode::Digit(5), KeyAction::Release);
        assert_eq!(game.view(), ViewMode::FreeZoom);
        game.tick();
        assert_eq!(game.input.zoom(), 1.0);
        assert_eq!(game.camera().projection, BASE_BOUNDS.projection());
    }

    #[test]
    fn boost_switches_to_fixed_step() {
        let mut game = GameState::with_board(Board::plain(), &GameConfig::default());
        assert_eq!(game.step(), 0.1);
        game.on_key_event(KeyCode::Character('F'), KeyAction::Release);
        assert_eq!(game.step(), 0.2);
        game.on_key_event(KeyCode::Character('S'), KeyAction::Release);
        assert_eq!(game.step(), 0.2);
    }

    #[test]
    fn holding_right_walks_east() {
        let mut game = GameState::with_board(Board::plain(), &GameConfig::default());
        let start = game.player.position;
        game.on_key_event(KeyCode::Named(NamedKey::Right), KeyAction::Press);
        for _ in 0..5 {
            game.tick();
        }
        game.on_key_event(KeyCode::Named(NamedKey::Right), KeyAction::Release);
        game.tick();
        assert!((game.player.position.x - (start.x + 0.5)).abs() < 1e-4);
        assert_eq!(game.ticks(), 6);
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut game = state();
        assert_eq!(game.on_character('q'), Control::Quit);
        assert_eq!(
            game.on_key_event(KeyCode::Named(NamedKey::Up), KeyAction::Press),
            Control::Continue
        );
    }

    #[test]
    fn ticks_after_outcome_are_no_ops() {
        let mut game = GameState::with_board(Board::plain(), &GameConfig::default());
        game.player.position = glam::Vec3::new(6.0, 2.0, -7.0);
        assert_eq!(game.tick(), Some(MatchOutcome::Win));
        let ticks = game.ticks();
        assert_eq!(game.tick(), Some(MatchOutcome::Win));
        assert_eq!(game.ticks(), ticks);
    }

    #[test]
    fn free_look_only_steers_in_free_zoom() {
        let mut game = GameState::with_board(Board::plain(), &GameConfig::default());
        game.on_key_event(KeyCode::Character('W'), KeyAction::Press);
        game.tick();
        assert_eq!(game.rig.angle_xz, 90.0);
        game.on_key_event(KeyCode::Digit(5), KeyAction::Release);
        game.tick();
        assert_eq!(game.rig.angle_xz, 91.0);
    }

    #[test]
    fn gate_opens_once_per_interval_without_catch_up() {
        let start = Instant::now();
        let interval = Duration::from_millis(65);
        let mut gate = TickGate::new(interval, start);
        assert!(!gate.ready(start + Duration::from_millis(10)));
        assert!(gate.ready(start + Duration::from_millis(300)));
        assert!(!gate.ready(start + Duration::from_millis(310)));
        assert!(gate.ready(start + Duration::from_millis(365)));
    }
}
