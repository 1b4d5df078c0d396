use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::camera::ViewMode;

const ZOOM_IN: f32 = 1.1;
const ZOOM_OUT: f32 = 0.9;

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
    Digit(u8),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        if ch.is_ascii_alphabetic() {
            return Some(Self::Character(ch.to_ascii_uppercase()));
        }
        if ch.is_ascii_digit() {
            return Some(Self::Digit(ch as u8 - b'0'));
        }
        None
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" => Space,
        "Left" => Left,
        "Right" => Right,
        "Up" => Up,
        "Down" => Down,
        "Escape" | "Esc" => Escape,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

/// Friendly names for the non-character keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Left,
    Right,
    Up,
    Down,
    Escape,
}

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);
    pub const RIGHT: Self = Self(1);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Press,
    Release,
}

/// Discrete requests raised by key events that the game loop acts on at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    SelectView(ViewMode),
    BoostStep,
    Quit,
}

/// Held look keys for the free camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Snapshot of the player's intent for one gameplay tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub look: LookIntent,
    pub jump: bool,
}

/// Edge-triggered input state: presses set flags, releases clear them.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    north: bool,
    south: bool,
    east: bool,
    west: bool,
    look: LookIntent,
    jump_armed: bool,
    zoom: f32,
    scrolled: bool,
    cursor: Vec2,
    spin_direction: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            north: false,
            south: false,
            east: false,
            west: false,
            look: LookIntent::default(),
            jump_armed: false,
            zoom: 1.0,
            scrolled: false,
            cursor: Vec2::ZERO,
            spin_direction: 1.0,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_event(&mut self, key: KeyCode, action: KeyAction) -> Option<InputCommand> {
        let pressed = action == KeyAction::Press;
        match key {
            KeyCode::Named(NamedKey::Up) => self.north = pressed,
            KeyCode::Named(NamedKey::Down) => self.south = pressed,
            KeyCode::Named(NamedKey::Left) => self.west = pressed,
            KeyCode::Named(NamedKey::Right) => self.east = pressed,
            KeyCode::Character('W') => self.look.left = pressed,
            KeyCode::Character('E') => self.look.right = pressed,
            KeyCode::Character('D') => self.look.down = pressed,
            KeyCode::Character('A') => self.look.up = pressed,
            KeyCode::Named(NamedKey::Escape) if pressed => return Some(InputCommand::Quit),
            KeyCode::Named(NamedKey::Space) if !pressed => {
                debug!("jump armed");
                self.jump_armed = true;
            }
            KeyCode::Character('F' | 'S') if !pressed => return Some(InputCommand::BoostStep),
            KeyCode::Digit(digit) if !pressed => {
                return ViewMode::from_digit(digit).map(InputCommand::SelectView);
            }
            _ => {}
        }
        None
    }

    /// Character input; only the quit hotkey is bound.
    pub fn on_character(&mut self, ch: char) -> Option<InputCommand> {
        matches!(ch, 'q' | 'Q').then_some(InputCommand::Quit)
    }

    /// Mouse buttons only flip a spin direction that no gameplay reads.
    pub fn on_mouse_button(&mut self, button: MouseButton, action: KeyAction) {
        if action == KeyAction::Release && button.index() <= MouseButton::RIGHT.index() {
            self.spin_direction = -self.spin_direction;
        }
    }

    pub fn on_scroll(&mut self, delta_y: f64) {
        self.scrolled = true;
        if delta_y > 0.0 {
            self.zoom *= ZOOM_IN;
        } else if delta_y < 0.0 && self.zoom > 0.0 {
            self.zoom *= ZOOM_OUT;
        } else {
            self.zoom = 1.0;
        }
    }

    pub fn set_cursor(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Takes the intent for the coming tick, consuming the one-shot jump.
    pub fn intent(&mut self) -> InputIntent {
        InputIntent {
            north: self.north,
            south: self.south,
            east: self.east,
            west: self.west,
            look: self.look,
            jump: std::mem::take(&mut self.jump_armed),
        }
    }

    /// Zoom only lasts while scroll events keep arriving.
    pub fn end_tick(&mut self) {
        if !self.scrolled {
            self.zoom = 1.0;
        }
        self.scrolled = false;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Cursor position in window pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn spin_direction(&self) -> f32 {
        self.spin_direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up() -> KeyCode {
        KeyCode::Named(NamedKey::Up)
    }

    #[test]
    fn parses_named_character_and_digit_keys() {
        assert_eq!(
            KeyCode::from_name("Space"),
            Some(KeyCode::Named(NamedKey::Space))
        );
        assert_eq!(KeyCode::from_name("a"), Some(KeyCode::Character('A')));
        assert_eq!(KeyCode::from_name("5"), Some(KeyCode::Digit(5)));
        assert_eq!(KeyCode::from_name("Banana"), None);
    }

    #[test]
    fn press_sets_and_release_clears_direction() {
        let mut input = InputState::new();
        input.on_key_event(up(), KeyAction::Press);
        input.on_key_event(KeyCode::Named(NamedKey::Right), KeyAction::Press);
        let intent = input.intent();
        assert!(intent.north && intent.east);
        assert!(!intent.south && !intent.west);

        input.on_key_event(up(), KeyAction::Release);
        assert!(!input.intent().north);
        assert!(input.intent().east);
    }

    #[test]
    fn jump_is_one_shot_on_release() {
        let mut input = InputState::new();
        let space = KeyCode::Named(NamedKey::Space);
        input.on_key_event(space, KeyAction::Press);
        assert!(!input.intent().jump);
        input.on_key_event(space, KeyAction::Release);
        assert!(input.intent().jump);
        assert!(!input.intent().jump);
    }

    #[test]
    fn digits_select_views_on_release() {
        let mut input = InputState::new();
        assert_eq!(input.on_key_event(KeyCode::Digit(3), KeyAction::Press), None);
        assert_eq!(
            input.on_key_event(KeyCode::Digit(3), KeyAction::Release),
            Some(InputCommand::SelectView(ViewMode::Isometric))
        );
        assert_eq!(input.on_key_event(KeyCode::Digit(9), KeyAction::Release), None);
    }

    #[test]
    fn quit_hotkeys() {
        let mut input = InputState::new();
        assert_eq!(input.on_character('q'), Some(InputCommand::Quit));
        assert_eq!(input.on_character('Q'), Some(InputCommand::Quit));
        assert_eq!(input.on_character('x'), None);
        assert_eq!(
            input.on_key_event(KeyCode::Named(NamedKey::Escape), KeyAction::Press),
            Some(InputCommand::Quit)
        );
    }

    #[test]
    fn speed_keys_request_boost() {
        let mut input = InputState::new();
        for key in ['F', 'S'] {
            assert_eq!(
                input.on_key_event(KeyCode::Character(key), KeyAction::Release),
                Some(InputCommand::BoostStep)
            );
        }
    }

    #[test]
    fn scroll_zoom_is_multiplicative_and_momentary() {
        let mut input = InputState::new();
        input.on_scroll(1.0);
        input.on_scroll(1.0);
        assert!((input.zoom() - 1.21).abs() < 1e-5);
        input.on_scroll(-1.0);
        assert!((input.zoom() - 1.089).abs() < 1e-5);
        input.end_tick();
        assert!((input.zoom() - 1.089).abs() < 1e-5);
        input.end_tick();
        assert_eq!(input.zoom(), 1.0);
    }

    #[test]
    fn zero_scroll_resets_zoom() {
        let mut input = InputState::new();
        input.on_scroll(1.0);
        input.on_scroll(0.0);
        assert_eq!(input.zoom(), 1.0);
    }

    #[test]
    fn mouse_release_flips_spin() {
        let mut input = InputState::new();
        input.on_mouse_button(MouseButton::LEFT, KeyAction::Press);
        assert_eq!(input.spin_direction(), 1.0);
        input.on_mouse_button(MouseButton::LEFT, KeyAction::Release);
        assert_eq!(input.spin_direction(), -1.0);
    }
}
