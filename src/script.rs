//! Line-oriented input scripts used to drive a match without a window.
//!
//! ```text
//! # walk east for ten ticks, then jump
//! press Right
//! tick 10
//! release Right
//! tap Space
//! tick 8
//! ```

use glam::Vec2;
use thiserror::Error;

use crate::game::{Control, GameState};
use crate::input::{KeyAction, KeyCode, MouseButton};
use crate::physics::MatchOutcome;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptCommand {
    Key(KeyCode, KeyAction),
    /// Press immediately followed by release.
    Tap(KeyCode),
    Char(char),
    Click(MouseButton),
    Scroll(f64),
    Cursor(Vec2),
    Resize(u32, u32),
    Tick(u32),
}

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: expected {expected}")]
    Malformed { line: usize, expected: &'static str },
}

/// Parses a script; blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        let mut parts = text.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();
        commands.push(parse_command(line, command, &args)?);
    }
    Ok(commands)
}

fn parse_command(line: usize, command: &str, args: &[&str]) -> Result<ScriptCommand, ScriptError> {
    let malformed = |expected| ScriptError::Malformed { line, expected };
    let key = |index: usize| -> Result<KeyCode, ScriptError> {
        let name = args.get(index).ok_or_else(|| malformed("a key name"))?;
        KeyCode::from_name(name).ok_or_else(|| ScriptError::UnknownKey {
            line,
            key: name.to_string(),
        })
    };
    let number = |index: usize, expected| -> Result<f64, ScriptError> {
        args.get(index)
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| malformed(expected))
    };

    Ok(match command {
        "press" => ScriptCommand::Key(key(0)?, KeyAction::Press),
        "release" => ScriptCommand::Key(key(0)?, KeyAction::Release),
        "tap" => ScriptCommand::Tap(key(0)?),
        "char" => {
            let ch = args
                .first()
                .and_then(|value| value.chars().next())
                .ok_or_else(|| malformed("a character"))?;
            ScriptCommand::Char(ch)
        }
        "click" => {
            let index = match args.first().copied() {
                None | Some("left") => MouseButton::LEFT.index(),
                Some("right") => MouseButton::RIGHT.index(),
                Some(_) => return Err(malformed("`left` or `right`")),
            };
            ScriptCommand::Click(MouseButton::new(index))
        }
        "scroll" => ScriptCommand::Scroll(number(0, "a scroll delta")?),
        "cursor" => ScriptCommand::Cursor(Vec2::new(
            number(0, "cursor x and y")? as f32,
            number(1, "cursor x and y")? as f32,
        )),
        "resize" => {
            let width = number(0, "a width and a height")?;
            let height = number(1, "a width and a height")?;
            ScriptCommand::Resize(width as u32, height as u32)
        }
        "tick" => match args.first() {
            None => ScriptCommand::Tick(1),
            Some(count) => ScriptCommand::Tick(
                count
                    .parse::<u32>()
                    .map_err(|_| malformed("a tick count"))?,
            ),
        },
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    })
}

/// How a scripted run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEnd {
    Finished,
    Quit,
    Decided(MatchOutcome),
}

/// Feeds the commands to `state`, stopping early on quit or a decided match.
pub fn run_script(state: &mut GameState, commands: &[ScriptCommand]) -> ScriptEnd {
    for command in commands {
        let control = match *command {
            ScriptCommand::Key(key, action) => state.on_key_event(key, action),
            ScriptCommand::Tap(key) => match state.on_key_event(key, KeyAction::Press) {
                Control::Quit => Control::Quit,
                Control::Continue => state.on_key_event(key, KeyAction::Release),
            },
            ScriptCommand::Char(ch) => state.on_character(ch),
            ScriptCommand::Click(button) => {
                state.on_mouse_button(button, KeyAction::Press);
                state.on_mouse_button(button, KeyAction::Release);
                Control::Continue
            }
            ScriptCommand::Scroll(delta) => {
                state.on_scroll(delta);
                Control::Continue
            }
            ScriptCommand::Cursor(position) => {
                state.on_cursor_moved(position);
                Control::Continue
            }
            ScriptCommand::Resize(width, height) => {
                state.resize(width, height);
                Control::Continue
            }
            ScriptCommand::Tick(count) => {
                for _ in 0..count {
                    if let Some(outcome) = state.tick() {
                        return ScriptEnd::Decided(outcome);
                    }
                }
                Control::Continue
            }
        };
        if control == Control::Quit {
            return ScriptEnd::Quit;
        }
    }
    ScriptEnd::Finished
}
