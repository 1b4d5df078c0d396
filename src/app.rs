//! Host-independent pieces of the binary: the windowless runner and the
//! end-of-run report.

use log::info;

use crate::board::TileKind;
use crate::config::GameConfig;
use crate::game::GameState;
use crate::physics::MatchOutcome;
use crate::script::{run_script, ScriptCommand, ScriptEnd};

/// Exit code used when the player falls into a pit.
pub const LOSS_EXIT_CODE: i32 = 2;

/// Banner printed when a match is decided.
pub fn outcome_banner(outcome: MatchOutcome) -> &'static str {
    match outcome {
        MatchOutcome::Win => "Game Won",
        MatchOutcome::Loss => "Fell into a pit",
    }
}

pub fn exit_code(outcome: Option<MatchOutcome>) -> i32 {
    match outcome {
        Some(MatchOutcome::Loss) => LOSS_EXIT_CODE,
        Some(MatchOutcome::Win) | None => 0,
    }
}

fn outcome_label(outcome: Option<MatchOutcome>, quit: bool) -> &'static str {
    match outcome {
        Some(MatchOutcome::Win) => "win",
        Some(MatchOutcome::Loss) => "loss",
        None if quit => "quit",
        None => "none",
    }
}

pub fn print_final_state(state: &GameState, quit: bool) {
    let position = state.player.position;
    println!("outcome={}", outcome_label(state.outcome(), quit));
    println!("seed={} ticks={}", state.seed(), state.ticks());
    println!("view={:?}", state.view());
    println!(
        "player pos=({:.2}, {:.2}, {:.2})",
        position.x, position.y, position.z
    );
    println!(
        "board: {} tiles, {} obstacles, {} piles",
        state.board.tiles().len(),
        state.board.count(TileKind::Obstacle),
        state.board.count(TileKind::Pile)
    );
}

/// Plays a match without a window.
///
/// With a script the commands drive the match; without one the match idles
/// for `idle_ticks`. Returns the final state and whether the run was quit.
pub fn run_headless(
    config: &GameConfig,
    script: Option<&[ScriptCommand]>,
    idle_ticks: u32,
) -> (GameState, bool) {
    let mut state = GameState::new(config);
    let end = match script {
        Some(commands) => {
            info!("running {} script command(s)", commands.len());
            run_script(&mut state, commands)
        }
        None => run_script(&mut state, &[ScriptCommand::Tick(idle_ticks)]),
    };
    if let ScriptEnd::Decided(outcome) = end {
        println!("{}", outcome_banner(outcome));
    }
    (state, end == ScriptEnd::Quit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    fn plain_config() -> GameConfig {
        GameConfig {
            plain_board: true,
            ..GameConfig::with_seed(3)
        }
    }

    #[test]
    fn idle_run_leaves_player_at_start() {
        let (state, quit) = run_headless(&GameConfig::with_seed(5), None, 12);
        assert!(!quit);
        assert_eq!(state.ticks(), 12);
        assert_eq!(state.player.position, crate::player::START_POSITION);
        assert_eq!(exit_code(state.outcome()), 0);
    }

    #[test]
    fn walking_into_a_pit_loses() {
        let script = parse_script("press Up\ntick 10\nrelease Up\npress Right\ntick 80").unwrap();
        let (state, _) = run_headless(&plain_config(), Some(&script), 0);
        assert_eq!(state.outcome(), Some(MatchOutcome::Loss));
        assert_eq!(exit_code(state.outcome()), LOSS_EXIT_CODE);
    }

    #[test]
    fn diagonal_walk_reaches_goal() {
        let script = parse_script("press Up\npress Right\ntick 200").unwrap();
        let (state, _) = run_headless(&plain_config(), Some(&script), 0);
        assert_eq!(state.outcome(), Some(MatchOutcome::Win));
        assert!(state.ticks() >= 130);
    }

    #[test]
    fn quit_is_reported() {
        let script = parse_script("char q").unwrap();
        let (state, quit) = run_headless(&plain_config(), Some(&script), 0);
        assert!(quit);
        assert_eq!(outcome_label(state.outcome(), quit), "quit");
    }
}
