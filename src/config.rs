use std::collections::HashSet;
use std::time::Duration;

use crate::board::{TileId, DEFAULT_EXCLUDED_TILES};

/// Tunables for a single match.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Board seed; `None` draws a fresh one from the OS.
    pub seed: Option<u64>,
    /// Minimum wall-clock time between gameplay ticks.
    pub tick_interval: Duration,
    /// Distance moved per tick per held direction.
    pub base_step: f32,
    /// Step used after the F or S key has been released once.
    pub boosted_step: f32,
    pub window_width: u32,
    pub window_height: u32,
    /// Tiles that never become obstacles or piles.
    pub excluded_tiles: HashSet<TileId>,
    /// Skip generation and play on a board with no obstacles or piles.
    pub plain_board: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval: Duration::from_millis(65),
            base_step: 0.1,
            boosted_step: 0.2,
            window_width: 1600,
            window_height: 900,
            excluded_tiles: DEFAULT_EXCLUDED_TILES.into_iter().collect(),
            plain_board: false,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
