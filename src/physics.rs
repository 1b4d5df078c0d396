//! Per-tick movement and collision resolution.
//!
//! The steps run in a fixed order and later steps win over earlier ones:
//! directional movement, obstacle and pile separation, the jump arc, pits,
//! the goal check, the board clamp and finally the pile animation.

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::board::{Board, GAP_CELLS};
use crate::input::InputIntent;
use crate::player::{Facing, Player};

/// Outer edge of the walkable area on both axes.
pub const BOUND_MIN: f32 = -7.25;
pub const BOUND_MAX: f32 = 6.25;

const PIT_HALF_EXTENT: f32 = 0.25;
const GOAL_MIN_X: f32 = 6.0;
const GOAL_MAX_Z: f32 = -7.0;

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Loss,
}

/// Axis-aligned slab used to push the player off a blocking tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabBand {
    /// Closest distance from the tile centre that still triggers a push.
    pub near: f32,
    /// Farthest distance from the tile centre that still triggers a push; also the snap offset.
    pub far: f32,
    /// Half-width of the z band required before pushing along x.
    pub cross_z: f32,
    /// Half-width of the x band required before pushing along z.
    pub cross_x: f32,
}

pub const OBSTACLE_BAND: SlabBand = SlabBand {
    near: 0.25,
    far: 0.5,
    cross_z: 0.5,
    cross_x: 0.5,
};

pub const PILE_BAND: SlabBand = SlabBand {
    near: 0.5,
    far: 0.75,
    cross_z: 0.5,
    cross_x: 0.75,
};

/// Pushes `position` out of the band around a tile centred at (`tile_x`, `tile_z`).
pub fn separate(position: &mut Vec3, tile_x: f32, tile_z: f32, band: SlabBand) {
    let in_band = |distance: f32| (band.near..=band.far).contains(&distance);

    if (tile_z - band.cross_z..=tile_z + band.cross_z).contains(&position.z) {
        if in_band(position.x - tile_x) {
            position.x = tile_x + band.far;
        } else if in_band(tile_x - position.x) {
            position.x = tile_x - band.far;
        }
    }
    if (tile_x - band.cross_x..=tile_x + band.cross_x).contains(&position.x) {
        if in_band(position.z - tile_z) {
            position.z = tile_z + band.far;
        } else if in_band(tile_z - position.z) {
            position.z = tile_z - band.far;
        }
    }
}

/// Moves the player along every held direction and updates the facing.
pub fn apply_directions(player: &mut Player, intent: &InputIntent, step: f32) {
    let moves = [
        (intent.north, Facing::North, Vec3::new(0.0, 0.0, -step)),
        (intent.south, Facing::South, Vec3::new(0.0, 0.0, step)),
        (intent.west, Facing::West, Vec3::new(-step, 0.0, 0.0)),
        (intent.east, Facing::East, Vec3::new(step, 0.0, 0.0)),
    ];
    for (held, facing, delta) in moves {
        if held {
            player.position += delta;
            player.face(facing);
        }
    }
}

pub fn resolve_obstacles(player: &mut Player, board: &Board) {
    if player.is_jumping() {
        return;
    }
    for tile in board.obstacles() {
        separate(&mut player.position, tile.x(), tile.z(), OBSTACLE_BAND);
    }
}

pub fn resolve_piles(player: &mut Player, board: &Board) {
    if player.is_jumping() {
        return;
    }
    for tile in board.piles() {
        separate(&mut player.position, tile.x(), tile.z(), PILE_BAND);
    }
}

/// True when (`x`, `z`) lies over one of the gap cells.
pub fn in_pit(x: f32, z: f32) -> bool {
    GAP_CELLS.iter().any(|cell| {
        let (cx, cz) = (cell.j as f32, cell.k as f32);
        (cx - PIT_HALF_EXTENT..=cx + PIT_HALF_EXTENT).contains(&x)
            && (cz - PIT_HALF_EXTENT..=cz + PIT_HALF_EXTENT).contains(&z)
    })
}

pub fn reached_goal(x: f32, z: f32) -> bool {
    x >= GOAL_MIN_X && z <= GOAL_MAX_Z
}

pub fn clamp_to_board(position: &mut Vec3) {
    position.x = position.x.clamp(BOUND_MIN, BOUND_MAX);
    position.z = position.z.clamp(BOUND_MIN, BOUND_MAX);
}

/// Runs one gameplay tick over the board and player.
///
/// Returns the outcome as soon as the player drops out of the world or
/// reaches the goal; the remaining steps are skipped in that case.
pub fn resolve_tick(
    board: &mut Board,
    player: &mut Player,
    intent: &InputIntent,
    step: f32,
) -> Option<MatchOutcome> {
    apply_directions(player, intent, step);
    resolve_obstacles(player, board);
    resolve_piles(player, board);

    if intent.jump {
        player.start_jump();
    }
    player.advance_jump();

    let over_pit = !player.is_jumping() && in_pit(player.position.x, player.position.z);
    // A started fall keeps going even if the player slides off the pit square.
    if (over_pit || player.is_falling()) && player.sink() {
        info!("player fell out of the world");
        return Some(MatchOutcome::Loss);
    }

    if reached_goal(player.position.x, player.position.z) {
        info!("player reached the goal");
        return Some(MatchOutcome::Win);
    }

    clamp_to_board(&mut player.position);
    board.animate_piles();
    None
}
