use glam::{Mat4, Vec3};

use crate::board::{TileKind, GOAL_CELL};
use crate::game::GameState;
use crate::mesh::MeshKind;

/// Height at which obstacles sit on top of their tile.
const OBSTACLE_LIFT: f32 = 0.5;

/// One mesh instance to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKind,
    pub model: Mat4,
}

/// Flattens the game state into draw calls: player first, then every floor
/// tile, then the obstacles standing on them.
pub fn build_draw_list(state: &GameState) -> Vec<DrawItem> {
    let board = &state.board;
    let mut items = Vec::with_capacity(1 + board.tiles().len() + board.count(TileKind::Obstacle));

    let player = &state.player;
    items.push(DrawItem {
        mesh: MeshKind::Player,
        model: Mat4::from_translation(player.position - Vec3::Y)
            * Mat4::from_rotation_y(player.heading().to_radians()),
    });

    for tile in board.tiles() {
        let mesh = if tile.cell() == GOAL_CELL {
            MeshKind::GoalTile
        } else {
            MeshKind::Tile
        };
        items.push(DrawItem {
            mesh,
            model: Mat4::from_translation(Vec3::new(tile.x(), tile.y(), tile.z())),
        });
    }

    for tile in board.obstacles() {
        items.push(DrawItem {
            mesh: MeshKind::Obstacle,
            model: Mat4::from_translation(Vec3::new(tile.x(), OBSTACLE_LIFT, tile.z())),
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, CellId};
    use crate::config::GameConfig;

    #[test]
    fn draws_player_tiles_and_obstacles() {
        let board = Board::with_layout([
            (CellId::new(1, 1), TileKind::Obstacle),
            (CellId::new(-4, 2), TileKind::Obstacle),
            (CellId::new(3, 3), TileKind::Pile),
        ]);
        let tiles = board.tiles().len();
        let state = GameState::with_board(board, &GameConfig::default());
        let items = build_draw_list(&state);
        assert_eq!(items.len(), 1 + tiles + 2);
        assert_eq!(items[0].mesh, MeshKind::Player);
        assert_eq!(
            items.iter().filter(|item| item.mesh == MeshKind::GoalTile).count(),
            1
        );
        let obstacle = items.last().map(|item| item.model.w_axis.truncate());
        assert_eq!(obstacle, Some(Vec3::new(-4.0, OBSTACLE_LIFT, 2.0)));
    }

    #[test]
    fn player_mesh_hangs_below_reference_point() {
        let state = GameState::with_board(Board::plain(), &GameConfig::default());
        let items = build_draw_list(&state);
        let origin = items[0].model.w_axis.truncate();
        assert_eq!(origin, Vec3::new(-7.0, 1.0, 6.0));
    }
}
