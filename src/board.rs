use std::collections::HashSet;

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest row/column coordinate of the board (inclusive).
pub const BOARD_MIN: i32 = -7;
/// Highest row/column coordinate of the board (inclusive).
pub const BOARD_MAX: i32 = 6;

/// Cells that never receive a floor tile. Each one is a pit.
pub const GAP_CELLS: [CellId; 6] = [
    CellId::new(2, -1),
    CellId::new(0, 1),
    CellId::new(-3, 3),
    CellId::new(-2, 5),
    CellId::new(4, -4),
    CellId::new(-2, -1),
];

/// Cell the player has to reach to win.
pub const GOAL_CELL: CellId = CellId::new(6, -7);

/// Tiles that always stay plain: the goal tile and one tile in the south-west.
pub const DEFAULT_EXCLUDED_TILES: [TileId; 2] = [TileId(13), TileId(151)];

const OBSTACLE_ODDS: u32 = 10;
const PILE_ODDS: u32 = 15;

const PILE_STEP: f32 = 0.1;
const PILE_MAX_LEVEL: i32 = 5;

/// Integer board coordinate: `j` is the world x, `k` the world z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId {
    pub j: i32,
    pub k: i32,
}

impl CellId {
    pub const fn new(j: i32, k: i32) -> Self {
        Self { j, k }
    }

    pub fn is_gap(self) -> bool {
        GAP_CELLS.contains(&self)
    }
}

/// Dense index of a floor tile in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Plain,
    Obstacle,
    Pile,
}

/// One floor tile. Only piles ever change height.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    cell: CellId,
    kind: TileKind,
    level: i32,
    rising: bool,
}

impl Tile {
    fn new(id: TileId, cell: CellId, kind: TileKind) -> Self {
        Self {
            id,
            cell,
            kind,
            level: 0,
            rising: true,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn x(&self) -> f32 {
        self.cell.j as f32
    }

    pub fn z(&self) -> f32 {
        self.cell.k as f32
    }

    /// Vertical offset of the tile; always zero unless the tile is a pile.
    pub fn y(&self) -> f32 {
        self.level as f32 * PILE_STEP
    }

    /// Moves a pile one step along its -0.5..0.5 triangle wave.
    fn oscillate(&mut self) {
        if self.rising {
            self.level += 1;
            if self.level >= PILE_MAX_LEVEL {
                self.rising = false;
            }
        } else {
            self.level -= 1;
            if self.level <= -PILE_MAX_LEVEL {
                self.rising = true;
            }
        }
    }
}

/// The fixed 14x14 board minus its gap cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Iterates over the cells that own a tile, in tile id order.
    pub fn cells() -> impl Iterator<Item = CellId> {
        (BOARD_MIN..=BOARD_MAX)
            .flat_map(|k| (BOARD_MIN..=BOARD_MAX).map(move |j| CellId::new(j, k)))
            .filter(|cell| !cell.is_gap())
    }

    /// Builds a board where every tile is plain.
    pub fn plain() -> Self {
        Self::with_layout(std::iter::empty())
    }

    /// Builds a board from an explicit layout; unlisted and gap cells stay plain or empty.
    pub fn with_layout(layout: impl IntoIterator<Item = (CellId, TileKind)>) -> Self {
        let special: Vec<(CellId, TileKind)> = layout.into_iter().collect();
        let tiles = Self::cells()
            .enumerate()
            .map(|(index, cell)| {
                let kind = special
                    .iter()
                    .rev()
                    .find(|(candidate, _)| *candidate == cell)
                    .map(|(_, kind)| *kind)
                    .unwrap_or(TileKind::Plain);
                Tile::new(TileId(index), cell, kind)
            })
            .collect();
        Self { tiles }
    }

    /// Draws a tile kind for every cell not listed in `excluded`.
    ///
    /// Each tile first rolls for an obstacle (1 in 10); only when that fails
    /// does it roll for a pile (1 in 15).
    pub fn generate<R: Rng + ?Sized>(excluded: &HashSet<TileId>, rng: &mut R) -> Self {
        let tiles: Vec<Tile> = Self::cells()
            .enumerate()
            .map(|(index, cell)| {
                let id = TileId(index);
                let kind = if excluded.contains(&id) {
                    TileKind::Plain
                } else if rng.gen_range(0..OBSTACLE_ODDS) == 0 {
                    TileKind::Obstacle
                } else if rng.gen_range(0..PILE_ODDS) == 0 {
                    TileKind::Pile
                } else {
                    TileKind::Plain
                };
                Tile::new(id, cell, kind)
            })
            .collect();
        let board = Self { tiles };
        info!(
            "generated board: {} tiles, {} obstacles, {} piles",
            board.tiles.len(),
            board.count(TileKind::Obstacle),
            board.count(TileKind::Pile)
        );
        board
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn tile_at(&self, cell: CellId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.cell == cell)
    }

    pub fn goal_tile(&self) -> Option<&Tile> {
        self.tile_at(GOAL_CELL)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Tile> {
        self.of_kind(TileKind::Obstacle)
    }

    pub fn piles(&self) -> impl Iterator<Item = &Tile> {
        self.of_kind(TileKind::Pile)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Advances every pile one animation step, independent of the player.
    pub fn animate_piles(&mut self) {
        self.tiles
            .iter_mut()
            .filter(|tile| tile.kind == TileKind::Pile)
            .for_each(Tile::oscillate);
    }

    fn of_kind(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |tile| tile.kind == kind)
    }
}

/// Generates a board; see [`Board::generate`].
pub fn generate_board<R: Rng + ?Sized>(excluded: &HashSet<TileId>, rng: &mut R) -> Board {
    Board::generate(excluded, rng)
}
