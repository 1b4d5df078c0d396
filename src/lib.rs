//! Core modules for a small maze game played on a 14x14 grid of floor tiles.
//!
//! The player starts in one corner and has to reach the goal tile in the
//! opposite corner while avoiding pits, walking around obstacles and piles,
//! and jumping over them when needed. Gameplay lives in plain data types so
//! that a match can be driven without a window; only [`render`] and the
//! binary touch the GPU and the windowing system.

pub mod app;
pub mod board;
pub mod camera;
pub mod config;
pub mod game;
pub mod input;
pub mod mesh;
pub mod physics;
pub mod player;
pub mod render;
pub mod scene;
pub mod script;

pub use board::{generate_board, Board, CellId, Tile, TileId, TileKind};
pub use camera::{CameraParams, CameraRig, OrthoBounds, ViewMode};
pub use config::GameConfig;
pub use game::{Control, GameState, TickGate};
pub use input::{InputState, KeyAction, KeyCode, MouseButton, NamedKey};
pub use mesh::{Mesh, MeshKind};
pub use physics::{resolve_tick, MatchOutcome};
pub use player::{Facing, Player};
pub use render::{compile_program, Renderer, ShaderError};
pub use scene::{build_draw_list, DrawItem};
pub use script::{parse_script, run_script, ScriptCommand, ScriptError};
