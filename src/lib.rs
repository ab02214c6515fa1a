//! Maze Memory - memorize a maze, then trace it blind
//!
//! Core modules:
//! - `sim`: Deterministic game core (maze generation, repair, session state machine)
//! - `settings`: Data-driven game rules
//! - `error`: Crate error type
//! - `web`: wasm-bindgen facade for a browser renderer (wasm32 only)

pub mod error;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Maze edge length at level 1 and after a game over
    pub const DEFAULT_MAZE_SIZE: usize = 6;
    /// Smallest maze that still has distinct start and end cells
    pub const MIN_MAZE_SIZE: usize = 2;
    /// Largest maze the generator will build; level growth stops here
    pub const MAX_MAZE_SIZE: usize = 256;

    /// Walls added per level
    pub const WALLS_PER_LEVEL: usize = 2;
    /// Upper bound on walls, as a percentage of all cells
    pub const WALL_DENSITY_PERCENT: usize = 20;
    /// Collectibles placed in every maze
    pub const COLLECTIBLES_PER_MAZE: usize = 1;
    /// Maze grows by one every this many levels
    pub const SIZE_GROWTH_INTERVAL: u32 = 3;

    /// Preview countdown length in ticks
    pub const PREVIEW_TICKS: u32 = 5;
    /// Length of one countdown tick in milliseconds
    pub const TICK_MS: u64 = 1000;

    /// Rejection-sampling draws before falling back to a candidate scan
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;
}
