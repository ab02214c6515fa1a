//! Deterministic game core
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Seeded RNG only (passed in, or owned by the session)
//! - Time advances only through explicit countdown ticks
//! - Row-major iteration everywhere

pub mod countdown;
pub mod generate;
pub mod maze;
pub mod repair;
pub mod session;
pub mod shuffle;

pub use countdown::{Countdown, CountdownStep};
pub use generate::{MazeRules, generate};
pub use maze::{BoardSnapshot, Cell, CellView, Coord, Maze, NEIGHBOR_STEPS};
pub use repair::{Reachability, end_reachable, repair};
pub use session::{GameEvent, GamePhase, Session, SessionState};
pub use shuffle::shuffle;
