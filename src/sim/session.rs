//! Game session state machine
//!
//! Idle → Previewing → Tracing → (LevelComplete | GameOver)
//!
//! Every operation mutates the session and returns the events it produced,
//! in order. Renderers read `board()`/`state()` and react to the events;
//! no gameplay logic lives on their side.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, CountdownStep};
use super::generate::generate;
use super::maze::{BoardSnapshot, Cell, CellView, Coord, Maze};
use crate::consts::MAX_MAZE_SIZE;
use crate::error::Result;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Maze on display, waiting for start
    Idle,
    /// Maze on display, countdown running, input ignored
    Previewing,
    /// Maze hidden, player tracing
    Tracing,
    /// End reached; level already advanced
    LevelComplete,
    /// Wall hit; progress already reset
    GameOver,
}

/// Side effects of a transition, for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    MazeGenerated { size: usize, level: u32 },
    PreviewStarted { remaining: u32 },
    CountdownTick { remaining: u32 },
    CountdownCancelled,
    TracingStarted,
    CellVisited { at: Coord },
    CollectiblePicked { at: Coord, score: u32 },
    WallHit { at: Coord },
    /// Run ended; carries the level and score that were lost
    GameOver { level: u32, score: u32 },
    /// Carries the new level and maze size
    LevelComplete { level: u32, maze_size: usize },
    NewHighScore { high_score: u32 },
}

/// Serializable view of the session counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub level: u32,
    pub score: u32,
    pub high_score: u32,
    pub maze_size: usize,
    pub phase: GamePhase,
    /// Preview ticks left (0 when no countdown is running)
    pub countdown: u32,
    pub trace_len: usize,
}

/// One player's game, owned by the front-end
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    rng: Pcg32,
    level: u32,
    score: u32,
    high_score: u32,
    maze_size: usize,
    phase: GamePhase,
    maze: Maze,
    countdown: Countdown,
    /// Pointer held; moves only count while true
    drawing: bool,
    trace: Vec<Coord>,
    /// Row-major mirror of `trace` for per-cell lookups
    visited: Vec<bool>,
    /// Wall that ended the last run
    crashed: Option<Coord>,
}

impl Session {
    /// New session at level 1 with its first maze generated, in `Idle`
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze_size = settings.initial_maze_size;
        let maze = generate(maze_size, 1, &settings.rules(), &mut rng)?;
        let visited = vec![false; maze_size * maze_size];
        log::info!("New session (seed {}), {}x{} maze", seed, maze_size, maze_size);

        Ok(Self {
            settings,
            rng,
            level: 1,
            score: 0,
            high_score: 0,
            maze_size,
            phase: GamePhase::Idle,
            maze,
            countdown: Countdown::default(),
            drawing: false,
            trace: Vec::new(),
            visited,
            crashed: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn maze_size(&self) -> usize {
        self.maze_size
    }

    /// The real maze, regardless of what the player may see
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Cells entered this level, in order
    pub fn trace(&self) -> &[Coord] {
        &self.trace
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            level: self.level,
            score: self.score,
            high_score: self.high_score,
            maze_size: self.maze_size,
            phase: self.phase,
            countdown: self.countdown.remaining(),
            trace_len: self.trace.len(),
        }
    }

    /// What the player should see for one cell
    pub fn cell_view(&self, at: Coord) -> Option<CellView> {
        let cell = self.maze.get(at)?;
        if self.crashed == Some(at) {
            return Some(CellView::Crashed);
        }
        if self.visited[at.row * self.maze.size() + at.col] {
            return Some(CellView::Visited);
        }
        let view = match self.phase {
            GamePhase::Tracing if !self.maze.is_terminal(at) => CellView::Hidden,
            _ => CellView::Shown(cell),
        };
        Some(view)
    }

    /// The whole board as the player should see it
    pub fn board(&self) -> BoardSnapshot {
        let size = self.maze.size();
        let cells = (0..size)
            .map(|row| {
                (0..size)
                    .filter_map(|col| self.cell_view(Coord::new(row, col)))
                    .collect()
            })
            .collect();
        BoardSnapshot { size, cells }
    }

    /// Begin the preview. From `LevelComplete`/`GameOver` a fresh maze is
    /// generated first. Ignored while previewing or tracing.
    pub fn start(&mut self) -> Result<Vec<GameEvent>> {
        let mut events = match self.phase {
            GamePhase::Idle => Vec::new(),
            GamePhase::LevelComplete | GamePhase::GameOver => self.reset()?,
            GamePhase::Previewing | GamePhase::Tracing => return Ok(Vec::new()),
        };

        self.clear_trace();
        self.phase = GamePhase::Previewing;
        self.countdown.start(self.settings.preview_ticks);
        log::info!(
            "Level {}: previewing for {} ticks",
            self.level,
            self.settings.preview_ticks
        );
        events.push(GameEvent::PreviewStarted {
            remaining: self.settings.preview_ticks,
        });

        if self.settings.preview_ticks == 0 {
            self.countdown.cancel();
            self.begin_tracing(&mut events);
        }
        Ok(events)
    }

    /// Advance the preview countdown by one tick
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Previewing {
            return events;
        }

        match self.countdown.tick() {
            CountdownStep::Remaining(remaining) => {
                events.push(GameEvent::CountdownTick { remaining });
            }
            CountdownStep::Expired => {
                events.push(GameEvent::CountdownTick { remaining: 0 });
                self.begin_tracing(&mut events);
            }
            CountdownStep::Idle => {}
        }
        events
    }

    /// Abandon a running preview and go back to `Idle` with the same maze
    pub fn cancel(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Previewing {
            return Vec::new();
        }
        self.countdown.cancel();
        self.phase = GamePhase::Idle;
        log::debug!("Preview cancelled");
        vec![GameEvent::CountdownCancelled]
    }

    /// Pointer down
    pub fn press(&mut self) {
        if self.phase == GamePhase::Tracing {
            self.drawing = true;
        }
    }

    /// Pointer up; later moves are ignored until the next press
    pub fn release(&mut self) {
        self.drawing = false;
    }

    /// Player entered a cell. Only counts while tracing with the pointer
    /// held; out-of-range coordinates are ignored.
    pub fn move_to(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Tracing || !self.drawing {
            return events;
        }
        let at = Coord::new(row, col);
        let Some(cell) = self.maze.get(at) else {
            return events;
        };

        self.trace.push(at);
        self.visited[at.row * self.maze.size() + at.col] = true;
        match cell {
            Cell::Wall => {
                events.push(GameEvent::WallHit { at });
                self.crashed = Some(at);
                self.game_over(&mut events);
            }
            Cell::Collectible => {
                self.score += 1;
                self.maze.set(at, Cell::Path);
                log::debug!("Collectible at {:?}, score {}", at, self.score);
                events.push(GameEvent::CollectiblePicked {
                    at,
                    score: self.score,
                });
            }
            Cell::End => {
                events.push(GameEvent::CellVisited { at });
                self.level_complete(&mut events);
            }
            Cell::Path | Cell::Start => {
                events.push(GameEvent::CellVisited { at });
            }
        }
        events
    }

    /// Generate a fresh maze for the current level and size and show it in
    /// `Idle`. Cancels a running preview.
    pub fn reset(&mut self) -> Result<Vec<GameEvent>> {
        let maze = generate(self.maze_size, self.level, &self.settings.rules(), &mut self.rng)?;

        let mut events = Vec::new();
        if self.countdown.cancel() {
            events.push(GameEvent::CountdownCancelled);
        }
        self.maze = maze;
        self.phase = GamePhase::Idle;
        self.drawing = false;
        self.clear_trace();

        log::info!(
            "Level {}: new {}x{} maze",
            self.level,
            self.maze_size,
            self.maze_size
        );
        events.push(GameEvent::MazeGenerated {
            size: self.maze_size,
            level: self.level,
        });
        Ok(events)
    }

    /// Forget the trace and crash marker, sized to the current maze
    fn clear_trace(&mut self) {
        let size = self.maze.size();
        self.trace.clear();
        self.visited.clear();
        self.visited.resize(size * size, false);
        self.crashed = None;
    }

    fn begin_tracing(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Tracing;
        self.drawing = true;
        log::info!("Level {}: tracing", self.level);
        events.push(GameEvent::TracingStarted);
    }

    fn level_complete(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::LevelComplete;
        self.drawing = false;

        self.level = self.level.saturating_add(1);
        if self.level % self.settings.size_growth_interval == 0 && self.maze_size < MAX_MAZE_SIZE {
            self.maze_size += 1;
        }
        log::info!(
            "Level complete, now level {} ({}x{})",
            self.level,
            self.maze_size,
            self.maze_size
        );
        events.push(GameEvent::LevelComplete {
            level: self.level,
            maze_size: self.maze_size,
        });

        if self.score > self.high_score {
            self.high_score = self.score;
            events.push(GameEvent::NewHighScore {
                high_score: self.high_score,
            });
        }
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::GameOver;
        self.drawing = false;
        log::info!("Game over at level {} with score {}", self.level, self.score);
        events.push(GameEvent::GameOver {
            level: self.level,
            score: self.score,
        });

        self.level = 1;
        self.score = 0;
        self.maze_size = self.settings.initial_maze_size;
    }
}
