//! Maze grid and cell types

use serde::{Deserialize, Serialize};

/// State of a single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Path,
    /// Impassable; entering one ends the run
    Wall,
    /// Worth one point, becomes `Path` once entered
    Collectible,
    Start,
    End,
}

impl Cell {
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// Grid coordinate, `row` first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by `(d_row, d_col)`, or `None` when that leaves an `size`×`size` grid
    pub fn offset(self, (d_row, d_col): (isize, isize), size: usize) -> Option<Coord> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < size && col < size).then_some(Coord { row, col })
    }
}

/// Four-neighbour steps in the order the repair pass starts from
/// (right, down, left, up) before shuffling
pub const NEIGHBOR_STEPS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Square maze, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeData")]
pub struct Maze {
    size: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire form of [`Maze`]
#[derive(Deserialize)]
struct MazeData {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<MazeData> for Maze {
    type Error = String;

    fn try_from(data: MazeData) -> Result<Self, Self::Error> {
        if data.size.checked_mul(data.size) != Some(data.cells.len()) {
            return Err(format!(
                "maze of size {} needs {} cells, got {}",
                data.size,
                data.size.saturating_mul(data.size),
                data.cells.len()
            ));
        }
        Ok(Self {
            size: data.size,
            cells: data.cells,
        })
    }
}

impl Maze {
    /// All-`Path` maze of edge length `size`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Path; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn end(&self) -> Coord {
        let last = self.size.saturating_sub(1);
        Coord::new(last, last)
    }

    /// Start or end cell; never receives walls or collectibles
    pub fn is_terminal(&self, at: Coord) -> bool {
        at == self.start() || at == self.end()
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.size && at.col < self.size
    }

    /// Cell at `at`, or `None` when out of range
    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.contains(at)
            .then(|| self.cells[at.row * self.size + at.col])
    }

    /// Overwrite the cell at `at`; out-of-range writes are ignored
    pub fn set(&mut self, at: Coord, cell: Cell) {
        if self.contains(at) {
            self.cells[at.row * self.size + at.col] = cell;
        }
    }

    /// Number of cells in the given state
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Coordinates of every cell in the given state, row-major
    pub fn positions(&self, cell: Cell) -> Vec<Coord> {
        self.coords().filter(|&at| self.get(at) == Some(cell)).collect()
    }

    /// All coordinates, row-major
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Coord::new(row, col)))
    }

    /// Rows as slices, for rendering
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }
}

/// What a renderer should draw for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "cell")]
pub enum CellView {
    /// Maze is on display; draw the real cell
    Shown(Cell),
    /// Maze is hidden and the player has not been here
    Hidden,
    /// Part of the player's trace
    Visited,
    /// The wall that ended the run
    Crashed,
}

/// Full board as seen by the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<CellView>>,
}
