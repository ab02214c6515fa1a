//! Connectivity repair
//!
//! Depth-first opening pass from the start cell. Every non-wall cell the
//! walk can reach is forced back to `Path`. Walls are never crossed or
//! removed, so a region fully fenced off by walls stays as it was, and the
//! end cell is only reachable if the wall layout allows it.

use rand::Rng;

use super::maze::{Cell, Coord, Maze, NEIGHBOR_STEPS};
use super::shuffle::shuffle;

/// Cells visited by a repair pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    size: usize,
    visited: Vec<bool>,
}

impl Reachability {
    fn new(size: usize) -> Self {
        Self {
            size,
            visited: vec![false; size * size],
        }
    }

    fn mark(&mut self, at: Coord) {
        self.visited[at.row * self.size + at.col] = true;
    }

    pub fn is_visited(&self, at: Coord) -> bool {
        at.row < self.size && at.col < self.size && self.visited[at.row * self.size + at.col]
    }

    /// Number of visited cells, start included
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }
}

/// Run the opening pass over `maze`, starting at (0, 0).
///
/// Each popped cell looks at its four neighbours in a freshly shuffled
/// order. A neighbour that is in range, unvisited and not a wall is
/// visited, pushed and set to `Path`. That overwrite erases a reachable
/// collectible unless `preserve_collectibles` is set.
pub fn repair<R: Rng + ?Sized>(
    maze: &mut Maze,
    rng: &mut R,
    preserve_collectibles: bool,
) -> Reachability {
    let size = maze.size();
    let mut reach = Reachability::new(size);
    if size == 0 {
        return reach;
    }

    let start = maze.start();
    reach.mark(start);
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        let mut steps = NEIGHBOR_STEPS;
        shuffle(&mut steps, rng);

        for step in steps {
            let Some(next) = cell.offset(step, size) else {
                continue;
            };
            if reach.is_visited(next) {
                continue;
            }
            let current = maze.get(next).unwrap_or(Cell::Wall);
            if current.is_wall() {
                continue;
            }

            reach.mark(next);
            stack.push(next);
            if !(preserve_collectibles && current == Cell::Collectible) {
                maze.set(next, Cell::Path);
            }
        }
    }

    reach
}

/// Whether the end cell can be reached from the start through non-wall cells.
///
/// Read-only check used for diagnostics; the repair pass itself never
/// verifies this.
pub fn end_reachable(maze: &Maze) -> bool {
    let size = maze.size();
    if size == 0 {
        return false;
    }

    let mut seen = vec![false; size * size];
    let mut stack = vec![maze.start()];
    seen[0] = true;

    while let Some(cell) = stack.pop() {
        if cell == maze.end() {
            return true;
        }
        for step in NEIGHBOR_STEPS {
            if let Some(next) = cell.offset(step, size) {
                let idx = next.row * size + next.col;
                if !seen[idx] && maze.get(next).is_some_and(|c| !c.is_wall()) {
                    seen[idx] = true;
                    stack.push(next);
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn walled(size: usize, walls: &[(usize, usize)]) -> Maze {
        let mut maze = Maze::new(size);
        for &(row, col) in walls {
            maze.set(Coord::new(row, col), Cell::Wall);
        }
        maze
    }

    #[test]
    fn test_open_maze_visits_everything() {
        let mut maze = Maze::new(5);
        let reach = repair(&mut maze, &mut Pcg32::seed_from_u64(1), false);
        assert_eq!(reach.visited_count(), 25);
        assert!(end_reachable(&maze));
    }

    #[test]
    fn test_visited_cells_are_never_walls() {
        let mut maze = walled(6, &[(0, 1), (2, 2), (3, 4), (5, 0)]);
        let reach = repair(&mut maze, &mut Pcg32::seed_from_u64(3), false);

        for at in maze.coords() {
            if reach.is_visited(at) {
                assert_ne!(maze.get(at), Some(Cell::Wall), "visited wall at {at:?}");
            }
        }
        // Walls survive untouched
        assert_eq!(maze.count(Cell::Wall), 4);
    }

    #[test]
    fn test_reachable_collectible_is_erased() {
        let mut maze = Maze::new(4);
        maze.set(Coord::new(2, 1), Cell::Collectible);

        repair(&mut maze, &mut Pcg32::seed_from_u64(5), false);
        assert_eq!(maze.count(Cell::Collectible), 0);
    }

    #[test]
    fn test_preserve_collectibles_keeps_it_and_walks_through() {
        let mut maze = walled(3, &[(1, 0), (1, 2)]);
        // Only gap in the middle row holds the collectible
        maze.set(Coord::new(1, 1), Cell::Collectible);

        let reach = repair(&mut maze, &mut Pcg32::seed_from_u64(5), true);
        assert_eq!(maze.get(Coord::new(1, 1)), Some(Cell::Collectible));
        assert!(reach.is_visited(Coord::new(2, 2)));
    }

    #[test]
    fn test_enclosed_region_left_alone() {
        // Corner (0,0) fenced in by walls at (0,1) and (1,0)
        let mut maze = walled(4, &[(0, 1), (1, 0)]);
        maze.set(Coord::new(3, 2), Cell::Collectible);

        let reach = repair(&mut maze, &mut Pcg32::seed_from_u64(11), false);
        assert_eq!(reach.visited_count(), 1);
        assert_eq!(maze.get(Coord::new(3, 2)), Some(Cell::Collectible));
        assert!(!end_reachable(&maze));
    }

    #[test]
    fn test_end_cut_off_by_walls() {
        let maze = walled(4, &[(2, 3), (3, 2)]);
        assert!(!end_reachable(&maze));

        let maze = walled(4, &[(2, 3)]);
        assert!(end_reachable(&maze));
    }

    #[test]
    fn test_single_cell_maze() {
        let mut maze = Maze::new(1);
        let reach = repair(&mut maze, &mut Pcg32::seed_from_u64(0), false);
        assert_eq!(reach.visited_count(), 1);
        assert!(end_reachable(&maze));
    }
}
