//! Maze generation
//!
//! Random walls and collectibles on an all-path grid, followed by a
//! connectivity repair pass and the fixed start/end cells.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::maze::{Cell, Coord, Maze};
use super::repair::{end_reachable, repair};
use crate::consts::*;
use crate::error::{Error, Result};

/// Knobs for a single generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeRules {
    pub walls_per_level: usize,
    pub wall_density_percent: usize,
    pub collectibles: usize,
    pub max_placement_attempts: u32,
    /// Keep collectibles the repair pass walks over instead of erasing them
    pub preserve_collectibles: bool,
}

impl Default for MazeRules {
    fn default() -> Self {
        Self {
            walls_per_level: WALLS_PER_LEVEL,
            wall_density_percent: WALL_DENSITY_PERCENT,
            collectibles: COLLECTIBLES_PER_MAZE,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            preserve_collectibles: false,
        }
    }
}

impl MazeRules {
    /// Walls for a level: `level * walls_per_level`, capped by the density limit
    pub fn wall_count(&self, size: usize, level: u32) -> usize {
        let by_level = (level as usize).saturating_mul(self.walls_per_level);
        let by_density = size
            .checked_mul(size)
            .and_then(|cells| cells.checked_mul(self.wall_density_percent))
            .map_or(usize::MAX, |scaled| scaled / 100);
        by_level.min(by_density)
    }
}

/// Build a maze of edge length `size` for `level`.
///
/// Fails with [`Error::MazeTooLarge`] above [`MAX_MAZE_SIZE`], and with
/// [`Error::MazeTooSmall`] when start and end would coincide or there are
/// not enough free cells for the walls and collectibles.
pub fn generate<R: Rng + ?Sized>(
    size: usize,
    level: u32,
    rules: &MazeRules,
    rng: &mut R,
) -> Result<Maze> {
    if size > MAX_MAZE_SIZE {
        return Err(Error::MazeTooLarge {
            size,
            max: MAX_MAZE_SIZE,
        });
    }

    let walls = rules.wall_count(size, level);
    let required = walls.saturating_add(rules.collectibles);
    let available = (size * size).saturating_sub(2);
    if size < MIN_MAZE_SIZE || required > available {
        return Err(Error::MazeTooSmall {
            size,
            required,
            available,
        });
    }

    let mut maze = Maze::new(size);

    for _ in 0..walls {
        let at = pick_free_cell(&maze, rules.max_placement_attempts, rng);
        maze.set(at, Cell::Wall);
    }
    for _ in 0..rules.collectibles {
        let at = pick_free_cell(&maze, rules.max_placement_attempts, rng);
        maze.set(at, Cell::Collectible);
    }

    let reach = repair(&mut maze, rng, rules.preserve_collectibles);

    maze.set(maze.start(), Cell::Start);
    maze.set(maze.end(), Cell::End);

    log::debug!(
        "Generated {}x{} maze for level {}: walls={}, collectibles={}, reached={}",
        size,
        size,
        level,
        walls,
        maze.count(Cell::Collectible),
        reach.visited_count()
    );
    if !end_reachable(&maze) {
        log::debug!("Level {} maze has its end walled off", level);
    }

    Ok(maze)
}

/// Uniformly random `Path` cell that is neither start nor end.
///
/// Rejection sampling (row, then column) for up to `max_attempts` draws,
/// then a uniform pick from the remaining candidates. Callers guarantee at
/// least one candidate exists.
fn pick_free_cell<R: Rng + ?Sized>(maze: &Maze, max_attempts: u32, rng: &mut R) -> Coord {
    let size = maze.size();
    let is_free = |at: Coord| !maze.is_terminal(at) && maze.get(at) == Some(Cell::Path);

    for _ in 0..max_attempts {
        let at = Coord::new(rng.random_range(0..size), rng.random_range(0..size));
        if is_free(at) {
            return at;
        }
    }

    let candidates: Vec<Coord> = maze.coords().filter(|&at| is_free(at)).collect();
    log::debug!(
        "Placement fell back to candidate scan ({} free cells)",
        candidates.len()
    );
    match candidates.len() {
        0 => maze.start(),
        n => candidates[rng.random_range(0..n)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_wall_count_formula() {
        let rules = MazeRules::default();
        assert_eq!(rules.wall_count(6, 1), 2);
        assert_eq!(rules.wall_count(6, 3), 6);
        // Capped by the 20% rule: floor(36 * 0.2) = 7
        assert_eq!(rules.wall_count(6, 10), 7);
        assert_eq!(rules.wall_count(10, 100), 20);
    }

    #[test]
    fn test_level_one_has_two_walls() {
        for seed in 0..50 {
            let maze = generate(6, 1, &MazeRules::default(), &mut rng(seed)).unwrap();
            assert_eq!(maze.count(Cell::Wall), 2, "seed {seed}");
        }
    }

    #[test]
    fn test_level_ten_capped_at_seven_walls() {
        for seed in 0..50 {
            let maze = generate(6, 10, &MazeRules::default(), &mut rng(seed)).unwrap();
            assert_eq!(maze.count(Cell::Wall), 7, "seed {seed}");
        }
    }

    #[test]
    fn test_start_and_end_fixed() {
        let maze = generate(8, 4, &MazeRules::default(), &mut rng(42)).unwrap();
        assert_eq!(maze.positions(Cell::Start), vec![Coord::new(0, 0)]);
        assert_eq!(maze.positions(Cell::End), vec![Coord::new(7, 7)]);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let rules = MazeRules::default();
        let a = generate(7, 5, &rules, &mut rng(1234)).unwrap();
        let b = generate(7, 5, &rules, &mut rng(1234)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_cell_maze_rejected() {
        let err = generate(1, 1, &MazeRules::default(), &mut rng(0)).unwrap_err();
        assert!(matches!(err, Error::MazeTooSmall { size: 1, .. }));

        let err = generate(0, 1, &MazeRules::default(), &mut rng(0)).unwrap_err();
        assert!(matches!(err, Error::MazeTooSmall { size: 0, .. }));
    }

    #[test]
    fn test_oversized_maze_rejected_without_overflow() {
        let rules = MazeRules::default();
        assert_eq!(rules.wall_count(usize::MAX, 1), 2);
        // Density cap overflows to "no cap", leaving the per-level count
        assert_eq!(rules.wall_count(5_000_000_000, u32::MAX), u32::MAX as usize * 2);

        let err = generate(5_000_000_000, 1, &rules, &mut rng(0)).unwrap_err();
        assert!(matches!(
            err,
            Error::MazeTooLarge {
                size: 5_000_000_000,
                max: MAX_MAZE_SIZE
            }
        ));

        let maze = generate(MAX_MAZE_SIZE, 1, &rules, &mut rng(0)).unwrap();
        assert_eq!(maze.size(), MAX_MAZE_SIZE);
    }

    #[test]
    fn test_huge_collectible_count_rejected() {
        let rules = MazeRules {
            collectibles: usize::MAX,
            ..MazeRules::default()
        };
        let err = generate(6, 1, &rules, &mut rng(0)).unwrap_err();
        assert!(matches!(err, Error::MazeTooSmall { required: usize::MAX, .. }));
    }

    #[test]
    fn test_two_by_two_maze() {
        // No room for walls (floor(4 * 0.2) = 0), one collectible
        let maze = generate(2, 5, &MazeRules::default(), &mut rng(8)).unwrap();
        assert_eq!(maze.count(Cell::Wall), 0);
        assert_eq!(maze.count(Cell::Start), 1);
        assert_eq!(maze.count(Cell::End), 1);
    }

    #[test]
    fn test_overfull_rules_rejected() {
        let rules = MazeRules {
            walls_per_level: 10,
            wall_density_percent: 100,
            ..MazeRules::default()
        };
        // 9 cells, 7 free, asks for 9 walls + 1 collectible
        let err = generate(3, 1, &rules, &mut rng(0)).unwrap_err();
        assert!(matches!(
            err,
            Error::MazeTooSmall {
                size: 3,
                required: 10,
                available: 7
            }
        ));
    }

    #[test]
    fn test_fallback_scan_fills_exactly() {
        // Every free cell gets a wall or the collectible; zero attempts
        // forces the candidate scan for every placement
        let rules = MazeRules {
            walls_per_level: 6,
            wall_density_percent: 100,
            max_placement_attempts: 0,
            ..MazeRules::default()
        };
        let maze = generate(3, 1, &rules, &mut rng(4)).unwrap();
        assert_eq!(maze.count(Cell::Wall), 6);
        // The collectible is erased if it sits next to the start
        assert_eq!(maze.count(Cell::Path) + maze.count(Cell::Collectible), 1);
        assert_eq!(maze.count(Cell::Start), 1);
        assert_eq!(maze.count(Cell::End), 1);
    }

    #[test]
    fn test_preserved_collectible_survives() {
        let rules = MazeRules {
            preserve_collectibles: true,
            ..MazeRules::default()
        };
        for seed in 0..20 {
            let maze = generate(6, 1, &rules, &mut rng(seed)).unwrap();
            assert_eq!(maze.count(Cell::Collectible), 1, "seed {seed}");
        }
    }

    #[test]
    fn test_default_rules_usually_erase_collectible() {
        // The repair pass overwrites any collectible it reaches. With two walls
        // on a 6x6 grid the collectible is almost always reachable.
        let erased = (0..100)
            .filter(|&seed| {
                let maze = generate(6, 1, &MazeRules::default(), &mut rng(seed)).unwrap();
                maze.count(Cell::Collectible) == 0
            })
            .count();
        assert!(erased >= 90, "only {erased}/100 erased");
    }

    #[test]
    fn test_end_reachability_at_density_cap() {
        // The repair pass does not guarantee the end is reachable. At the 20%
        // cap roughly nine mazes in ten still connect start and end, and a
        // few in every batch do not.
        let rules = MazeRules::default();
        let mut disconnected = 0;
        for size in [6, 10, 16] {
            let connected = (0..200)
                .filter(|&seed| {
                    let maze = generate(size, 1000, &rules, &mut rng(seed)).unwrap();
                    end_reachable(&maze)
                })
                .count();
            assert!(connected >= 140, "size {size}: {connected}/200 connected");
            disconnected += 200 - connected;
        }
        assert!(
            (10..=180).contains(&disconnected),
            "{disconnected}/600 disconnected"
        );
    }

    proptest! {
        #[test]
        fn prop_generated_maze_invariants(size in 6usize..14, level in 1u32..60, seed in any::<u64>()) {
            let rules = MazeRules::default();
            let maze = generate(size, level, &rules, &mut rng(seed)).unwrap();
            let last = size - 1;

            prop_assert_eq!(maze.positions(Cell::Start), vec![Coord::new(0, 0)]);
            prop_assert_eq!(maze.positions(Cell::End), vec![Coord::new(last, last)]);

            let walls = maze.count(Cell::Wall);
            prop_assert_eq!(walls, rules.wall_count(size, level));
            prop_assert!(walls <= size * size / 5);
            prop_assert!(walls <= level as usize * 2);
            prop_assert!(maze.count(Cell::Collectible) <= 1);
        }
    }
}
