// patterns.rs - Named starting patterns, stored as live-cell offsets from their top-left corner

use crate::error::{Result, SimulationError};

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Number of rows spanned by the pattern.
    pub fn height(&self) -> usize {
        self.cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Number of columns spanned by the pattern.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0)
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
    Pattern {
        // Needs 36 columns, so only fits whole on the 30x50 grid
        name: "Gosper Glider Gun",
        cells: &[
            (0, 24),
            (1, 22), (1, 24),
            (2, 12), (2, 13), (2, 20), (2, 21), (2, 34), (2, 35),
            (3, 11), (3, 15), (3, 20), (3, 21), (3, 34), (3, 35),
            (4, 0), (4, 1), (4, 10), (4, 16), (4, 20), (4, 21),
            (5, 0), (5, 1), (5, 10), (5, 14), (5, 16), (5, 17), (5, 22), (5, 24),
            (6, 10), (6, 16), (6, 24),
            (7, 11), (7, 15),
            (8, 12), (8, 13),
        ],
    },
];

/// Looks a pattern up by name, ignoring case.
pub fn find(name: &str) -> Result<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|pattern| pattern.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| SimulationError::UnknownPattern(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = PATTERNS.iter().map(|p| p.name.to_lowercase()).collect();
        assert_eq!(names.len(), PATTERNS.len());
    }

    #[test]
    fn offsets_start_at_the_top_left_corner() {
        for pattern in PATTERNS {
            let min_row = pattern.cells.iter().map(|&(r, _)| r).min().unwrap();
            let min_col = pattern.cells.iter().map(|&(_, c)| c).min().unwrap();
            assert_eq!((min_row, min_col), (0, 0), "{} is not normalized", pattern.name);
        }
    }

    #[test]
    fn find_ignores_case() {
        assert_eq!(find("glider").unwrap().name, "Glider");
        assert_eq!(find(" PULSAR ").unwrap().name, "Pulsar");
        assert!(matches!(find("spaceship"), Err(SimulationError::UnknownPattern(_))));
    }

    #[test]
    fn pulsar_has_period_three() {
        let pulsar = find("Pulsar").unwrap();
        assert_eq!((pulsar.height(), pulsar.width()), (13, 13));

        let mut grid = Grid::empty(17, 17);
        grid.stamp(pulsar, (2, 2));
        let start = grid.clone();

        let one = start.next_generation();
        let two = one.next_generation();
        let three = two.next_generation();
        assert_ne!(one, start);
        assert_ne!(two, start);
        assert_eq!(three, start);
    }

    #[test]
    fn glider_moves_one_cell_diagonally_every_four_generations() {
        let glider = find("Glider").unwrap();
        let mut grid = Grid::empty(10, 10);
        grid.stamp(glider, (1, 1));

        let mut moved = Grid::empty(10, 10);
        moved.stamp(glider, (2, 2));

        let mut current = grid;
        for _ in 0..4 {
            current = current.next_generation();
        }
        assert_eq!(current, moved);
    }

    #[test]
    fn gosper_gun_fits_only_the_wide_grid() {
        let gun = find("Gosper Glider Gun").unwrap();
        assert_eq!((gun.height(), gun.width()), (9, 36));
        assert_eq!(gun.cells.len(), 36);
    }
}
