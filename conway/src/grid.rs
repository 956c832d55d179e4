// grid.rs - Grid type and the generation rule for Conway's Game of Life
//
// Edges are bounded: cells outside the grid never count as live neighbours.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::error::{Result, SimulationError};
use crate::patterns::Pattern;

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Rectangular matrix of cells, stored row-major in a single owned buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All cells dead.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Each cell is alive independently with probability `density`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Self {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        Self {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| rng.random_bool(density)).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.index_of(row, col).map(|index| self.cells[index])
    }

    /// Cells of one row, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.cells[start..start + self.cols])
        } else {
            None
        }
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..self.rows).filter_map(move |row| self.row(row))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Flips one cell and returns its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool> {
        let index = self
            .index_of(row, col)
            .ok_or(SimulationError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })?;
        self.cells[index] = !self.cells[index];
        Ok(self.cells[index])
    }

    /// Sets the pattern's cells alive with its top-left corner at `origin`.
    /// Cells falling outside the grid are dropped; returns how many were placed.
    pub fn stamp(&mut self, pattern: &Pattern, origin: (usize, usize)) -> usize {
        let mut placed = 0;
        for &(row, col) in pattern.cells {
            let index = match (origin.0.checked_add(row), origin.1.checked_add(col)) {
                (Some(r), Some(c)) => self.index_of(r, c),
                _ => None,
            };
            if let Some(index) = index {
                self.cells[index] = true;
                placed += 1;
            }
        }
        placed
    }

    /// Origin that centres `pattern`, or pins it to the top-left edge when it is too big.
    pub fn centered_origin(&self, pattern: &Pattern) -> (usize, usize) {
        (
            self.rows.saturating_sub(pattern.height()) / 2,
            self.cols.saturating_sub(pattern.width()) / 2,
        )
    }

    /// Live cells among the up to 8 in-bounds neighbours of (row, col).
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&(dr, dc)| {
                match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
                    (Some(r), Some(c)) => self.get(r, c).unwrap_or(false),
                    _ => false,
                }
            })
            .count() as u8
    }

    /// Computes the following generation into a new grid. `self` is only read.
    pub fn next_generation(&self) -> Grid {
        let mut next = Grid::empty(self.rows, self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let alive = self[(row, col)];
                next[(row, col)] = match self.live_neighbors(row, col) {
                    n if !(2..=3).contains(&n) => false, // Isolation or overcrowding
                    3 if !alive => true,                 // Birth
                    _ => alive,                          // Unchanged
                };
            }
        }
        next
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = bool;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        let index = self
            .index_of(row, col)
            .unwrap_or_else(|| panic!("Index ({}, {}) out of bounds", row, col));
        &self.cells[index]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let index = self
            .index_of(row, col)
            .unwrap_or_else(|| panic!("Index_mut ({}, {}) out of bounds", row, col));
        &mut self.cells[index]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            let line: String = row.iter().map(|&alive| if alive { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
