//! The single food cell each snake chases.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::vector::Vector;

/// No free cell was found within the relocation budget.
///
/// The owning snake treats this as having filled the board.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no free cell found after {attempts} attempts")]
pub struct GridFull {
    /// How many cells were sampled.
    pub attempts: usize,
}

/// A food item on a snake's private grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// Cell the food sits on.
    pub pos: Vector,
}

impl Food {
    /// Creates food at a fixed cell.
    pub fn new(pos: Vector) -> Self {
        Self { pos }
    }

    /// Places new food on a free cell of `grid`.
    pub fn spawn<R, F>(
        grid: &Grid,
        rng: &mut R,
        occupied: F,
        max_attempts: usize,
    ) -> Result<Self, GridFull>
    where
        R: Rng + ?Sized,
        F: Fn(Vector) -> bool,
    {
        let mut food = Self::new(Vector::default());
        food.relocate(grid, rng, occupied, max_attempts)?;
        Ok(food)
    }

    /// Resamples the food position uniformly over `grid` until it lands on a
    /// cell for which `occupied` is false.
    ///
    /// Gives up after `max_attempts` draws, leaving the position unchanged.
    pub fn relocate<R, F>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
        occupied: F,
        max_attempts: usize,
    ) -> Result<(), GridFull>
    where
        R: Rng + ?Sized,
        F: Fn(Vector) -> bool,
    {
        for _ in 0..max_attempts {
            let candidate = grid.random_cell(rng);
            if !occupied(candidate) {
                self.pos = candidate;
                return Ok(());
            }
        }
        Err(GridFull {
            attempts: max_attempts,
        })
    }
}
