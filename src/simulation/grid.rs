//! The bounded lattice a snake lives on.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::vector::Vector;

/// A fixed `width × height` board. Cells outside it are walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Creates a grid, rejecting non-positive dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `pos` lies outside the board.
    pub fn is_out_of_bounds(&self, pos: Vector) -> bool {
        pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height
    }

    /// Draws a cell uniformly over the whole board.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector {
        Vector::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    /// Draws a cell uniformly from the central region, keeping a margin of a
    /// quarter of each dimension to the walls.
    pub fn random_spawn_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector {
        let margin_x = self.width / 4;
        let margin_y = self.height / 4;
        Vector::new(
            rng.random_range(margin_x..self.width - margin_x),
            rng.random_range(margin_y..self.height - margin_y),
        )
    }
}
