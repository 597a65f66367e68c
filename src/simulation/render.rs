//! Read-only views handed to a drawing collaborator once per tick.

use serde::Serialize;

use super::vector::Vector;

/// What a renderer needs to draw one snake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnake {
    /// Index in the population.
    pub index: usize,
    /// Head cell.
    pub position: Vector,
    /// Body cells, oldest first.
    pub body: Vec<Vector>,
    /// Food cell.
    pub food: Vector,
    /// Whether the snake is still moving.
    pub alive: bool,
}

/// Everything drawn for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Live snakes only.
    pub snakes: Vec<RenderSnake>,
    /// Index of the snake to highlight.
    pub leader: usize,
    /// Number of live snakes.
    pub live: usize,
    /// Cohort size.
    pub total: usize,
    /// Best fitness ever reached.
    pub best_fitness: f64,
    /// Current generation number.
    pub generation: u32,
    /// Longest snake ever seen.
    pub best_length: usize,
}
