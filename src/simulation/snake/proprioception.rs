//! Proprioception sense - the snake's awareness of its own heading.

use ndarray::Array1;

use super::Snake;
use super::sense::Sense;
use crate::simulation::params::Params;

/// Outputs the current velocity components `(x, y)`.
pub struct Proprioception;

impl Proprioception {
    /// Creates a new proprioception sense.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Proprioception {
    fn default() -> Self {
        Self::new()
    }
}

impl Sense for Proprioception {
    fn sense(&self, snake: &Snake, _params: &Params) -> Array1<f32> {
        Array1::from_vec(vec![snake.velocity.x as f32, snake.velocity.y as f32])
    }

    fn input_size(&self, _params: &Params) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "Proprioception"
    }
}
