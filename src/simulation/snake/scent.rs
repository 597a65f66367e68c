//! Scent sense - which way the food lies relative to the head.

use ndarray::Array1;

use super::Snake;
use super::sense::Sense;
use crate::simulation::params::Params;

/// Binary food-direction flags.
///
/// Outputs, in order: food above, below, left of, right of the head.
/// Food on the same row or column sets neither flag of that axis.
pub struct Scent;

impl Scent {
    /// Creates a new scent sense.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Scent {
    fn default() -> Self {
        Self::new()
    }
}

impl Sense for Scent {
    fn sense(&self, snake: &Snake, _params: &Params) -> Array1<f32> {
        let offset = snake.food.pos - snake.position;
        Array1::from_vec(vec![
            f32::from(offset.y < 0),
            f32::from(offset.y > 0),
            f32::from(offset.x < 0),
            f32::from(offset.x > 0),
        ])
    }

    fn input_size(&self, _params: &Params) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "Scent"
    }
}
