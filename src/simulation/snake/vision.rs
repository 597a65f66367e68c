//! Vision sense - rays cast from the head along compass headings.

use ndarray::Array1;

use super::Snake;
use super::sense::Sense;
use crate::simulation::params::{Compass, Params};
use crate::simulation::vector::Vector;

/// Vision sense that scans along fixed compass headings.
///
/// For each heading, the sense outputs:
/// - Distance to the wall, as a fraction of the scan distance (1.0 = not in range)
/// - Distance to the snake's own body, same scale
/// - Whether the food lies on the ray before the wall (1.0) or not (0.0)
pub struct Vision;

impl Vision {
    /// Creates a new vision sense.
    pub fn new() -> Self {
        Self
    }

    /// Headings scanned for the given compass setting.
    pub fn headings(compass: Compass) -> &'static [Vector] {
        match compass {
            Compass::Four => &Vector::CARDINALS,
            Compass::Eight => &Vector::COMPASS,
        }
    }
}

impl Default for Vision {
    fn default() -> Self {
        Self::new()
    }
}

impl Sense for Vision {
    fn sense(&self, snake: &Snake, params: &Params) -> Array1<f32> {
        let headings = Self::headings(params.compass);
        let scan = params.scan_distance;
        let mut vision_outputs = Array1::zeros(headings.len() * 3);

        for (i, &heading) in headings.iter().enumerate() {
            let mut wall = None;
            let mut body = None;
            let mut food = false;

            for step in 1..=scan {
                let cell = snake.position + heading * step;
                let distance = step as f32 / scan as f32;

                if snake.grid().is_out_of_bounds(cell) {
                    wall = Some(distance);
                    break;
                }
                if body.is_none() && snake.body.contains(&cell) {
                    body = Some(distance);
                }
                if cell == snake.food.pos {
                    food = true;
                }
            }

            let base_idx = 3 * i;
            vision_outputs[base_idx] = wall.unwrap_or(1.0);
            vision_outputs[base_idx + 1] = body.unwrap_or(1.0);
            vision_outputs[base_idx + 2] = f32::from(food);
        }

        vision_outputs
    }

    fn input_size(&self, params: &Params) -> usize {
        // wall distance, body distance, food flag per heading
        Self::headings(params.compass).len() * 3
    }

    fn name(&self) -> &'static str {
        "Vision"
    }
}
