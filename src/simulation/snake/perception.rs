//! Perception system that combines multiple senses into brain inputs.

use ndarray::{Array1, s};

use super::Snake;
use super::sense::Sense;
use crate::simulation::params::Params;

/// Manages multiple senses and combines them into brain inputs.
///
/// The perception system:
/// 1. Queries each sense for its outputs
/// 2. Concatenates all sensory outputs in order
/// 3. Returns a single input vector for the brain
pub struct Perception {
    /// Ordered list of senses that contribute to perception
    senses: Vec<Box<dyn Sense>>,
}

impl Perception {
    /// Creates a new perception system that queries `senses` in order.
    pub fn new(senses: Vec<Box<dyn Sense>>) -> Self {
        Self { senses }
    }

    /// Process all senses and return combined brain inputs.
    pub fn perceive(&self, snake: &Snake, params: &Params) -> Array1<f32> {
        let total_size = self.total_input_size(params);
        let mut combined_inputs = Array1::zeros(total_size);

        let mut offset = 0;
        for sense in &self.senses {
            let sense_size = sense.input_size(params);
            let sense_outputs = sense.sense(snake, params);

            combined_inputs
                .slice_mut(s![offset..offset + sense_size])
                .assign(&sense_outputs);

            offset += sense_size;
        }

        combined_inputs
    }

    /// Returns the total number of brain inputs produced by all senses.
    pub fn total_input_size(&self, params: &Params) -> usize {
        self.senses.iter().map(|s| s.input_size(params)).sum()
    }

    /// Returns a reference to the senses in this perception system.
    pub fn senses(&self) -> &[Box<dyn Sense>] {
        &self.senses
    }
}

impl Default for Perception {
    fn default() -> Self {
        use super::proprioception::Proprioception;
        use super::scent::Scent;
        use super::vision::Vision;

        Self::new(vec![
            Box::new(Vision::new()),
            Box::new(Scent::new()),
            Box::new(Proprioception::new()),
        ])
    }
}
