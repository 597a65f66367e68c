//! Abstract sense trait for snake perception.
//!
//! Senses read a snake's surroundings and convert them into neural network
//! inputs for its brain.

use ndarray::Array1;

use super::Snake;
use crate::simulation::params::Params;

/// Trait for different sensory modalities a snake can use.
///
/// Each sense processes the snake's private board and returns a vector of
/// activations that will be fed as inputs to the snake's brain. Senses must
/// be `Sync` because snakes are advanced in parallel.
pub trait Sense: Sync {
    /// Process sensory information and return neural network inputs.
    ///
    /// # Arguments
    ///
    /// * `snake` - The snake doing the sensing
    /// * `params` - Simulation parameters
    ///
    /// # Returns
    ///
    /// A 1D array of exactly [`Sense::input_size`] activations.
    fn sense(&self, snake: &Snake, params: &Params) -> Array1<f32>;

    /// Returns the number of neural network inputs this sense produces.
    fn input_size(&self, params: &Params) -> usize;

    /// Returns a human-readable name for this sense.
    fn name(&self) -> &str;
}
