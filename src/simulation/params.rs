use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::ActivationKind;
use super::error::{ConfigError, PersistenceError};
use super::grid::Grid;
use super::snake::ACTION_COUNT;

/// Which compass headings the vision rays follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compass {
    /// Up, down, left and right.
    Four,
    /// The four cardinals plus the diagonals.
    Eight,
}

/// Simulation parameters that control population behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of snakes per generation.
    pub snake_count: usize,
    /// Grid columns.
    pub grid_width: i32,
    /// Grid rows.
    pub grid_height: i32,
    /// Neural network layer dimensions: inputs, hidden layers, outputs.
    pub layer_sizes: Vec<usize>,
    /// Activation used by hidden layers.
    pub hidden_activation: ActivationKind,
    /// Vision ray headings.
    pub compass: Compass,
    /// How many cells a vision ray scans.
    pub scan_distance: i32,
    /// Ticks a fresh snake may go without eating.
    pub initial_hunger: i32,
    /// Hunger budget restored by each meal.
    pub hunger_refill: i32,
    /// A direction output must exceed this to be acted upon.
    pub action_threshold: f32,
    /// Number of top snakes kept as parents.
    pub breeding_pool_size: usize,
    /// Per-element mutation probability.
    pub mutation_rate: f32,
    /// Scale of the Gaussian mutation noise.
    pub mutation_scale: f32,
    /// Shrink the mutation scale as snakes approach filling the grid.
    pub anneal_mutation: bool,
    /// Lower bound for the annealed mutation scale.
    pub min_mutation_scale: f32,
    /// Cells sampled when relocating food before declaring the grid full.
    pub food_relocation_attempts: usize,
    /// Seed for reproducible runs. Drawn at random when absent.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            snake_count: 500,
            grid_width: 50,
            grid_height: 50,
            layer_sizes: vec![30, 20, 12, ACTION_COUNT],
            hidden_activation: ActivationKind::Relu,
            compass: Compass::Eight,
            scan_distance: 10,
            initial_hunger: 300,
            hunger_refill: 200,
            action_threshold: 0.7,
            breeding_pool_size: 400,
            mutation_rate: 0.05,
            mutation_scale: 0.2,
            anneal_mutation: true,
            min_mutation_scale: 0.02,
            food_relocation_attempts: 10_000,
            seed: None,
        }
    }
}

impl Params {
    /// Checks every tunable, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Grid::new(self.grid_width, self.grid_height)?;

        if self.snake_count < 2 {
            return Err(ConfigError::InvalidParam(
                "snake_count must leave room for both elite slots",
            ));
        }
        if self.breeding_pool_size == 0 {
            return Err(ConfigError::InvalidParam("breeding_pool_size must be positive"));
        }
        if self.layer_sizes.len() < 2 || self.layer_sizes.contains(&0) {
            return Err(ConfigError::InvalidParam(
                "layer_sizes needs an input and an output size, all positive",
            ));
        }
        let outputs = self.layer_sizes[self.layer_sizes.len() - 1];
        if outputs != ACTION_COUNT {
            return Err(ConfigError::OutputMismatch {
                expected: ACTION_COUNT,
                actual: outputs,
            });
        }
        if self.scan_distance <= 0 {
            return Err(ConfigError::InvalidParam("scan_distance must be positive"));
        }
        if self.initial_hunger < 0 || self.hunger_refill < 0 {
            return Err(ConfigError::InvalidParam("hunger budgets must not be negative"));
        }
        if !(0.0..1.0).contains(&self.action_threshold) {
            return Err(ConfigError::InvalidParam("action_threshold must lie in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidParam("mutation_rate must lie in [0, 1]"));
        }
        if !(self.mutation_scale >= 0.0 && self.mutation_scale.is_finite()) {
            return Err(ConfigError::InvalidParam("mutation_scale must be non-negative"));
        }
        if !(self.min_mutation_scale >= 0.0 && self.min_mutation_scale <= self.mutation_scale) {
            return Err(ConfigError::InvalidParam(
                "min_mutation_scale must lie in [0, mutation_scale]",
            ));
        }
        if self.food_relocation_attempts == 0 {
            return Err(ConfigError::InvalidParam(
                "food_relocation_attempts must be positive",
            ));
        }
        Ok(())
    }

    /// The grid every snake is spawned on.
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }
}
