//! Serializable population state for saving and restoring runs.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::brain::NeuralNetwork;
use super::error::PersistenceError;
use super::food::Food;
use super::grid::Grid;
use super::history::GenerationRecord;
use super::params::Params;
use super::snake::{DeathCause, Snake};
use super::vector::Vector;

/// One snake as stored in a snapshot.
///
/// The snake's private food generator is not stored; restored snakes are
/// reseeded from the population generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Head cell.
    pub position: Vector,
    /// Unit heading.
    pub velocity: Vector,
    /// Body cells, oldest first.
    pub body: Vec<Vector>,
    /// Target body length.
    pub length: usize,
    /// Remaining hunger budget.
    pub hunger: i32,
    /// Ticks lived.
    pub age: u32,
    /// Food cell.
    pub food: Vector,
    /// Whether the snake is still moving.
    pub alive: bool,
    /// Present exactly when the snake is dead.
    pub fitness: Option<f64>,
    /// Why the snake died.
    pub death: Option<DeathCause>,
    /// Network that steers the snake.
    pub brain: NeuralNetwork,
}

impl From<&Snake> for SnakeState {
    fn from(snake: &Snake) -> Self {
        Self {
            position: snake.position,
            velocity: snake.velocity,
            body: snake.body.iter().copied().collect(),
            length: snake.length,
            hunger: snake.hunger,
            age: snake.age,
            food: snake.food.pos,
            alive: snake.is_alive(),
            fitness: snake.fitness(),
            death: snake.death_cause(),
            brain: snake.brain.copy(),
        }
    }
}

impl SnakeState {
    /// Rebuilds a live or dead snake on `grid`.
    pub fn into_snake(self, grid: Grid, seed: u64) -> Snake {
        Snake::restore(
            grid,
            self.brain,
            self.position,
            self.velocity,
            self.body.into(),
            self.length,
            self.hunger,
            self.age,
            Food::new(self.food),
            self.fitness,
            self.death,
            seed,
        )
    }

    fn validate(&self, index: usize, params: &Params, grid: &Grid) -> Result<(), PersistenceError> {
        let invalid = |reason: String| PersistenceError::Invalid(format!("snake {index}: {reason}"));

        self.brain
            .validate()
            .map_err(|err| invalid(err.to_string()))?;
        if self.brain.layer_sizes() != params.layer_sizes {
            return Err(invalid(format!(
                "brain layers {:?} do not match {:?}",
                self.brain.layer_sizes(),
                params.layer_sizes
            )));
        }

        let cells = std::iter::once(&self.position)
            .chain(std::iter::once(&self.food))
            .chain(&self.body);
        for &cell in cells {
            if grid.is_out_of_bounds(cell) {
                return Err(invalid(format!("cell {cell} lies outside the grid")));
            }
        }

        if !self.velocity.is_cardinal() {
            return Err(invalid(format!("velocity {} is not a unit heading", self.velocity)));
        }
        if self.length == 0 || self.body.len() > self.length {
            return Err(invalid(format!(
                "body of {} cells does not fit length {}",
                self.body.len(),
                self.length
            )));
        }

        match (self.alive, self.fitness) {
            (true, None) => {}
            (false, Some(fitness)) if fitness.is_finite() && fitness >= 0.0 => {}
            (false, Some(fitness)) => {
                return Err(invalid(format!("fitness {fitness} is not a finite score")));
            }
            (true, Some(_)) => return Err(invalid("live snake carries a fitness".to_owned())),
            (false, None) => return Err(invalid("dead snake has no fitness".to_owned())),
        }
        if self.alive == self.death.is_some() {
            return Err(invalid(format!(
                "alive is {} but death cause is {:?}",
                self.alive, self.death
            )));
        }

        // the head may sit on uneaten food, no other body cell may
        if self.food != self.position && self.body.contains(&self.food) {
            return Err(invalid(format!("food {} lies on the body", self.food)));
        }

        Ok(())
    }
}

/// Everything needed to resume a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// Current cohort, in population order.
    pub snakes: Vec<SnakeState>,
    /// Completed generations, oldest first.
    pub history: Vec<GenerationRecord>,
    /// Longest snake seen so far.
    pub best_length: usize,
    /// Best fitness seen so far.
    pub best_fitness: f64,
    /// Current generation number.
    pub generation: u32,
    /// Brain that reached `best_fitness`.
    pub all_time_best: NeuralNetwork,
    /// Index of the highlighted snake.
    pub leader: usize,
    /// When the current generation started.
    pub generation_started: DateTime<Utc>,
}

impl PopulationSnapshot {
    /// Checks the snapshot against the population it would replace.
    ///
    /// Validation is all-or-nothing: the first inconsistency is reported and
    /// nothing is applied.
    pub fn validate(&self, params: &Params, grid: &Grid) -> Result<(), PersistenceError> {
        if self.generation == 0 {
            return Err(PersistenceError::Invalid(
                "generations are counted from 1".to_owned(),
            ));
        }
        if self.snakes.len() != params.snake_count {
            return Err(PersistenceError::Invalid(format!(
                "expected {} snakes, found {}",
                params.snake_count,
                self.snakes.len()
            )));
        }

        for (index, snake) in self.snakes.iter().enumerate() {
            snake.validate(index, params, grid)?;
        }

        if self.leader >= self.snakes.len() {
            return Err(PersistenceError::Invalid(format!(
                "leader {} is out of range",
                self.leader
            )));
        }
        if !(self.best_fitness.is_finite() && self.best_fitness >= 0.0) {
            return Err(PersistenceError::Invalid(format!(
                "best fitness {} is not a finite score",
                self.best_fitness
            )));
        }

        self.all_time_best
            .validate()
            .map_err(|err| PersistenceError::Invalid(format!("all-time best: {err}")))?;
        if self.all_time_best.layer_sizes() != params.layer_sizes {
            return Err(PersistenceError::Invalid(
                "all-time best brain does not match the configured layers".to_owned(),
            ));
        }

        if let Some(record) = self.history.iter().find(|record| !record.is_finite()) {
            return Err(PersistenceError::Invalid(format!(
                "history record for generation {} holds non-finite values",
                record.generation
            )));
        }

        Ok(())
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a snapshot written by [`PopulationSnapshot::save_to_file`].
    ///
    /// Only checks that the file parses; see [`PopulationSnapshot::validate`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&json)?;
        Ok(snapshot)
    }
}
