//! Snake state, movement, collision and fitness.

use std::collections::VecDeque;

use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::perception::Perception;
use crate::simulation::brain::NeuralNetwork;
use crate::simulation::error::ConfigError;
use crate::simulation::food::Food;
use crate::simulation::grid::Grid;
use crate::simulation::params::Params;
use crate::simulation::vector::Vector;

/// Number of decision outputs: up, down, left, right.
pub const ACTION_COUNT: usize = 4;

/// Upper bound on any fitness value.
pub const MAX_FITNESS: f64 = 1e15;

/// Length at which fitness switches from growth to survival emphasis.
const LONG_SNAKE: usize = 10;

/// Why a snake stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Ran into a wall or its own body.
    Collision,
    /// Ran out of hunger budget.
    Starvation,
    /// Filled the grid, or no free cell was left for food. A win.
    GridFull,
    /// Terminated from outside the simulation.
    Killed,
}

/// Fitness of a snake that died at `age` ticks with `length` cells.
///
/// Short snakes are rewarded exponentially for growing; from ten cells on the
/// score rewards survival with incremental growth. Capped at [`MAX_FITNESS`].
pub fn fitness_score(age: u32, length: usize) -> f64 {
    let age = f64::from(age);
    let raw = if length < LONG_SNAKE {
        age * 2f64.powi(length as i32)
    } else {
        age * age * 2f64.powi(LONG_SNAKE as i32) * (length - (LONG_SNAKE - 1)) as f64
    };
    raw.min(MAX_FITNESS)
}

/// A single snake on its own private grid.
///
/// A snake is either alive or dead; its fitness is computed exactly once, on
/// the transition to dead, and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Snake {
    /// Head cell.
    pub position: Vector,
    /// Unit heading.
    pub velocity: Vector,
    /// Occupied cells, oldest first. The newest cell is the head.
    pub body: VecDeque<Vector>,
    /// Target body length.
    pub length: usize,
    /// Ticks left before starving.
    pub hunger: i32,
    /// Ticks lived.
    pub age: u32,
    /// This snake's food.
    pub food: Food,
    /// Network that steers the snake.
    pub brain: NeuralNetwork,
    grid: Grid,
    alive: bool,
    fitness: Option<f64>,
    death: Option<DeathCause>,
    rng: ChaCha8Rng,
}

impl Snake {
    /// Creates a live snake of length 1 at `position`.
    ///
    /// `seed` drives this snake's food placement.
    pub fn new(
        grid: Grid,
        brain: NeuralNetwork,
        position: Vector,
        velocity: Vector,
        food: Food,
        hunger: i32,
        seed: u64,
    ) -> Self {
        Self {
            position,
            velocity,
            body: VecDeque::new(),
            length: 1,
            hunger,
            age: 0,
            food,
            brain,
            grid,
            alive: true,
            fitness: None,
            death: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a fresh snake at a random central cell with a random heading
    /// and food placed away from its head.
    pub fn spawn(grid: Grid, brain: NeuralNetwork, params: &Params, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let position = grid.random_spawn_cell(&mut rng);
        let velocity = Vector::CARDINALS[rng.random_range(0..Vector::CARDINALS.len())];
        // A one-cell grid has no room for food; the snake wins on its first tick.
        let food = Food::spawn(
            &grid,
            &mut rng,
            |cell| cell == position,
            params.food_relocation_attempts,
        )
        .unwrap_or(Food::new(position));

        let mut snake = Self::new(
            grid,
            brain,
            position,
            velocity,
            food,
            params.initial_hunger,
            seed,
        );
        snake.rng = rng;
        snake
    }

    /// Restores a snake from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        grid: Grid,
        brain: NeuralNetwork,
        position: Vector,
        velocity: Vector,
        body: VecDeque<Vector>,
        length: usize,
        hunger: i32,
        age: u32,
        food: Food,
        fitness: Option<f64>,
        death: Option<DeathCause>,
        seed: u64,
    ) -> Self {
        Self {
            position,
            velocity,
            body,
            length,
            hunger,
            age,
            food,
            brain,
            grid,
            alive: fitness.is_none(),
            fitness,
            death,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Advances the snake by one tick.
    ///
    /// Dead snakes are left untouched. Dying is a normal outcome, not an
    /// error; errors only signal a brain that does not fit the senses.
    pub fn step(&mut self, perception: &Perception, params: &Params) -> Result<(), ConfigError> {
        if !self.alive {
            return Ok(());
        }

        self.age += 1;
        self.hunger -= 1;

        if self.length >= self.grid.cell_count() {
            self.die(DeathCause::GridFull);
            return Ok(());
        }

        let ate = self.position == self.food.pos;
        if ate {
            self.eat(params);
            if !self.alive {
                return Ok(());
            }
        }

        let inputs = perception.perceive(self, params);
        let outputs = self.brain.forward(&inputs)?;
        self.steer(&outputs, params.action_threshold);

        let next = self.position + self.velocity;

        if self.collides(next) {
            self.die(DeathCause::Collision);
            return Ok(());
        }
        if self.hunger < 0 {
            self.die(DeathCause::Starvation);
            return Ok(());
        }

        while self.body.len() >= self.length {
            self.body.pop_front();
        }
        self.body.push_back(next);
        self.position = next;

        // fresh food may have landed on the cell just entered
        if ate && self.body.contains(&self.food.pos) {
            self.relocate_food(params);
        }

        Ok(())
    }

    /// Grows by one cell, refills hunger and moves the food to a free cell.
    fn eat(&mut self, params: &Params) {
        self.length += 1;
        self.hunger = params.hunger_refill;
        self.relocate_food(params);
    }

    /// Moves the food off the head and body. No free cell left is a win.
    fn relocate_food(&mut self, params: &Params) {
        let head = self.position;
        let body = &self.body;
        let relocated = self.food.relocate(
            &self.grid,
            &mut self.rng,
            |cell| cell == head || body.contains(&cell),
            params.food_relocation_attempts,
        );
        if relocated.is_err() {
            self.die(DeathCause::GridFull);
        }
    }

    /// Applies the first direction output above `threshold`, checked in
    /// up, down, left, right order. A request to reverse is dropped.
    pub fn steer(&mut self, outputs: &Array1<f32>, threshold: f32) {
        let requested = Vector::CARDINALS
            .iter()
            .zip(outputs.iter())
            .find(|&(_, &activation)| activation > threshold)
            .map(|(&heading, _)| heading);

        match requested {
            Some(heading) if !heading.is_reverse_of(self.velocity) => self.velocity = heading,
            _ => {}
        }
    }

    /// Whether moving the head onto `cell` kills the snake.
    ///
    /// The oldest body cell is ignored when it is vacated by this move.
    pub fn collides(&self, cell: Vector) -> bool {
        if self.grid.is_out_of_bounds(cell) {
            return true;
        }
        let vacated = usize::from(self.body.len() >= self.length);
        self.body.iter().skip(vacated).any(|&segment| segment == cell)
    }

    /// Whether `cell` is covered by the head or the body.
    pub fn occupies(&self, cell: Vector) -> bool {
        cell == self.position || self.body.contains(&cell)
    }

    /// Moves to the dead state and freezes fitness. Only the first call counts.
    pub fn die(&mut self, cause: DeathCause) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.death = Some(cause);
        self.fitness = Some(fitness_score(self.age, self.length));
        trace!(
            ?cause,
            age = self.age,
            length = self.length,
            "snake died"
        );
    }

    /// Kills the snake from outside the simulation.
    pub fn kill(&mut self) {
        self.die(DeathCause::Killed);
    }

    /// Checks if the snake is alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Frozen fitness; `None` while alive.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Why the snake died; `None` while alive.
    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// The grid this snake lives on.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
