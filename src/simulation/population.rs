//! Generational orchestration of a snake cohort.
//!
//! The population owns every snake and drives them in lockstep:
//! - Parallel snake updates using rayon
//! - Leader tracking for display
//! - Generation transitions: ranking, elitism, breeding
//! - Snapshot export and import

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::brain::NeuralNetwork;
use super::error::{ConfigError, PersistenceError, Result};
use super::evolution::{self, BreedingPool};
use super::grid::Grid;
use super::history::{GenerationObserver, GenerationRecord};
use super::params::Params;
use super::render::{RenderFrame, RenderSnake};
use super::snake::{Perception, Snake};
use super::snapshot::{PopulationSnapshot, SnakeState};

/// A cohort of snakes evolving across generations.
///
/// The cohort size is fixed at [`Params::snake_count`]. When the last snake
/// dies the population ranks the cohort, records its statistics and replaces
/// it wholesale with a bred successor.
pub struct Population {
    params: Params,
    perception: Perception,
    grid: Grid,
    snakes: Vec<Snake>,
    generation: u32,
    best_fitness: f64,
    best_length: usize,
    all_time_best: NeuralNetwork,
    history: Vec<GenerationRecord>,
    leader: usize,
    generation_started: DateTime<Utc>,
    rng: ChaCha8Rng,
    observers: Vec<Box<dyn GenerationObserver>>,
}

impl Population {
    /// Creates a random first generation with the default senses.
    pub fn new(params: Params) -> Result<Self> {
        Self::with_perception(params, Perception::default())
    }

    /// Creates a random first generation that perceives through `perception`.
    ///
    /// Fails if the parameters are invalid or the senses do not produce
    /// exactly as many values as the networks read.
    pub fn with_perception(params: Params, perception: Perception) -> Result<Self> {
        params.validate()?;
        let grid = params.grid()?;

        let sensors = perception.total_input_size(&params);
        let network = params.layer_sizes[0];
        if sensors != network {
            return Err(ConfigError::SensorMismatch { sensors, network }.into());
        }

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        debug!(
            seed,
            snakes = params.snake_count,
            width = grid.width(),
            height = grid.height(),
            "creating population"
        );

        let mut snakes = Vec::with_capacity(params.snake_count);
        for _ in 0..params.snake_count {
            let brain =
                NeuralNetwork::from_sizes(&params.layer_sizes, params.hidden_activation, &mut rng)?;
            snakes.push(Snake::spawn(grid, brain, &params, rng.random()));
        }
        let all_time_best = snakes[0].brain.copy();

        Ok(Self {
            params,
            perception,
            grid,
            snakes,
            generation: 1,
            best_fitness: 0.0,
            best_length: 1,
            all_time_best,
            history: Vec::new(),
            leader: 0,
            generation_started: Utc::now(),
            rng,
            observers: Vec::new(),
        })
    }

    /// Advances every live snake by one step.
    ///
    /// Once no snake is left alive the generation transition runs in the same
    /// call and its record is returned.
    pub fn tick(&mut self) -> Result<Option<GenerationRecord>> {
        let perception = &self.perception;
        let params = &self.params;
        self.snakes
            .par_iter_mut()
            .filter(|snake| snake.is_alive())
            .try_for_each(|snake| snake.step(perception, params))?;

        if let Some(longest) = self.snakes.iter().map(|snake| snake.length).max() {
            self.best_length = self.best_length.max(longest);
        }
        self.update_leader();

        if self.live_count() == 0 {
            return self.transition().map(Some);
        }
        Ok(None)
    }

    /// Ends the current generation and breeds the next one.
    ///
    /// Snakes still alive are killed first. The cohort is ranked by fitness,
    /// the all-time best is ratcheted, the top of the ranking becomes the
    /// breeding pool and the replacement cohort is spawned. Observers are
    /// notified after the new cohort is in place.
    pub fn transition(&mut self) -> Result<GenerationRecord> {
        for snake in &mut self.snakes {
            snake.kill();
        }

        self.snakes.sort_by(|a, b| {
            let a = a.fitness().unwrap_or_default();
            let b = b.fitness().unwrap_or_default();
            b.total_cmp(&a)
        });

        let count = self.snakes.len() as f64;
        let top_fitness = self
            .snakes
            .first()
            .and_then(Snake::fitness)
            .unwrap_or_default();
        let avg_fitness = self
            .snakes
            .iter()
            .filter_map(Snake::fitness)
            .sum::<f64>()
            / count;
        let top_length = self.snakes.iter().map(|s| s.length).max().unwrap_or(1);
        let avg_length = self.snakes.iter().map(|s| s.length as f64).sum::<f64>() / count;

        if top_fitness > self.best_fitness {
            self.best_fitness = top_fitness;
            self.all_time_best = self.snakes[0].brain.copy();
            info!(
                generation = self.generation,
                fitness = top_fitness,
                length = self.snakes[0].length,
                "new all-time best"
            );
        }

        let elapsed = Utc::now() - self.generation_started;
        let record = GenerationRecord {
            generation: self.generation,
            top_fitness,
            avg_fitness,
            top_length,
            avg_length,
            elapsed_seconds: elapsed.num_milliseconds() as f64 / 1000.0,
        };
        self.history.push(record.clone());

        let scale = evolution::mutation_scale(&self.params, avg_length, self.grid.cell_count());
        let brains = self.next_brains(scale)?;
        self.snakes = brains
            .into_iter()
            .map(|brain| Snake::spawn(self.grid, brain, &self.params, self.rng.random()))
            .collect();

        self.generation += 1;
        self.leader = 0;
        self.generation_started = Utc::now();

        info!(
            generation = record.generation,
            top_fitness = record.top_fitness,
            avg_fitness = record.avg_fitness,
            top_length = record.top_length,
            avg_length = record.avg_length,
            elapsed = record.elapsed_seconds,
            mutation_scale = scale,
            "generation complete"
        );

        for observer in &mut self.observers {
            observer.on_generation(&record);
        }

        Ok(record)
    }

    /// Brains for the next cohort: the two elites, then bred children.
    ///
    /// Expects `self.snakes` ranked best first.
    fn next_brains(&mut self, scale: f32) -> Result<Vec<NeuralNetwork>> {
        let size = self.params.snake_count;
        let mut brains = Vec::with_capacity(size);
        brains.push(self.snakes[0].brain.copy());
        brains.push(self.all_time_best.copy());

        let pool = BreedingPool::new(&self.snakes, self.params.breeding_pool_size);
        let children = pool.breed(
            size.saturating_sub(brains.len()),
            self.params.mutation_rate,
            scale,
            &mut self.rng,
        )?;
        brains.extend(children);
        brains.truncate(size);

        Ok(brains)
    }

    /// Keeps the highlighted snake pointing at a live, long snake.
    ///
    /// A dead leader is replaced by the longest live snake; a live leader is
    /// only replaced by a strictly longer one.
    fn update_leader(&mut self) {
        let current = self
            .snakes
            .get(self.leader)
            .filter(|snake| snake.is_alive())
            .map(|snake| snake.length);

        let longest = self
            .snakes
            .iter()
            .enumerate()
            .filter(|(_, snake)| snake.is_alive())
            .fold(None, |best: Option<(usize, usize)>, (index, snake)| match best {
                Some((_, length)) if length >= snake.length => best,
                _ => Some((index, snake.length)),
            });

        match (current, longest) {
            (None, Some((index, _))) => self.leader = index,
            (Some(length), Some((index, longest))) if longest > length => self.leader = index,
            _ => {}
        }
    }

    /// Registers an observer called after every generation transition.
    pub fn subscribe(&mut self, observer: Box<dyn GenerationObserver>) {
        self.observers.push(observer);
    }

    /// Number of snakes still alive.
    pub fn live_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.is_alive()).count()
    }

    /// The current cohort.
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    /// Mutable access to the current cohort, e.g. to kill snakes from outside.
    pub fn snakes_mut(&mut self) -> &mut [Snake] {
        &mut self.snakes
    }

    /// One record per completed generation, oldest first.
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best fitness any snake has reached.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Longest snake seen so far.
    pub fn best_length(&self) -> usize {
        self.best_length
    }

    /// Brain that reached [`Population::best_fitness`].
    pub fn all_time_best(&self) -> &NeuralNetwork {
        &self.all_time_best
    }

    /// Index of the highlighted snake.
    pub fn leader(&self) -> usize {
        self.leader
    }

    /// Parameters the population was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The grid every snake lives on.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Senses shared by every snake.
    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    /// What a renderer needs for the current tick.
    pub fn render_frame(&self) -> RenderFrame {
        let snakes = self
            .snakes
            .iter()
            .enumerate()
            .filter(|(_, snake)| snake.is_alive())
            .map(|(index, snake)| RenderSnake {
                index,
                position: snake.position,
                body: snake.body.iter().copied().collect(),
                food: snake.food.pos,
                alive: snake.is_alive(),
            })
            .collect();

        RenderFrame {
            snakes,
            leader: self.leader,
            live: self.live_count(),
            total: self.snakes.len(),
            best_fitness: self.best_fitness,
            generation: self.generation,
            best_length: self.best_length,
        }
    }

    /// Captures the full population state.
    pub fn export(&self) -> PopulationSnapshot {
        debug!(generation = self.generation, "exporting population snapshot");
        PopulationSnapshot {
            snakes: self.snakes.iter().map(SnakeState::from).collect(),
            history: self.history.clone(),
            best_length: self.best_length,
            best_fitness: self.best_fitness,
            generation: self.generation,
            all_time_best: self.all_time_best.copy(),
            leader: self.leader,
            generation_started: self.generation_started,
        }
    }

    /// Replaces the whole population state with `snapshot`.
    ///
    /// The snapshot is validated first; on failure nothing changes.
    pub fn import(&mut self, snapshot: PopulationSnapshot) -> Result<()> {
        if let Err(err) = snapshot.validate(&self.params, &self.grid) {
            warn!(%err, "rejected population snapshot");
            return Err(err.into());
        }

        let grid = self.grid;
        let rng = &mut self.rng;
        self.snakes = snapshot
            .snakes
            .into_iter()
            .map(|state| state.into_snake(grid, rng.random()))
            .collect();
        self.history = snapshot.history;
        self.best_length = snapshot.best_length;
        self.best_fitness = snapshot.best_fitness;
        self.generation = snapshot.generation;
        self.all_time_best = snapshot.all_time_best;
        self.leader = snapshot.leader;
        self.generation_started = snapshot.generation_started;

        debug!(
            generation = self.generation,
            live = self.live_count(),
            "imported population snapshot"
        );
        Ok(())
    }

    /// Saves the population to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        self.export().save_to_file(path)
    }

    /// Replaces the population with one saved by [`Population::save_to_file`].
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = PopulationSnapshot::load_from_file(path)?;
        self.import(snapshot)
    }
}
