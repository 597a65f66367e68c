//! Parent selection and breeding of the next cohort.
//!
//! Parents are drawn from the top of a ranked generation by
//! fitness-proportional (roulette) selection, recombined with simulated
//! binary crossover and mutated.

use rand::Rng;

use super::brain::NeuralNetwork;
use super::error::ConfigError;
use super::params::Params;
use super::snake::Snake;

/// Fitness-proportional draw over `weights`.
///
/// Draws `u ~ U(0, total)` and returns the first index whose running sum
/// exceeds it. Falls back to index 0 when rounding leaves `u` uncovered.
pub fn roulette<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let target = rng.random::<f64>() * total;
    let mut running = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        running += weight;
        if running > target {
            return i;
        }
    }
    0
}

/// Mutation scale for the next cohort.
///
/// With annealing enabled the configured scale shrinks linearly as the
/// average length approaches the grid's capacity, never below
/// `min_mutation_scale`.
pub fn mutation_scale(params: &Params, avg_length: f64, cell_count: usize) -> f32 {
    if !params.anneal_mutation || cell_count == 0 {
        return params.mutation_scale;
    }
    let fill = (avg_length / cell_count as f64).clamp(0.0, 1.0) as f32;
    (params.mutation_scale * (1.0 - fill))
        .max(params.min_mutation_scale)
        .min(params.mutation_scale)
}

/// The top of a dead generation, eligible to parent the next one.
#[derive(Debug)]
pub struct BreedingPool<'a> {
    members: Vec<&'a NeuralNetwork>,
    weights: Vec<f64>,
    total: f64,
}

impl<'a> BreedingPool<'a> {
    /// Keeps the first `size` snakes of `ranked` (sorted best first) and
    /// normalizes their fitness by the top fitness.
    ///
    /// If the top fitness is not positive every member weighs 1.
    pub fn new(ranked: &'a [Snake], size: usize) -> Self {
        let survivors = &ranked[..size.min(ranked.len())];
        let top = survivors
            .first()
            .and_then(Snake::fitness)
            .unwrap_or_default();

        let weights: Vec<f64> = survivors
            .iter()
            .map(|snake| {
                if top > 0.0 && top.is_finite() {
                    snake.fitness().unwrap_or_default() / top
                } else {
                    1.0
                }
            })
            .collect();

        Self {
            members: survivors.iter().map(|snake| &snake.brain).collect(),
            total: weights.iter().sum(),
            weights,
        }
    }

    /// Number of parents.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the pool has no parents.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Normalized fitness per parent, best first.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of normalized fitness.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Picks one parent by roulette selection.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a NeuralNetwork {
        self.members[roulette(&self.weights, self.total, rng)]
    }

    /// Breeds exactly `count` children.
    ///
    /// Children come in pairs: two independently selected parents, SBX
    /// crossover, then independent mutation of each child. The second child
    /// of the last pair is dropped when `count` is odd.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        count: usize,
        rate: f32,
        scale: f32,
        rng: &mut R,
    ) -> Result<Vec<NeuralNetwork>, ConfigError> {
        let mut children = Vec::with_capacity(count);
        if self.is_empty() {
            return Ok(children);
        }

        while children.len() < count {
            let mother = self.select(rng);
            let father = self.select(rng);
            let (mut first, mut second) = NeuralNetwork::crossover(mother, father, rng)?;

            first.mutate(rate, scale, rng);
            children.push(first);

            if children.len() < count {
                second.mutate(rate, scale, rng);
                children.push(second);
            }
        }

        Ok(children)
    }
}
