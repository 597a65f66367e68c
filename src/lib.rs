//! # Snake Evo - Neuroevolution of Snake Agents
//!
//! A population of snakes, each steered by a small feed-forward neural
//! network, evolves through generations of a genetic algorithm.
//!
//! ## Features
//!
//! - Neural network brains (MLP with ReLU hidden layers and a sigmoid decision layer)
//! - Genetic operators: simulated binary crossover and clipped Gaussian mutation
//! - Ray-cast vision, food scent and proprioception
//! - Fitness-proportional selection with elitism
//! - Parallel per-snake updates with rayon
//! - Save/load population snapshots
//!
//! ## Core Modules
//!
//! - [`simulation::snake`] - Snake behavior, senses and fitness
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::population`] - Generational simulation loop
//! - [`simulation::evolution`] - Selection and breeding
//! - [`simulation::snapshot`] - Persistence format

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for snake brains.
    pub mod brain;
    /// Error types.
    pub mod error;
    /// Roulette selection and breeding of new cohorts.
    pub mod evolution;
    /// Food a snake chases.
    pub mod food;
    /// The bounded board.
    pub mod grid;
    /// Generation statistics and observers.
    pub mod history;
    /// Simulation parameters.
    pub mod params;
    /// The generational orchestrator.
    pub mod population;
    /// Read-only views for drawing.
    pub mod render;
    /// Snake behavior, state, and senses.
    pub mod snake;
    /// Population snapshots.
    pub mod snapshot;
    /// Integer grid coordinates.
    pub mod vector;
}
