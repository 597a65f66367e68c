//! Per-generation statistics and the observers that consume them.

use serde::{Deserialize, Serialize};

/// Summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation the record describes.
    pub generation: u32,
    /// Best fitness in the cohort.
    pub top_fitness: f64,
    /// Mean fitness over the whole cohort.
    pub avg_fitness: f64,
    /// Longest snake in the cohort.
    pub top_length: usize,
    /// Mean length over the whole cohort.
    pub avg_length: f64,
    /// Wall-clock seconds the generation took.
    pub elapsed_seconds: f64,
}

impl GenerationRecord {
    /// Whether every number in the record is finite.
    pub fn is_finite(&self) -> bool {
        self.top_fitness.is_finite()
            && self.avg_fitness.is_finite()
            && self.avg_length.is_finite()
            && self.elapsed_seconds.is_finite()
    }
}

/// Receives a record each time a generation completes.
///
/// Chart and persistence collaborators subscribe through
/// `Population::subscribe` instead of a process-wide hook.
pub trait GenerationObserver: Send {
    /// Called once per transition, after the new cohort is in place.
    fn on_generation(&mut self, record: &GenerationRecord);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationRecord) + Send,
{
    fn on_generation(&mut self, record: &GenerationRecord) {
        self(record);
    }
}
