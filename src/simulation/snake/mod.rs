//! Snake agents: the per-tick state machine and the senses feeding its brain.

mod perception;
mod proprioception;
mod scent;
mod sense;
mod snake;
mod vision;

pub use snake::*;

pub use perception::Perception;
pub use proprioception::Proprioception;
pub use scent::Scent;
pub use sense::Sense;
pub use vision::Vision;
