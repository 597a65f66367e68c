//! Error types for configuration, networks and persistence.

use thiserror::Error;

use super::brain::ActivationKind;

/// Setup errors. These are fatal: nothing is silently coerced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid dimensions must both be positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// Two networks (or layers) that must share a shape do not.
    #[error("layer {index} shape {left:?} does not match {right:?}")]
    ShapeMismatch {
        /// Index of the first mismatching layer.
        index: usize,
        /// `(inputs, neurons)` on the left-hand side.
        left: (usize, usize),
        /// `(inputs, neurons)` on the right-hand side.
        right: (usize, usize),
    },
    /// Two layers that must share an activation do not.
    #[error("layer {index} activation {left:?} does not match {right:?}")]
    ActivationMismatch {
        /// Index of the first mismatching layer.
        index: usize,
        /// Activation on the left-hand side.
        left: ActivationKind,
        /// Activation on the right-hand side.
        right: ActivationKind,
    },
    /// Network depth differs between two networks.
    #[error("networks have {left} and {right} layers")]
    DepthMismatch {
        /// Layer count on the left-hand side.
        left: usize,
        /// Layer count on the right-hand side.
        right: usize,
    },
    /// An input vector of the wrong length reached a layer.
    #[error("expected input of length {expected}, got {actual}")]
    InputLength {
        /// Declared input size.
        expected: usize,
        /// Supplied input size.
        actual: usize,
    },
    /// The senses produce a different number of values than the network reads.
    #[error("senses produce {sensors} inputs but the network expects {network}")]
    SensorMismatch {
        /// Length of the perception vector.
        sensors: usize,
        /// Declared network input size.
        network: usize,
    },
    /// The decision layer has the wrong width.
    #[error("network must output {expected} values, got {actual}")]
    OutputMismatch {
        /// Required number of decision outputs.
        expected: usize,
        /// Declared network output size.
        actual: usize,
    },
    /// Layer `index` does not read the previous layer's output.
    #[error("layer {index} reads {actual} inputs but the previous layer emits {expected}")]
    BrokenChain {
        /// Index of the offending layer.
        index: usize,
        /// Previous layer's neuron count.
        expected: usize,
        /// Offending layer's input count.
        actual: usize,
    },
    /// Weight or bias storage disagrees with the declared layer size.
    #[error("layer {index} parameter storage does not match its declared size")]
    CorruptLayer {
        /// Index of the offending layer.
        index: usize,
    },
    /// A network needs an input layer and at least one dense layer.
    #[error("network needs an input layer followed by at least one dense layer")]
    EmptyNetwork,
    /// A tunable is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
}

/// Snapshot import/export failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot is not valid JSON for the expected structure.
    #[error("snapshot is not well-formed: {0}")]
    Json(#[from] serde_json::Error),
    /// The snapshot parsed but is structurally inconsistent.
    #[error("snapshot rejected: {0}")]
    Invalid(String),
}

/// Any error surfaced by the simulation core.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`PersistenceError`].
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
