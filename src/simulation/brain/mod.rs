//! Feed-forward neural network brains and their genetic operators.
//!
//! A network is an input pass-through layer followed by dense layers; the
//! last dense layer is the decision layer and squashes its outputs into
//! `(0, 1)`.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod activation;
pub mod genetic;
pub mod layer;

pub use activation::{Activation, ActivationKind};
pub use layer::{Layer, LayerKind};

use super::error::ConfigError;

/// Activation of the decision layer.
pub const DECISION_ACTIVATION: ActivationKind = ActivationKind::Sigmoid;

/// A fixed-depth multi-layer perceptron.
///
/// Used as the "brain" that steers a snake. Cloning is a deep copy: no two
/// networks ever share weight or bias storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralNetwork {
    /// Ordered layers from input to decision.
    layers: Vec<Layer>,
}

impl NeuralNetwork {
    /// Creates a randomly initialized network.
    ///
    /// Builds the input layer, one dense layer per entry of `hidden` using
    /// `activation`, and a sigmoid decision layer of `outputs` neurons.
    pub fn create<R: Rng + ?Sized>(
        inputs: usize,
        hidden: &[usize],
        outputs: usize,
        activation: ActivationKind,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if inputs == 0 || outputs == 0 || hidden.contains(&0) {
            return Err(ConfigError::InvalidParam("layer sizes must be positive"));
        }

        let mut layers = Vec::with_capacity(hidden.len() + 2);
        layers.push(Layer::input(inputs));

        let mut next_inputs = inputs;
        for &neurons in hidden {
            layers.push(Layer::new_random(next_inputs, neurons, activation, rng));
            next_inputs = neurons;
        }
        layers.push(Layer::new_random(
            next_inputs,
            outputs,
            DECISION_ACTIVATION,
            rng,
        ));

        Ok(Self { layers })
    }

    /// Creates a network from `[inputs, hidden.., outputs]` sizes.
    pub fn from_sizes<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: ActivationKind,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        match layer_sizes {
            [inputs, hidden @ .., outputs] => {
                Self::create(*inputs, hidden, *outputs, activation, rng)
            }
            _ => Err(ConfigError::EmptyNetwork),
        }
    }

    /// Wraps existing layers after checking the shape chain.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, ConfigError> {
        let network = Self { layers };
        network.validate()?;
        Ok(network)
    }

    /// Checks every structural invariant.
    ///
    /// The first layer must be the only input layer, every layer's storage
    /// must match its declared size, and each layer must read exactly what
    /// the previous one emits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(first) = self.layers.first() else {
            return Err(ConfigError::EmptyNetwork);
        };
        if first.kind != LayerKind::Input || self.layers.len() < 2 {
            return Err(ConfigError::EmptyNetwork);
        }

        for (index, layer) in self.layers.iter().enumerate() {
            if !layer.is_consistent() || (index > 0 && layer.kind == LayerKind::Input) {
                return Err(ConfigError::CorruptLayer { index });
            }
        }

        for (index, pair) in self.layers.windows(2).enumerate() {
            if pair[1].inputs != pair[0].neurons {
                return Err(ConfigError::BrokenChain {
                    index: index + 1,
                    expected: pair[0].neurons,
                    actual: pair[1].inputs,
                });
            }
        }

        Ok(())
    }

    /// Runs a forward pass through all layers.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, ConfigError> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Runs a forward pass and keeps every layer's output, input layer first.
    pub fn forward_trace(&self, inputs: &Array1<f32>) -> Result<Vec<Array1<f32>>, ConfigError> {
        let mut trace: Vec<Array1<f32>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let output = layer.forward(trace.last().unwrap_or(inputs))?;
            trace.push(output);
        }
        Ok(trace)
    }

    /// Mutates all layers in place. See [`genetic::gaussian_mutation`].
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, scale: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.mutate(rate, scale, rng);
        }
    }

    /// Creates two children by layer-wise simulated binary crossover.
    ///
    /// Both parents must have identical layer shapes and activations.
    pub fn crossover<R: Rng + ?Sized>(
        mother: &NeuralNetwork,
        father: &NeuralNetwork,
        rng: &mut R,
    ) -> Result<(Self, Self), ConfigError> {
        mother.check_same_shape(father)?;

        let (first, second): (Vec<Layer>, Vec<Layer>) = mother
            .layers
            .iter()
            .zip(&father.layers)
            .map(|(m, f)| Layer::crossover(m, f, rng))
            .unzip();

        Ok((Self { layers: first }, Self { layers: second }))
    }

    /// Fails unless both networks have the same per-layer shapes and activations.
    pub fn check_same_shape(&self, other: &NeuralNetwork) -> Result<(), ConfigError> {
        if self.layers.len() != other.layers.len() {
            return Err(ConfigError::DepthMismatch {
                left: self.layers.len(),
                right: other.layers.len(),
            });
        }
        for (index, (a, b)) in self.layers.iter().zip(&other.layers).enumerate() {
            if a.shape() != b.shape() || a.kind != b.kind {
                return Err(ConfigError::ShapeMismatch {
                    index,
                    left: a.shape(),
                    right: b.shape(),
                });
            }
            if a.activation != b.activation {
                return Err(ConfigError::ActivationMismatch {
                    index,
                    left: a.activation,
                    right: b.activation,
                });
            }
        }
        Ok(())
    }

    /// Independent deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `(inputs, neurons)` per layer.
    pub fn shape(&self) -> Vec<(usize, usize)> {
        self.layers.iter().map(Layer::shape).collect()
    }

    /// `[inputs, dense neurons..]`, comparable to a configured layer list.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.neurons).collect()
    }

    /// Declared input size.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    /// Declared output size.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.neurons)
    }

    /// Ordered layers from input to decision.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}
