//! A single fully connected layer.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::activation::ActivationKind;
use super::genetic;
use crate::simulation::error::ConfigError;

/// Whether a layer computes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    /// Identity pass-through at the front of every network. Holds no
    /// parameters.
    Input,
    /// `activation(input · W + b)`.
    Dense,
}

/// A single layer of a feed-forward network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Pass-through or dense.
    pub kind: LayerKind,
    /// Number of inputs read.
    pub inputs: usize,
    /// Number of outputs produced.
    pub neurons: usize,
    /// Weight matrix (`inputs` × `neurons`). Empty for input layers.
    pub weights: Array2<f32>,
    /// Bias vector (`neurons`). Empty for input layers.
    pub biases: Array1<f32>,
    /// Function applied to the pre-activation.
    pub activation: ActivationKind,
}

impl Layer {
    /// Creates the identity layer for `size` inputs.
    pub fn input(size: usize) -> Self {
        Self {
            kind: LayerKind::Input,
            inputs: size,
            neurons: size,
            weights: Array2::zeros((0, 0)),
            biases: Array1::zeros(0),
            activation: ActivationKind::Identity,
        }
    }

    /// Creates a dense layer with standard-normal weights and zero biases.
    pub fn new_random<R: Rng + ?Sized>(
        inputs: usize,
        neurons: usize,
        activation: ActivationKind,
        rng: &mut R,
    ) -> Self {
        Self {
            kind: LayerKind::Dense,
            inputs,
            neurons,
            weights: Array2::from_shape_fn((inputs, neurons), |_| rng.sample(StandardNormal)),
            biases: Array1::zeros(neurons),
            activation,
        }
    }

    /// Creates a dense layer from explicit parameters.
    pub fn dense(
        weights: Array2<f32>,
        biases: Array1<f32>,
        activation: ActivationKind,
    ) -> Result<Self, ConfigError> {
        let (inputs, neurons) = weights.dim();
        if biases.len() != neurons {
            return Err(ConfigError::CorruptLayer { index: 0 });
        }
        Ok(Self {
            kind: LayerKind::Dense,
            inputs,
            neurons,
            weights,
            biases,
            activation,
        })
    }

    /// `(inputs, neurons)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.inputs, self.neurons)
    }

    /// Whether parameter storage agrees with the declared size.
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            LayerKind::Input => self.inputs == self.neurons,
            LayerKind::Dense => {
                self.weights.dim() == (self.inputs, self.neurons)
                    && self.biases.len() == self.neurons
            }
        }
    }

    /// Performs the forward pass.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, ConfigError> {
        if inputs.len() != self.inputs {
            return Err(ConfigError::InputLength {
                expected: self.inputs,
                actual: inputs.len(),
            });
        }
        match self.kind {
            LayerKind::Input => Ok(inputs.clone()),
            LayerKind::Dense => {
                let mut output = inputs.dot(&self.weights);
                output += &self.biases;
                Ok(self.activation.forward(output))
            }
        }
    }

    /// Applies clipped Gaussian mutation to weights and biases.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, scale: f32, rng: &mut R) {
        if self.kind == LayerKind::Input {
            return;
        }
        genetic::gaussian_mutation(&mut self.weights, rate, scale, rng);
        genetic::gaussian_mutation(&mut self.biases, rate, scale, rng);
    }

    /// Produces two children by SBX over weights and biases.
    ///
    /// The caller checks that both parents share a shape.
    pub fn crossover<R: Rng + ?Sized>(mother: &Layer, father: &Layer, rng: &mut R) -> (Self, Self) {
        if mother.kind == LayerKind::Input {
            return (mother.clone(), mother.clone());
        }

        let eta = genetic::DISTRIBUTION_INDEX;
        let (w1, w2) =
            genetic::simulated_binary_crossover(&mother.weights, &father.weights, eta, rng);
        let (b1, b2) = genetic::simulated_binary_crossover(&mother.biases, &father.biases, eta, rng);

        let child = |weights, biases| Self {
            kind: LayerKind::Dense,
            inputs: mother.inputs,
            neurons: mother.neurons,
            weights,
            biases,
            activation: mother.activation,
        };

        (child(w1, b1), child(w2, b2))
    }
}
