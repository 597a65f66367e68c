//! Activation functions applied after each dense layer.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// An elementwise squashing or rectifying function.
///
/// Layers only ever call [`Activation::forward`], so adding a function means
/// implementing this trait and giving it an [`ActivationKind`] tag.
pub trait Activation: Sync {
    /// Applies the function to a pre-activation vector.
    fn forward(&self, z: Array1<f32>) -> Array1<f32>;

    /// Human-readable name.
    fn name(&self) -> &'static str;
}

/// Passes values through unchanged.
pub struct Identity;

impl Activation for Identity {
    fn forward(&self, z: Array1<f32>) -> Array1<f32> {
        z
    }

    fn name(&self) -> &'static str {
        "Identity"
    }
}

/// `max(0, z)`.
pub struct Relu;

impl Activation for Relu {
    fn forward(&self, mut z: Array1<f32>) -> Array1<f32> {
        z.mapv_inplace(|v| v.max(0.0));
        z
    }

    fn name(&self) -> &'static str {
        "ReLU"
    }
}

/// Logistic function, strictly inside `(0, 1)`.
pub struct Sigmoid;

impl Sigmoid {
    // Beyond this magnitude an f32 logistic rounds to exactly 0 or 1.
    const CLAMP: f32 = 15.0;
}

impl Activation for Sigmoid {
    fn forward(&self, mut z: Array1<f32>) -> Array1<f32> {
        z.mapv_inplace(|v| {
            let v = v.clamp(-Self::CLAMP, Self::CLAMP);
            1.0 / (1.0 + (-v).exp())
        });
        z
    }

    fn name(&self) -> &'static str {
        "Sigmoid"
    }
}

/// Hyperbolic tangent.
pub struct Tanh;

impl Activation for Tanh {
    fn forward(&self, mut z: Array1<f32>) -> Array1<f32> {
        // In-place tanh for better cache locality
        z.mapv_inplace(f32::tanh);
        z
    }

    fn name(&self) -> &'static str {
        "Tanh"
    }
}

/// Serializable tag naming an [`Activation`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationKind {
    /// See [`Identity`].
    Identity,
    /// See [`Relu`].
    Relu,
    /// See [`Sigmoid`].
    Sigmoid,
    /// See [`Tanh`].
    Tanh,
}

impl ActivationKind {
    /// Resolves the tag to its implementation.
    pub fn function(self) -> &'static dyn Activation {
        match self {
            ActivationKind::Identity => &Identity,
            ActivationKind::Relu => &Relu,
            ActivationKind::Sigmoid => &Sigmoid,
            ActivationKind::Tanh => &Tanh,
        }
    }

    /// Shorthand for `self.function().forward(z)`.
    #[inline]
    pub fn forward(self, z: Array1<f32>) -> Array1<f32> {
        self.function().forward(z)
    }
}
