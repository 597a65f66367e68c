//! Real-valued genetic operators over parameter arrays.
//!
//! Both operators work on any `ndarray` dimension so weights and biases share
//! one implementation.

use ndarray::{Array, Dimension, Zip};
use rand::Rng;
use rand_distr::StandardNormal;

/// Distribution index η for simulated binary crossover. Larger values keep
/// children closer to their parents.
pub const DISTRIBUTION_INDEX: f32 = 5.0;

/// Spread factor β for one SBX draw `u ∈ [0, 1)`.
pub fn sbx_beta(u: f32, eta: f32) -> f32 {
    let exponent = 1.0 / (eta + 1.0);
    if u <= 0.5 {
        (2.0 * u).powf(exponent)
    } else {
        (1.0 / (2.0 * (1.0 - u))).powf(exponent)
    }
}

/// Simulated binary crossover (SBX), one β draw per element.
///
/// `child1 = ½[(1+β)·mother + (1−β)·father]`,
/// `child2 = ½[(1−β)·mother + (1+β)·father]`.
///
/// Callers guarantee `mother` and `father` share a shape.
pub fn simulated_binary_crossover<D, R>(
    mother: &Array<f32, D>,
    father: &Array<f32, D>,
    eta: f32,
    rng: &mut R,
) -> (Array<f32, D>, Array<f32, D>)
where
    D: Dimension,
    R: Rng + ?Sized,
{
    let mut child1 = Array::zeros(mother.raw_dim());
    let mut child2 = Array::zeros(mother.raw_dim());

    Zip::from(&mut child1)
        .and(&mut child2)
        .and(mother)
        .and(father)
        .for_each(|c1, c2, &m, &f| {
            let beta = sbx_beta(rng.random::<f32>(), eta);
            *c1 = 0.5 * ((1.0 + beta) * m + (1.0 - beta) * f);
            *c2 = 0.5 * ((1.0 - beta) * m + (1.0 + beta) * f);
        });

    (child1, child2)
}

/// Gaussian mutation followed by clipping.
///
/// Each element independently receives `N(0, 1) · scale` with probability
/// `rate`; every element is then clipped to `[-1, 1]`.
pub fn gaussian_mutation<D, R>(genes: &mut Array<f32, D>, rate: f32, scale: f32, rng: &mut R)
where
    D: Dimension,
    R: Rng + ?Sized,
{
    genes.mapv_inplace(|gene| {
        let gene = if rng.random::<f32>() < rate {
            let noise: f32 = rng.sample(StandardNormal);
            gene + noise * scale
        } else {
            gene
        };
        gene.clamp(-1.0, 1.0)
    });
}
