//! Genomes and the operators that breed them.
//!
//! A [`Genome`] is a plain vector of genes, one per board feature, read by the
//! search agent as its weight vector.
//!
//! # Operations
//!
//! - **Initialization**: [`Genome::random`] draws every gene from N(0, 1)
//! - **Crossover**: [`Genome::crossover`] splits both parents at the midpoint
//! - **Mutation**: [`Genome::mutate`] adds N(0, σ²) noise to each gene with a
//!   fixed probability
//!
//! Genes are never clipped or normalized, so the sign of a weight is part of
//! what evolves.

use std::fmt;

use blockfall_evaluator::weights::{Weights, WeightsError};
use rand::Rng;
use rand_distr::{Distribution as _, Normal, StandardNormal};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(Vec<f64>);

impl fmt::Debug for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3?}", self.0)
    }
}

impl From<Vec<f64>> for Genome {
    fn from(genes: Vec<f64>) -> Self {
        Self(genes)
    }
}

impl From<Weights> for Genome {
    fn from(weights: Weights) -> Self {
        Self(weights.as_array().to_vec())
    }
}

impl Genome {
    /// Draws `len` genes from the standard normal distribution.
    pub fn random<R>(rng: &mut R, len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self((0..len).map(|_| StandardNormal.sample(rng)).collect())
    }

    #[must_use]
    pub fn genes(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-point crossover at the midpoint.
    ///
    /// The child takes genes `[0, len / 2)` from `self` and the rest from
    /// `other`.
    ///
    /// # Panics
    ///
    /// Panics if the parents have different lengths.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_training::genome::Genome;
    ///
    /// let a = Genome::from(vec![1.0, 2.0, 3.0, 4.0]);
    /// let b = Genome::from(vec![5.0, 6.0, 7.0, 8.0]);
    /// assert_eq!(a.crossover(&b).genes(), &[1.0, 2.0, 7.0, 8.0]);
    /// assert_eq!(b.crossover(&a).genes(), &[5.0, 6.0, 3.0, 4.0]);
    /// ```
    #[must_use]
    pub fn crossover(&self, other: &Self) -> Self {
        assert_eq!(self.len(), other.len(), "parents must have equal length");
        let mid = self.len() / 2;
        let mut genes = Vec::with_capacity(self.len());
        genes.extend_from_slice(&self.0[..mid]);
        genes.extend_from_slice(&other.0[mid..]);
        Self(genes)
    }

    /// Perturbs each gene with probability `rate` by a draw from `noise`.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is outside `[0, 1]`.
    pub fn mutate<R>(&mut self, rng: &mut R, rate: f64, noise: &Normal<f64>)
    where
        R: Rng + ?Sized,
    {
        for gene in &mut self.0 {
            if rng.random_bool(rate) {
                *gene += noise.sample(rng);
            }
        }
    }

    /// Interprets the genes as search-agent weights.
    pub fn to_weights(&self) -> Result<Weights, WeightsError> {
        Weights::try_from(self.genes())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_genome_is_centered() {
        let mut rng = Pcg32::seed_from_u64(0);
        let genome = Genome::random(&mut rng, 10_000);
        assert_eq!(genome.len(), 10_000);
        #[expect(clippy::cast_precision_loss)]
        let mean = genome.genes().iter().sum::<f64>() / genome.len() as f64;
        assert!(mean.abs() < 0.05, "mean = {mean}");
    }

    #[test]
    fn test_crossover_odd_length() {
        let a = Genome::from(vec![1.0, 1.0, 1.0]);
        let b = Genome::from(vec![2.0, 2.0, 2.0]);
        assert_eq!(a.crossover(&b).genes(), &[1.0, 2.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_crossover_length_mismatch() {
        let a = Genome::from(vec![1.0, 1.0]);
        let b = Genome::from(vec![2.0]);
        let _ = a.crossover(&b);
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let noise = Normal::new(0.0, 0.1).unwrap();
        let original = Genome::random(&mut rng, 8);

        let mut unchanged = original.clone();
        unchanged.mutate(&mut rng, 0.0, &noise);
        assert_eq!(unchanged, original);

        let mut changed = original.clone();
        changed.mutate(&mut rng, 1.0, &noise);
        for (a, b) in changed.genes().iter().zip(original.genes()) {
            assert_ne!(a, b);
            assert!((a - b).abs() < 1.0);
        }
    }

    #[test]
    fn test_to_weights() {
        let genome = Genome::from(Weights::default());
        assert_eq!(genome.to_weights(), Ok(Weights::default()));
        assert!(Genome::from(vec![1.0]).to_weights().is_err());
    }

    #[test]
    fn test_serde_is_plain_array() {
        let genome = Genome::from(vec![0.5, -1.0]);
        assert_eq!(serde_json::to_string(&genome).unwrap(), "[0.5,-1.0]");
    }
}
