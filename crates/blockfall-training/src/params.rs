use serde::{Deserialize, Serialize};

/// Parameters of the generational loop.
///
/// Each generation is built from, in order: the `elitism` fittest genomes,
/// `reproduction_elitist` children of elite parents, `reproduction -
/// reproduction_elitist` children of parents drawn from the whole population,
/// and fresh random genomes filling the remaining slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticParams {
    /// Genomes per generation. Default `20`.
    pub population_size: usize,
    /// Fittest genomes carried over unchanged. Default `5`.
    pub elitism: usize,
    /// Crossover children per generation. Default `5`.
    pub reproduction: usize,
    /// How many of the `reproduction` children have two elite parents. Default `5`.
    pub reproduction_elitist: usize,
    /// Per-gene mutation probability for children, in `[0, 1]`. Default `0.2`.
    pub mutation_rate: f64,
    /// Standard deviation of the mutation noise. Default `0.1`.
    pub mutation_sigma: f64,
    /// Genome length; must match the fitness function. Default `4`.
    pub genes_count: usize,
    /// Seed for selection, breeding and per-genome game seeds. Default `None`.
    pub seed: Option<u64>,
    /// Evaluate genomes on scoped threads. Default `false`.
    pub parallel: bool,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            elitism: 5,
            reproduction: 5,
            reproduction_elitist: 5,
            mutation_rate: 0.2,
            mutation_sigma: 0.1,
            genes_count: 4,
            seed: None,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GeneticParamsError {
    #[display("population size must be positive")]
    EmptyPopulation,
    #[display("genomes must have at least one gene")]
    EmptyGenome,
    #[display(
        "elitism ({elitism}) plus reproduction ({reproduction}) exceeds population size ({population_size})"
    )]
    Overfull {
        elitism: usize,
        reproduction: usize,
        population_size: usize,
    },
    #[display("elitist reproduction ({elitist}) exceeds reproduction ({reproduction})")]
    ElitistExceedsReproduction { elitist: usize, reproduction: usize },
    #[display("elitist reproduction needs at least one elite")]
    ElitistWithoutElites,
    #[display("mutation rate must be in [0, 1], got {rate}")]
    MutationRate { rate: f64 },
    #[display("mutation sigma must be positive and finite, got {sigma}")]
    MutationSigma { sigma: f64 },
    #[display("genome length {actual} does not match the {expected} genes the fitness function expects")]
    GenesMismatch { expected: usize, actual: usize },
    #[display("initial population has {actual} genomes, expected {expected}")]
    PopulationMismatch { expected: usize, actual: usize },
}

impl GeneticParams {
    /// Number of children bred from parents drawn from the whole population.
    #[must_use]
    pub fn general_reproduction(&self) -> usize {
        self.reproduction.saturating_sub(self.reproduction_elitist)
    }

    /// Number of fresh random genomes added to each generation.
    #[must_use]
    pub fn random_fill(&self) -> usize {
        self.population_size
            .saturating_sub(self.elitism + self.reproduction)
    }

    /// Checks the counts and rates against each other.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_training::params::{GeneticParams, GeneticParamsError};
    ///
    /// assert_eq!(GeneticParams::default().validate(), Ok(()));
    ///
    /// let params = GeneticParams {
    ///     population_size: 8,
    ///     ..GeneticParams::default()
    /// };
    /// assert!(matches!(
    ///     params.validate(),
    ///     Err(GeneticParamsError::Overfull { .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), GeneticParamsError> {
        if self.population_size == 0 {
            return Err(GeneticParamsError::EmptyPopulation);
        }
        if self.genes_count == 0 {
            return Err(GeneticParamsError::EmptyGenome);
        }
        if self.elitism + self.reproduction > self.population_size {
            return Err(GeneticParamsError::Overfull {
                elitism: self.elitism,
                reproduction: self.reproduction,
                population_size: self.population_size,
            });
        }
        if self.reproduction_elitist > self.reproduction {
            return Err(GeneticParamsError::ElitistExceedsReproduction {
                elitist: self.reproduction_elitist,
                reproduction: self.reproduction,
            });
        }
        if self.reproduction_elitist > 0 && self.elitism == 0 {
            return Err(GeneticParamsError::ElitistWithoutElites);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticParamsError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        if !self.mutation_sigma.is_finite() || self.mutation_sigma <= 0.0 {
            return Err(GeneticParamsError::MutationSigma {
                sigma: self.mutation_sigma,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let params = GeneticParams::default();
        assert_eq!(params.general_reproduction(), 0);
        assert_eq!(params.random_fill(), 10);
    }

    #[test]
    fn test_validation_errors() {
        let base = GeneticParams::default();
        let cases = [
            (
                GeneticParams {
                    population_size: 0,
                    elitism: 0,
                    reproduction: 0,
                    reproduction_elitist: 0,
                    ..base.clone()
                },
                GeneticParamsError::EmptyPopulation,
            ),
            (
                GeneticParams {
                    genes_count: 0,
                    ..base.clone()
                },
                GeneticParamsError::EmptyGenome,
            ),
            (
                GeneticParams {
                    reproduction_elitist: 6,
                    ..base.clone()
                },
                GeneticParamsError::ElitistExceedsReproduction {
                    elitist: 6,
                    reproduction: 5,
                },
            ),
            (
                GeneticParams {
                    elitism: 0,
                    ..base.clone()
                },
                GeneticParamsError::ElitistWithoutElites,
            ),
            (
                GeneticParams {
                    mutation_rate: 1.5,
                    ..base.clone()
                },
                GeneticParamsError::MutationRate { rate: 1.5 },
            ),
            (
                GeneticParams {
                    mutation_sigma: 0.0,
                    ..base.clone()
                },
                GeneticParamsError::MutationSigma { sigma: 0.0 },
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(params.validate(), Err(expected));
        }
    }

    #[test]
    fn test_general_reproduction_without_elites() {
        let params = GeneticParams {
            elitism: 0,
            reproduction: 10,
            reproduction_elitist: 0,
            ..GeneticParams::default()
        };
        assert_eq!(params.validate(), Ok(()));
        assert_eq!(params.general_reproduction(), 10);
        assert_eq!(params.random_fill(), 10);
    }
}
