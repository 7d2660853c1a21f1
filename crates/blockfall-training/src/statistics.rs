//! Fitness statistics recorded while training.

use blockfall_stats::{descriptive::DescriptiveStats, running::RunningStats};
use serde::{Deserialize, Serialize};

use crate::genome::Genome;

/// Fitness distribution of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub min_genome: Genome,
    pub max_genome: Genome,
}

impl GenerationStats {
    /// Summarizes `fitness`, where `fitness[i]` belongs to `population[i]`.
    ///
    /// Returns `None` for an empty population.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn new(generation: usize, population: &[Genome], fitness: &[f64]) -> Option<Self> {
        assert_eq!(population.len(), fitness.len());
        let stats = DescriptiveStats::new(fitness.iter().copied())?;
        Some(Self {
            generation,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
            min_genome: population[stats.argmin].clone(),
            max_genome: population[stats.argmax].clone(),
        })
    }
}

/// History of a training run.
///
/// `generations` holds one entry per completed generation. `all_time`
/// aggregates every fitness ever measured and is never reset, so its maximum
/// only grows and its minimum only shrinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatistics {
    generations: Vec<GenerationStats>,
    all_time: RunningStats<Genome>,
}

impl TrainingStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed generation and returns its summary.
    pub fn record(
        &mut self,
        population: &[Genome],
        fitness: &[f64],
    ) -> Option<&GenerationStats> {
        let stats = GenerationStats::new(self.generations.len(), population, fitness)?;
        for (genome, &value) in population.iter().zip(fitness) {
            self.all_time.push(value, genome.clone());
        }
        self.generations.push(stats);
        self.generations.last()
    }

    #[must_use]
    pub fn generations(&self) -> &[GenerationStats] {
        &self.generations
    }

    #[must_use]
    pub fn all_time(&self) -> &RunningStats<Genome> {
        &self.all_time
    }

    /// The fittest genome seen so far.
    #[must_use]
    pub fn best(&self) -> Option<(f64, &Genome)> {
        self.all_time.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::cast_precision_loss)]
    fn genomes(n: usize) -> Vec<Genome> {
        (0..n).map(|i| Genome::from(vec![i as f64])).collect()
    }

    #[test]
    fn test_generation_stats() {
        let population = genomes(4);
        let stats = GenerationStats::new(3, &population, &[2.0, 8.0, 4.0, 2.0]).unwrap();
        assert_eq!(stats.generation, 3);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 8.0);
        assert_eq!(stats.min_genome, population[0]);
        assert_eq!(stats.max_genome, population[1]);
        assert!(GenerationStats::new(0, &[], &[]).is_none());
    }

    #[test]
    fn test_all_time_spans_generations() {
        let population = genomes(3);
        let mut stats = TrainingStatistics::new();
        stats.record(&population, &[1.0, 5.0, 3.0]);
        stats.record(&population, &[0.5, 2.0, 4.0]);

        assert_eq!(stats.generations().len(), 2);
        assert_eq!(stats.generations()[1].generation, 1);
        assert_eq!(stats.all_time().count(), 6);
        assert_eq!(stats.all_time().sum(), 15.5);
        assert_eq!(stats.best(), Some((5.0, &population[1])));
        assert_eq!(stats.all_time().min(), Some((0.5, &population[0])));
    }

    #[test]
    fn test_serde() {
        let mut stats = TrainingStatistics::new();
        stats.record(&genomes(2), &[1.0, 2.0]);
        let json = serde_json::to_string(&stats).unwrap();
        let back: TrainingStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
