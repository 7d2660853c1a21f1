//! The generational loop.
//!
//! # Algorithm Overview
//!
//! Every generation:
//!
//! 1. **Evaluate Fitness** - each genome is scored by the
//!    [`FitnessFunction`], with a per-genome game seed drawn from the
//!    algorithm's generator
//! 2. **Record Statistics** - per-generation summary plus all-time aggregates
//! 3. **Elitism** - the `elitism` fittest genomes are copied unchanged, best first
//! 4. **Elite Crossover** - `reproduction_elitist` children of two elites drawn
//!    with replacement
//! 5. **General Crossover** - `reproduction - reproduction_elitist` children of
//!    two genomes drawn uniformly from the whole population
//! 6. **Mutation** - applied to crossover children only
//! 7. **Random Fill** - fresh N(0, 1) genomes up to the population size
//!
//! # Parallelization
//!
//! With [`GeneticParams::parallel`] set, genomes are evaluated on scoped
//! threads. Game seeds are drawn before any thread starts, so a seeded run
//! produces the same statistics either way.
//!
//! # Interruption
//!
//! The interrupt flag is polled between games. An interrupted generation is
//! dropped entirely: statistics keep only completed generations and the
//! population is left as it was before the generation started.

use std::{
    panic,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use rand::{Rng, SeedableRng as _};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::{
    fitness::FitnessFunction,
    genome::Genome,
    params::{GeneticParams, GeneticParamsError},
    statistics::TrainingStatistics,
};

#[derive(Debug)]
pub struct GeneticAlgorithm<F> {
    params: GeneticParams,
    fitness: F,
    rng: Pcg32,
    noise: Normal<f64>,
    population: Vec<Genome>,
    statistics: TrainingStatistics,
}

impl<F> GeneticAlgorithm<F>
where
    F: FitnessFunction,
{
    /// Validates `params` against `fitness` and draws a random population.
    pub fn new(params: GeneticParams, fitness: F) -> Result<Self, GeneticParamsError> {
        let mut ga = Self::unpopulated(params, fitness)?;
        ga.population = (0..ga.params.population_size)
            .map(|_| Genome::random(&mut ga.rng, ga.params.genes_count))
            .collect();
        Ok(ga)
    }

    /// Starts from a caller-provided population, for example one saved by an
    /// earlier run.
    pub fn with_population(
        params: GeneticParams,
        fitness: F,
        population: Vec<Genome>,
    ) -> Result<Self, GeneticParamsError> {
        let mut ga = Self::unpopulated(params, fitness)?;
        if population.len() != ga.params.population_size {
            return Err(GeneticParamsError::PopulationMismatch {
                expected: ga.params.population_size,
                actual: population.len(),
            });
        }
        if let Some(genome) = population
            .iter()
            .find(|g| g.len() != ga.params.genes_count)
        {
            return Err(GeneticParamsError::GenesMismatch {
                expected: ga.params.genes_count,
                actual: genome.len(),
            });
        }
        ga.population = population;
        Ok(ga)
    }

    /// Continues the history of an earlier run. Generation numbering and the
    /// all-time aggregates pick up where `statistics` left off.
    #[must_use]
    pub fn with_statistics(self, statistics: TrainingStatistics) -> Self {
        Self { statistics, ..self }
    }

    fn unpopulated(params: GeneticParams, fitness: F) -> Result<Self, GeneticParamsError> {
        params.validate()?;
        if params.genes_count != fitness.genes_count() {
            return Err(GeneticParamsError::GenesMismatch {
                expected: fitness.genes_count(),
                actual: params.genes_count,
            });
        }
        let noise = Normal::new(0.0, params.mutation_sigma).map_err(|_| {
            GeneticParamsError::MutationSigma {
                sigma: params.mutation_sigma,
            }
        })?;
        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            params,
            fitness,
            rng: Pcg32::seed_from_u64(seed),
            noise,
            population: vec![],
            statistics: TrainingStatistics::new(),
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    #[must_use]
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// The population the next generation will evaluate.
    #[must_use]
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    #[must_use]
    pub fn statistics(&self) -> &TrainingStatistics {
        &self.statistics
    }

    #[must_use]
    pub fn into_statistics(self) -> TrainingStatistics {
        self.statistics
    }

    /// Runs up to `generations` generations and returns the statistics of
    /// every generation completed so far, including earlier calls.
    ///
    /// Stops early, without recording the in-flight generation, once
    /// `interrupt` is raised.
    pub fn train(&mut self, generations: usize, interrupt: &AtomicBool) -> &TrainingStatistics {
        for _ in 0..generations {
            let generation = self.statistics.generations().len();
            let Some(fitness) = self.evaluate(interrupt) else {
                tracing::warn!(
                    "Training interrupted during generation {generation}; the generation is discarded"
                );
                break;
            };

            if let Some(stats) = self.statistics.record(&self.population, &fitness) {
                tracing::info!(
                    "Generation {}: mean={:.3}, std={:.3}, min={:.3}, max={:.3}, best={:?}",
                    stats.generation,
                    stats.mean,
                    stats.std_dev,
                    stats.min,
                    stats.max,
                    stats.max_genome
                );
            }
            self.population = self.breed(&fitness);
        }
        &self.statistics
    }

    /// Scores the current population, or `None` if interrupted.
    fn evaluate(&mut self, interrupt: &AtomicBool) -> Option<Vec<f64>> {
        let seeds = self
            .population
            .iter()
            .map(|_| self.rng.random())
            .collect::<Vec<u64>>();
        let fitness = &self.fitness;

        if !self.params.parallel {
            return self
                .population
                .iter()
                .zip(&seeds)
                .map(|(genome, &seed)| evaluate_genome(fitness, genome, seed, interrupt))
                .collect();
        }

        thread::scope(|s| {
            let handles = self
                .population
                .iter()
                .zip(&seeds)
                .map(|(genome, &seed)| {
                    s.spawn(move || evaluate_genome(fitness, genome, seed, interrupt))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Builds the next population from the current one and its fitness.
    fn breed(&mut self, fitness: &[f64]) -> Vec<Genome> {
        let GeneticParams {
            population_size,
            elitism,
            reproduction_elitist,
            mutation_rate,
            genes_count,
            ..
        } = self.params;

        let mut ranked = (0..self.population.len()).collect::<Vec<_>>();
        ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
        let elites = ranked[..elitism]
            .iter()
            .map(|&i| self.population[i].clone())
            .collect::<Vec<_>>();

        let mut next = Vec::with_capacity(population_size);
        next.extend(elites.iter().cloned());

        for _ in 0..reproduction_elitist {
            let mut child = pick(&mut self.rng, &elites).crossover(pick(&mut self.rng, &elites));
            child.mutate(&mut self.rng, mutation_rate, &self.noise);
            next.push(child);
        }
        for _ in 0..self.params.general_reproduction() {
            let mut child = pick(&mut self.rng, &self.population)
                .crossover(pick(&mut self.rng, &self.population));
            child.mutate(&mut self.rng, mutation_rate, &self.noise);
            next.push(child);
        }
        while next.len() < population_size {
            next.push(Genome::random(&mut self.rng, genes_count));
        }
        next
    }
}

fn evaluate_genome<F>(fitness: &F, genome: &Genome, seed: u64, interrupt: &AtomicBool) -> Option<f64>
where
    F: FitnessFunction + ?Sized,
{
    if interrupt.load(Ordering::Relaxed) {
        return None;
    }
    let value = fitness.evaluate(genome, seed, interrupt)?;
    tracing::debug!("Genome {genome:?} (seed {seed}) => {value:.3}");
    Some(value)
}

/// Draws uniformly from a non-empty pool.
fn pick<'a, R>(rng: &mut R, pool: &'a [Genome]) -> &'a Genome
where
    R: Rng + ?Sized,
{
    &pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    /// Fitness equal to the sum of the genes.
    #[derive(Debug)]
    struct GeneSum;

    impl FitnessFunction for GeneSum {
        fn genes_count(&self) -> usize {
            4
        }

        fn evaluate(&self, genome: &Genome, _seed: u64, _interrupt: &AtomicBool) -> Option<f64> {
            Some(genome.genes().iter().sum())
        }
    }

    /// Behaves like an interrupt arriving after `limit` evaluations.
    #[derive(Debug)]
    struct StopAfter {
        calls: AtomicUsize,
        limit: usize,
    }

    impl FitnessFunction for StopAfter {
        fn genes_count(&self) -> usize {
            4
        }

        fn evaluate(&self, genome: &Genome, _seed: u64, _interrupt: &AtomicBool) -> Option<f64> {
            let n = self.calls.fetch_add(1, Ordering::Relaxed);
            (n < self.limit).then(|| genome.genes().iter().sum())
        }
    }

    fn params(seed: u64) -> GeneticParams {
        GeneticParams {
            seed: Some(seed),
            ..GeneticParams::default()
        }
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let params = GeneticParams {
            population_size: 20,
            elitism: 5,
            reproduction: 5,
            reproduction_elitist: 5,
            mutation_rate: 0.0,
            ..params(7)
        };
        let mut ga = GeneticAlgorithm::new(params, GeneSum).unwrap();
        let mut before = ga.population().to_vec();
        before.sort_by(|a, b| {
            let (a, b) = (a.genes().iter().sum::<f64>(), b.genes().iter().sum::<f64>());
            b.total_cmp(&a)
        });

        ga.train(1, &AtomicBool::new(false));
        assert_eq!(ga.population().len(), 20);
        assert_eq!(&ga.population()[..5], &before[..5]);

        // elite children combine halves of elite genomes
        for child in &ga.population()[5..10] {
            let head = &child.genes()[..2];
            let tail = &child.genes()[2..];
            assert!(before[..5].iter().any(|e| &e.genes()[..2] == head));
            assert!(before[..5].iter().any(|e| &e.genes()[2..] == tail));
        }
    }

    #[test]
    fn test_all_time_extremes_are_monotonic() {
        let mut ga = GeneticAlgorithm::new(params(3), GeneSum).unwrap();
        let mut last_max = f64::NEG_INFINITY;
        let mut last_min = f64::INFINITY;
        for _ in 0..10 {
            let stats = ga.train(1, &AtomicBool::new(false));
            let (max, _) = stats.all_time().max().unwrap();
            let (min, _) = stats.all_time().min().unwrap();
            assert!(max >= last_max && min <= last_min);
            last_max = max;
            last_min = min;
        }
        assert_eq!(ga.statistics().generations().len(), 10);
    }

    #[test]
    fn test_elitism_never_loses_best() {
        let mut ga = GeneticAlgorithm::new(params(11), GeneSum).unwrap();
        let stats = ga.train(15, &AtomicBool::new(false));
        let maxima = stats
            .generations()
            .iter()
            .map(|g| g.max)
            .collect::<Vec<_>>();
        assert!(maxima.is_sorted());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GeneticAlgorithm::new(params(5), GeneSum).unwrap();
        let mut b = GeneticAlgorithm::new(params(5), GeneSum).unwrap();
        let interrupt = AtomicBool::new(false);
        assert_eq!(a.train(4, &interrupt), b.train(4, &interrupt));
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        use std::sync::Arc;

        use blockfall_engine::{GameConfig, GameRules};

        use crate::fitness::LineClearFitness;

        let rules = GameRules::new(GameConfig::default()).unwrap();
        let params = GeneticParams {
            population_size: 4,
            elitism: 1,
            reproduction: 2,
            reproduction_elitist: 1,
            ..params(9)
        };
        let run = |parallel| {
            let fitness = LineClearFitness::new(Arc::clone(&rules), 2, 15).unwrap();
            let mut ga = GeneticAlgorithm::new(
                GeneticParams {
                    parallel,
                    ..params.clone()
                },
                fitness,
            )
            .unwrap();
            ga.train(2, &AtomicBool::new(false));
            ga.into_statistics()
        };
        assert_eq!(run(false), run(true));
    }

    #[test]
    fn test_interrupt_keeps_completed_generations() {
        let params = GeneticParams {
            population_size: 4,
            elitism: 1,
            reproduction: 2,
            reproduction_elitist: 1,
            ..params(1)
        };
        let fitness = StopAfter {
            calls: AtomicUsize::new(0),
            limit: 10,
        };
        let mut ga = GeneticAlgorithm::new(params, fitness).unwrap();
        let stats = ga.train(5, &AtomicBool::new(false)).clone();
        assert_eq!(stats.generations().len(), 2);
        assert_eq!(stats.all_time().count(), 8);

        // the population is the one the interrupted generation started from
        let population = ga.population().to_vec();
        ga.train(1, &AtomicBool::new(false));
        assert_eq!(ga.population(), &population[..]);
    }

    #[test]
    fn test_raised_interrupt_runs_nothing() {
        let mut ga = GeneticAlgorithm::new(params(2), GeneSum).unwrap();
        let stats = ga.train(3, &AtomicBool::new(true));
        assert!(stats.generations().is_empty());
        assert_eq!(stats.all_time().count(), 0);
    }

    #[test]
    fn test_construction_errors() {
        let wrong_genes = GeneticParams {
            genes_count: 3,
            ..params(0)
        };
        assert_eq!(
            GeneticAlgorithm::new(wrong_genes, GeneSum).unwrap_err(),
            GeneticParamsError::GenesMismatch {
                expected: 4,
                actual: 3
            }
        );

        let short = vec![Genome::from(vec![0.0; 4]); 3];
        assert_eq!(
            GeneticAlgorithm::with_population(params(0), GeneSum, short).unwrap_err(),
            GeneticParamsError::PopulationMismatch {
                expected: 20,
                actual: 3
            }
        );

        let mut ragged = vec![Genome::from(vec![0.0; 4]); 20];
        ragged[7] = Genome::from(vec![0.0; 2]);
        assert_eq!(
            GeneticAlgorithm::with_population(params(0), GeneSum, ragged).unwrap_err(),
            GeneticParamsError::GenesMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_resume_from_population() {
        let population = vec![Genome::from(vec![1.0, 1.0, 1.0, 1.0]); 20];
        let mut ga = GeneticAlgorithm::with_population(params(4), GeneSum, population).unwrap();
        let stats = ga.train(1, &AtomicBool::new(false));
        assert_eq!(stats.generations()[0].mean, 4.0);
        assert_eq!(stats.generations()[0].std_dev, 0.0);
    }

    #[test]
    fn test_resume_continues_statistics() {
        let mut first = GeneticAlgorithm::new(params(3), GeneSum).unwrap();
        first.train(5, &AtomicBool::new(false));
        let before = first.statistics().clone();
        let (before_max, _) = before.all_time().max().unwrap();
        let (before_min, _) = before.all_time().min().unwrap();

        let mut resumed =
            GeneticAlgorithm::with_population(params(8), GeneSum, first.population().to_vec())
                .unwrap()
                .with_statistics(before);
        let stats = resumed.train(3, &AtomicBool::new(false));

        assert_eq!(stats.all_time().count(), 8 * 20);
        let numbers = stats
            .generations()
            .iter()
            .map(|g| g.generation)
            .collect::<Vec<_>>();
        assert_eq!(numbers, (0..8).collect::<Vec<_>>());
        let (max, _) = stats.all_time().max().unwrap();
        let (min, _) = stats.all_time().min().unwrap();
        assert!(max >= before_max);
        assert!(min <= before_min);
        assert_eq!(&stats.generations()[..5], first.statistics().generations());
    }
}
