//! Evolutionary tuning of the search agent's weights.
//!
//! # How Training Works
//!
//! 1. **Population** - a fixed number of random genomes, one gene per board feature
//! 2. **Evaluation** - each genome drives a [`SearchAgent`] through many capped games
//! 3. **Fitness** - average lines cleared per game
//! 4. **Selection** - the fittest genomes survive unchanged
//! 5. **Reproduction** - midpoint crossover and Gaussian mutation
//! 6. **Repeat** - for a configured number of generations
//!
//! # Architecture
//!
//! ```text
//! GeneticAlgorithm
//!     ↓ evolves
//! Genome (weight vector)
//!     ↓ used by
//! SearchAgent (blockfall-evaluator)
//!     ↓ plays games scored by
//! FitnessFunction
//!     ↓ summarized in
//! TrainingStatistics
//! ```
//!
//! - [`genome`] - genome representation and breeding operators
//! - [`params`] - generation layout and validation
//! - [`fitness`] - the [`FitnessFunction`](fitness::FitnessFunction) trait and
//!   the line-clear fitness
//! - [`statistics`] - per-generation and all-time fitness statistics
//! - [`genetic`] - the generational loop
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//!
//! use blockfall_engine::{GameConfig, GameRules};
//! use blockfall_training::{
//!     fitness::LineClearFitness, genetic::GeneticAlgorithm, params::GeneticParams,
//! };
//!
//! let rules = GameRules::new(GameConfig::default()).unwrap();
//! let fitness = LineClearFitness::new(rules, 1, 10).unwrap();
//! let params = GeneticParams {
//!     population_size: 4,
//!     elitism: 1,
//!     reproduction: 2,
//!     reproduction_elitist: 1,
//!     seed: Some(0),
//!     ..GeneticParams::default()
//! };
//!
//! let mut ga = GeneticAlgorithm::new(params, fitness).unwrap();
//! let stats = ga.train(2, &AtomicBool::new(false));
//! assert_eq!(stats.generations().len(), 2);
//! assert!(stats.best().is_some());
//! ```
//!
//! [`SearchAgent`]: blockfall_evaluator::search_agent::SearchAgent

pub mod fitness;
pub mod genetic;
pub mod genome;
pub mod params;
pub mod statistics;
