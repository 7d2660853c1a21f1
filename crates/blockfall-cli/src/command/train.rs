use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Context;
use blockfall_training::{
    fitness::LineClearFitness, genetic::GeneticAlgorithm, params::GeneticParams,
};
use chrono::Utc;

use crate::{command::GameArg, model::TrainedModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    game: GameArg,
    /// Number of generations to run
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Genomes per generation
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Fittest genomes kept unchanged
    #[arg(long, default_value_t = 5)]
    elitism: usize,
    /// Crossover children per generation
    #[arg(long, default_value_t = 5)]
    reproduction: usize,
    /// Crossover children with two elite parents
    #[arg(long, default_value_t = 5)]
    reproduction_elitist: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = 0.2)]
    mutation_rate: f64,
    /// Standard deviation of the mutation noise
    #[arg(long, default_value_t = 0.1)]
    mutation_sigma: f64,
    /// Games played per genome evaluation
    #[arg(long, default_value_t = LineClearFitness::DEFAULT_GAMES_PER_GENOME)]
    games: usize,
    /// Piece cap per game
    #[arg(long, default_value_t = LineClearFitness::DEFAULT_MAX_PIECES)]
    max_pieces: usize,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Evaluate genomes on multiple threads
    #[arg(long)]
    parallel: bool,
    /// Continue from the population saved in a model file
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Name stored in the model file
    #[arg(long, default_value = "line-clear")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        game,
        generations,
        population,
        elitism,
        reproduction,
        reproduction_elitist,
        mutation_rate,
        mutation_sigma,
        games,
        max_pieces,
        seed,
        parallel,
        resume,
        name,
        output,
    } = arg;

    let rules = game.rules()?;
    let fitness = LineClearFitness::new(rules, *games, *max_pieces)?;
    let params = GeneticParams {
        population_size: *population,
        elitism: *elitism,
        reproduction: *reproduction,
        reproduction_elitist: *reproduction_elitist,
        mutation_rate: *mutation_rate,
        mutation_sigma: *mutation_sigma,
        genes_count: blockfall_evaluator::weights::FEATURE_COUNT,
        seed: *seed,
        parallel: *parallel,
    };

    let mut ga = match resume {
        Some(path) => {
            let model = TrainedModel::open(path)?;
            eprintln!(
                "Resuming from {} ({} genomes, {} generations)",
                path.display(),
                model.population.len(),
                model.statistics.generations().len()
            );
            model
                .resume(params, fitness)
                .with_context(|| format!("Cannot resume from {}", path.display()))?
        }
        None => GeneticAlgorithm::new(params, fitness).context("Invalid training parameters")?,
    };

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = Arc::clone(&interrupt);
        ctrlc::set_handler(move || {
            eprintln!("\nCtrl-C received, stopping after the current game...");
            interrupt.store(true, Ordering::Relaxed);
        })
        .context("Failed to set Ctrl-C handler")?;
    }

    eprintln!(
        "Training for {generations} generations: population {population}, {games} games x {max_pieces} pieces per genome"
    );
    ga.train(*generations, &interrupt);

    let stats = ga.statistics();
    let Some((final_fitness, best)) = stats.best() else {
        anyhow::bail!("Training stopped before the first generation completed");
    };
    let best_weights = best
        .to_weights()
        .context("Best genome does not match the feature count")?;

    eprintln!("Generations:");
    for g in stats.generations() {
        eprintln!(
            "  {:3}: mean {:7.3}  std {:7.3}  min {:7.3}  max {:7.3}",
            g.generation, g.mean, g.std_dev, g.min, g.max
        );
    }
    eprintln!("All-time:");
    if let (Some(mean), Some(std_dev)) = (stats.all_time().mean(), stats.all_time().std_dev()) {
        eprintln!("  Evaluations: {}", stats.all_time().count());
        eprintln!("  Mean:        {mean:.3}");
        eprintln!("  Std:         {std_dev:.3}");
    }
    eprintln!("  Best:        {final_fitness:.3} => {best:?}");

    let model = TrainedModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness,
        weights: TrainedModel::weights_by_id(&best_weights),
        population: ga.population().to_vec(),
        statistics: stats.clone(),
    };
    util::save_json(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Weights: {:?}", best_weights);

    Ok(())
}
