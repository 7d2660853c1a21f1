use std::{collections::BTreeMap, path::Path};

use blockfall_evaluator::weights::{Feature, Weights};
use blockfall_training::{
    fitness::FitnessFunction,
    genetic::GeneticAlgorithm,
    genome::Genome,
    params::{GeneticParams, GeneticParamsError},
    statistics::TrainingStatistics,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained weight vector together with how it was obtained.
///
/// The final population is kept so a later run can resume from it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f64,
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub population: Vec<Genome>,
    #[serde(default)]
    pub statistics: TrainingStatistics,
}

impl TrainedModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("model", path)
    }

    pub fn weights_by_id(weights: &Weights) -> BTreeMap<String, f64> {
        weights
            .iter()
            .map(|(feature, w)| (feature.id().to_owned(), w))
            .collect()
    }

    /// Continues training from the saved population and statistics.
    pub fn resume<F>(
        self,
        params: GeneticParams,
        fitness: F,
    ) -> Result<GeneticAlgorithm<F>, GeneticParamsError>
    where
        F: FitnessFunction,
    {
        let ga = GeneticAlgorithm::with_population(params, fitness, self.population)?;
        Ok(ga.with_statistics(self.statistics))
    }

    pub fn to_weights(&self) -> anyhow::Result<Weights> {
        if let Some(id) = self.weights.keys().find(|id| Feature::from_id(id).is_none()) {
            anyhow::bail!("Feature ID {id} in model not found");
        }
        let values = Feature::ALL
            .iter()
            .map(|feature| {
                self.weights
                    .get(feature.id())
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("Model has no weight for feature {feature}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Weights::try_from(values.as_slice())?)
    }
}
