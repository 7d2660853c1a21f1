//! Feature weights for the linear placement score.
//!
//! A placement is scored as a dot product between a fixed-length feature
//! vector and a [`Weights`] vector:
//!
//! ```text
//! score = w₀·aggregate_height + w₁·cleared_lines + w₂·holes + w₃·bumpiness
//! ```
//!
//! The weight vector is the only channel through which training influences the
//! search agent, so its length always equals [`FEATURE_COUNT`].

use std::{fmt, ops::Index};

use serde::{Deserialize, Serialize};

use crate::board_metrics::BoardMetrics;

/// Number of features in a placement score.
pub const FEATURE_COUNT: usize = 4;

/// A feature of a candidate placement, in weight-vector order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::FromStr,
)]
pub enum Feature {
    AggregateHeight,
    ClearedLines,
    Holes,
    Bumpiness,
}

impl Feature {
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::AggregateHeight,
        Self::ClearedLines,
        Self::Holes,
        Self::Bumpiness,
    ];

    /// Stable identifier used as a key in saved models.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AggregateHeight => "aggregate_height",
            Self::ClearedLines => "cleared_lines",
            Self::Holes => "holes",
            Self::Bumpiness => "bumpiness",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Raw feature values of one candidate placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(metrics: &BoardMetrics, cleared_lines: usize) -> Self {
        Self([
            metrics.aggregate_height as f64,
            cleared_lines as f64,
            metrics.holes as f64,
            metrics.bumpiness as f64,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {} weights, got {len}", FEATURE_COUNT)]
pub struct WeightsError {
    len: usize,
}

/// One coefficient per [`Feature`].
///
/// # Example
///
/// ```
/// use blockfall_evaluator::weights::{Feature, Weights};
///
/// let weights = Weights::try_from(&[1.0, 2.0, 3.0, 4.0][..]).unwrap();
/// assert_eq!(weights[Feature::Holes], 3.0);
/// assert!(Weights::try_from(&[1.0, 2.0][..]).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights([f64; FEATURE_COUNT]);

impl fmt::Debug for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for feature in Feature::ALL {
            map.entry(&feature.id(), &self[feature]);
        }
        map.finish()
    }
}

impl Default for Weights {
    /// Hand-tuned coefficients that play reasonably without training.
    fn default() -> Self {
        Self([-0.5, 0.7, -0.35, -0.18])
    }
}

impl Weights {
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Dot product with a feature vector.
    #[must_use]
    pub fn score(&self, features: &FeatureVector) -> f64 {
        self.0.iter().zip(&features.0).map(|(w, f)| w * f).sum()
    }

    /// Iterates `(feature, weight)` pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(|f| (f, self[f]))
    }
}

impl Index<Feature> for Weights {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl TryFrom<&[f64]> for Weights {
    type Error = WeightsError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let values = <[f64; FEATURE_COUNT]>::try_from(values)
            .map_err(|_| WeightsError { len: values.len() })?;
        Ok(Self(values))
    }
}
