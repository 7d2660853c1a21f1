use serde::{Deserialize, Serialize};

/// Aggregates over a stream of samples, each tagged with the item it came from.
///
/// Only `count`, `sum`, `sum_squared` and the extreme samples are stored, so the
/// memory use does not grow with the number of samples. Nothing is ever
/// removed: `max` is non-decreasing and `min` is non-increasing over time.
/// On ties the earliest item is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningStats<T> {
    count: usize,
    sum: f64,
    sum_squared: f64,
    min: Option<Extreme<T>>,
    max: Option<Extreme<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Extreme<T> {
    value: f64,
    item: T,
}

impl<T> Default for RunningStats<T> {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_squared: 0.0,
            min: None,
            max: None,
        }
    }
}

impl<T> RunningStats<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample.
    pub fn push(&mut self, value: f64, item: T)
    where
        T: Clone,
    {
        self.count += 1;
        self.sum += value;
        self.sum_squared += value * value;
        if self.min.as_ref().is_none_or(|min| value < min.value) {
            self.min = Some(Extreme {
                value,
                item: item.clone(),
            });
        }
        if self.max.as_ref().is_none_or(|max| value > max.value) {
            self.max = Some(Extreme { value, item });
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    #[must_use]
    pub fn sum_squared(&self) -> f64 {
        self.sum_squared
    }

    #[must_use]
    pub fn min(&self) -> Option<(f64, &T)> {
        self.min.as_ref().map(|e| (e.value, &e.item))
    }

    #[must_use]
    pub fn max(&self) -> Option<(f64, &T)> {
        self.max.as_ref().map(|e| (e.value, &e.item))
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Population variance, `E[x²] - E[x]²`, clamped at zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        Some((self.sum_squared / self.count as f64 - mean * mean).max(0.0))
    }

    #[must_use]
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}
