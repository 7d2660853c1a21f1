/// Descriptive statistics summarizing a dataset.
///
/// Variance and standard deviation are population measures (divided by `n`).
/// `argmin`/`argmax` are positions in the original, unsorted input; on ties
/// the first occurrence is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The minimum value in the dataset.
    pub min: f64,
    /// Index of the first minimum in the input order.
    pub argmin: usize,
    /// The maximum value in the dataset.
    pub max: f64,
    /// Index of the first maximum in the input order.
    pub argmax: usize,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median value (upper median for even lengths).
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blockfall_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!((stats.min, stats.argmin), (1.0, 3));
    /// assert_eq!((stats.max, stats.argmax), (5.0, 0));
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let (argmin, min) = values
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, cur| if cur.1 < best.1 { cur } else { best })?;
        let (argmax, max) = values
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })?;

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values;
        sorted.sort_by(f64::total_cmp);
        let median = sorted[sorted.len() / 2];

        Some(Self {
            min,
            argmin,
            max,
            argmax,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}
