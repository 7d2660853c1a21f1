//! Statistical utilities for training runs.
//!
//! - [`descriptive`]: summary of one dataset (min/max with their positions,
//!   mean, median, population variance and standard deviation)
//! - [`running`]: aggregates updated one sample at a time and never reset,
//!   keeping the items that produced the extremes
//!
//! # Example
//!
//! ```
//! use blockfall_stats::{descriptive::DescriptiveStats, running::RunningStats};
//!
//! let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
//! assert_eq!(stats.mean, 5.0);
//! assert_eq!(stats.std_dev, 2.0);
//!
//! let mut running = RunningStats::new();
//! running.push(3.0, "a");
//! running.push(1.0, "b");
//! assert_eq!(running.min().map(|(v, item)| (v, *item)), Some((1.0, "b")));
//! ```

pub mod descriptive;
pub mod running;
