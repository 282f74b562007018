//! Weighted shuffle engine — sequential weighted draw without replacement.
//!
//! Each step draws one record from the remaining pool with probability
//! `tickets / remaining_total`, appends it to the output, and removes it from
//! the pool. Two strategies produce identical per-step probabilities:
//!
//! - [`ShuffleStrategy::Cumulative`]: rebuilds the cumulative weight table
//!   after every draw and binary-searches it. O(n²), the reference behavior.
//! - [`ShuffleStrategy::Fenwick`]: keeps weights in a binary indexed tree and
//!   zeroes each drawn slot. O(n log n).
//!
//! A pool whose remaining weights are all zero degenerates to a uniform draw
//! among the remaining records.

pub mod fenwick;
pub mod range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::record::WeightedRecord;

pub use fenwick::{fenwick_shuffle, FenwickTree};
pub use range::shuffle_segment;

/// Errors from shuffle operations.
#[derive(Debug, Error, PartialEq)]
pub enum ShuffleError {
    #[error("invalid range for segment shuffle: start={start}, end={end}, len={len}")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("record {index} has invalid weight {value} (must be finite and non-negative)")]
    InvalidWeight { index: usize, value: f64 },
}

/// Which draw structure to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleStrategy {
    #[default]
    Cumulative,
    Fenwick,
}

impl ShuffleStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ShuffleStrategy::Cumulative => "cumulative",
            ShuffleStrategy::Fenwick => "fenwick",
        }
    }
}

impl std::str::FromStr for ShuffleStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cumulative" => Ok(ShuffleStrategy::Cumulative),
            "fenwick" => Ok(ShuffleStrategy::Fenwick),
            other => Err(format!(
                "unknown shuffle strategy '{other}'. Valid: cumulative, fenwick"
            )),
        }
    }
}

/// Check every weight is finite and non-negative.
pub fn validate_weights<T: WeightedRecord>(records: &[T]) -> Result<(), ShuffleError> {
    for (index, record) in records.iter().enumerate() {
        let value = record.tickets();
        if !value.is_finite() || value < 0.0 {
            return Err(ShuffleError::InvalidWeight { index, value });
        }
    }
    Ok(())
}

/// Shuffle with the chosen strategy. The input slice is left untouched.
pub fn shuffle_with<T, R>(strategy: ShuffleStrategy, records: &[T], rng: &mut R) -> Vec<T>
where
    T: WeightedRecord + Clone,
    R: Rng,
{
    match strategy {
        ShuffleStrategy::Cumulative => weighted_shuffle(records, rng),
        ShuffleStrategy::Fenwick => fenwick_shuffle(records, rng),
    }
}

/// Weighted draw without replacement using a rebuilt cumulative table.
///
/// Works on a private copy of `records`; returns a permutation of it.
pub fn weighted_shuffle<T, R>(records: &[T], rng: &mut R) -> Vec<T>
where
    T: WeightedRecord + Clone,
    R: Rng,
{
    let mut pool: Vec<T> = records.to_vec();
    let mut drawn = Vec::with_capacity(pool.len());

    while !pool.is_empty() {
        let index = match cumulative_table(&pool) {
            Some(table) => select_index(&table, rng.gen::<f64>()),
            None => {
                debug!(remaining = pool.len(), "zero total weight, drawing uniformly");
                rng.gen_range(0..pool.len())
            }
        };
        drawn.push(pool.remove(index));
    }

    drawn
}

/// Running sums of `tickets / total` in pool order.
///
/// Returns `None` when the total weight is not positive, since the table
/// cannot be normalized.
pub fn cumulative_table<T: WeightedRecord>(pool: &[T]) -> Option<Vec<f64>> {
    let (divisor, total) = normalized_total(pool.iter().map(WeightedRecord::tickets))?;

    let mut cumulative = 0.0;
    let table = pool
        .iter()
        .map(|record| {
            cumulative += record.tickets() / divisor / total;
            cumulative
        })
        .collect();
    Some(table)
}

/// `(divisor, total)` such that dividing each weight by `divisor` gives a
/// finite positive `total`.
///
/// The divisor is `1.0` unless finite weights overflow when summed, in which
/// case it is the largest weight. Ratios between weights are unchanged.
pub(crate) fn normalized_total<I>(weights: I) -> Option<(f64, f64)>
where
    I: Iterator<Item = f64> + Clone,
{
    let total: f64 = weights.clone().sum();
    if total.is_infinite() {
        let max = weights.clone().fold(0.0, f64::max);
        let scaled: f64 = weights.map(|w| w / max).sum();
        return (scaled.is_finite() && scaled > 0.0).then_some((max, scaled));
    }
    (total > 0.0).then_some((1.0, total))
}

/// First index whose cumulative value is `>= r`, clamped to the last index.
///
/// The clamp covers a final cumulative sum that rounds slightly below 1.0.
/// `table` must be non-empty.
pub fn select_index(table: &[f64], r: f64) -> usize {
    table
        .partition_point(|&c| c < r)
        .min(table.len().saturating_sub(1))
}
