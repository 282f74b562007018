//! Draw pipeline — load, weighted shuffle, optional trim.
//!
//! The caller owns the [`DrawRng`] and passes it in, so one generator serves
//! every draw of a process run and the recorded seed reproduces the run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use trendify_core::{
    shuffle_with, trim, validate_weights, DrawRng, Entry, ShuffleError, ShuffleStrategy,
    WeightedRecord,
};

use crate::config::DrawSettings;
use crate::loader::{load_entries, LoadError};

/// Current schema version for persisted draw results.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("shuffle error: {0}")]
    Shuffle(#[from] ShuffleError),
}

/// Knobs for a single draw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawOptions {
    pub strategy: ShuffleStrategy,
    pub max_entries: Option<usize>,
}

impl From<&DrawSettings> for DrawOptions {
    fn from(settings: &DrawSettings) -> Self {
        Self {
            strategy: settings.strategy,
            max_entries: settings.max_entries,
        }
    }
}

/// Outcome of one draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Seed of the generator that produced this draw.
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub drawn_at: DateTime<Utc>,
    pub input_count: usize,
    pub total_tickets: f64,
    /// Entries in draw order, after trimming.
    pub entries: Vec<Entry>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl DrawResult {
    /// Number of entries dropped by the trim bound.
    pub fn trimmed_count(&self) -> usize {
        self.input_count - self.entries.len()
    }
}

/// Shuffle `entries` by weight and apply the trim bound.
pub fn run_draw(
    entries: &[Entry],
    opts: &DrawOptions,
    rng: &mut DrawRng,
) -> Result<DrawResult, DrawError> {
    validate_weights(entries)?;

    let total_tickets: f64 = entries.iter().map(WeightedRecord::tickets).sum();
    let mut drawn = shuffle_with(opts.strategy, entries, rng);
    if let Some(max) = opts.max_entries {
        drawn = trim(drawn, max);
    }

    info!(
        seed = rng.seed(),
        strategy = opts.strategy.name(),
        input = entries.len(),
        output = drawn.len(),
        "draw complete"
    );

    Ok(DrawResult {
        schema_version: SCHEMA_VERSION,
        seed: rng.seed(),
        strategy: opts.strategy,
        drawn_at: Utc::now(),
        input_count: entries.len(),
        total_tickets,
        entries: drawn,
    })
}

/// Load entries from `path` and draw.
pub fn draw_from_file(
    path: &Path,
    opts: &DrawOptions,
    rng: &mut DrawRng,
) -> Result<DrawResult, DrawError> {
    let entries = load_entries(path)?;
    run_draw(&entries, opts, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_entries;

    fn sample() -> Vec<Entry> {
        parse_entries(
            r#"[{"name":"a","tickets":5},{"name":"b","tickets":1},
                {"name":"c","tickets":3},{"name":"d","tickets":0}]"#,
        )
        .unwrap()
    }

    #[test]
    fn draw_keeps_all_without_bound() {
        let mut rng = DrawRng::from_seed(1);
        let result = run_draw(&sample(), &DrawOptions::default(), &mut rng).unwrap();
        assert_eq!(result.entries.len(), 4);
        assert_eq!(result.input_count, 4);
        assert_eq!(result.trimmed_count(), 0);
        assert_eq!(result.total_tickets, 9.0);
        assert_eq!(result.seed, 1);
    }

    #[test]
    fn draw_applies_trim_bound() {
        let mut rng = DrawRng::from_seed(1);
        let opts = DrawOptions {
            strategy: ShuffleStrategy::Fenwick,
            max_entries: Some(2),
        };
        let result = run_draw(&sample(), &opts, &mut rng).unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.trimmed_count(), 2);
        assert_eq!(result.strategy, ShuffleStrategy::Fenwick);
    }

    #[test]
    fn same_seed_same_order() {
        let entries = sample();
        let a = run_draw(&entries, &DrawOptions::default(), &mut DrawRng::from_seed(9)).unwrap();
        let b = run_draw(&entries, &DrawOptions::default(), &mut DrawRng::from_seed(9)).unwrap();
        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn shared_generator_advances_between_draws() {
        let entries: Vec<Entry> = (0..20)
            .map(|i| Entry::from_value(serde_json::json!({"id": i, "tickets": 1})).unwrap())
            .collect();
        let mut rng = DrawRng::from_seed(3);
        let first = run_draw(&entries, &DrawOptions::default(), &mut rng).unwrap();
        let second = run_draw(&entries, &DrawOptions::default(), &mut rng).unwrap();
        assert_ne!(first.entries, second.entries);
        assert_eq!(first.seed, second.seed);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let mut rng = DrawRng::from_seed(1);
        let result = run_draw(&[], &DrawOptions::default(), &mut rng).unwrap();
        assert!(result.entries.is_empty());
        assert_eq!(result.total_tickets, 0.0);
    }
}
