//! Draw-frequency simulation.
//!
//! Repeats the weighted draw many times and reports, per entry, how often it
//! came out first and its mean position. First-place rates should converge to
//! each entry's ticket share.
//!
//! Each trial gets its own generator from a [`SeedHierarchy`], so results are
//! identical for a fixed seed whether trials run sequentially or on the rayon
//! pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use trendify_core::{
    shuffle_with, validate_weights, Entry, SeedHierarchy, ShuffleError, ShuffleStrategy,
    WeightedRecord,
};

const TRIAL_LABEL: &str = "simulation-trial";

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub trials: usize,
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: 42,
            strategy: ShuffleStrategy::Cumulative,
            parallel: true,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Per-entry draw statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub label: String,
    pub tickets: f64,
    /// `tickets / total_tickets`; uniform share when the pool has no tickets.
    pub weight_share: f64,
    /// Fraction of trials in which this entry was drawn first.
    pub first_rate: f64,
    /// Mean 0-based position across trials.
    pub mean_position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trials: usize,
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub rows: Vec<FrequencyRow>,
    /// Largest `|first_rate - weight_share|` over all entries.
    pub max_deviation: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("simulation needs at least one trial")]
    NoTrials,
    #[error("simulation needs at least one entry")]
    EmptyPool,
    #[error("shuffle error: {0}")]
    Shuffle(#[from] ShuffleError),
}

// ─── Simulation ──────────────────────────────────────────────────────

/// Input position paired with its weight; cheap to clone per trial.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    index: usize,
    tickets: f64,
}

impl WeightedRecord for Ticket {
    fn tickets(&self) -> f64 {
        self.tickets
    }
}

#[derive(Debug, Clone)]
struct Tally {
    firsts: Vec<u64>,
    position_sums: Vec<u64>,
}

impl Tally {
    fn new(n: usize) -> Self {
        Self {
            firsts: vec![0; n],
            position_sums: vec![0; n],
        }
    }

    fn record(mut self, order: Vec<Ticket>) -> Self {
        if let Some(first) = order.first() {
            self.firsts[first.index] += 1;
        }
        for (position, ticket) in order.iter().enumerate() {
            self.position_sums[ticket.index] += position as u64;
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.firsts.iter_mut().zip(other.firsts) {
            *a += b;
        }
        for (a, b) in self.position_sums.iter_mut().zip(other.position_sums) {
            *a += b;
        }
        self
    }
}

/// Run `config.trials` independent draws over `entries`.
pub fn run_simulation(
    entries: &[Entry],
    label_field: &str,
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    if config.trials == 0 {
        return Err(SimulationError::NoTrials);
    }
    if entries.is_empty() {
        return Err(SimulationError::EmptyPool);
    }
    validate_weights(entries)?;

    let pool: Vec<Ticket> = entries
        .iter()
        .enumerate()
        .map(|(index, e)| Ticket {
            index,
            tickets: e.tickets(),
        })
        .collect();
    let n = pool.len();
    let hierarchy = SeedHierarchy::new(config.seed);

    let trial = |i: usize| {
        let mut rng = hierarchy.rng_for(TRIAL_LABEL, i as u64);
        shuffle_with(config.strategy, &pool, &mut rng)
    };

    let tally = if config.parallel {
        (0..config.trials)
            .into_par_iter()
            .map(trial)
            .fold(|| Tally::new(n), Tally::record)
            .reduce(|| Tally::new(n), Tally::merge)
    } else {
        (0..config.trials)
            .map(trial)
            .fold(Tally::new(n), Tally::record)
    };

    let total: f64 = pool.iter().map(|t| t.tickets).sum();
    let trials = config.trials as f64;
    let rows: Vec<FrequencyRow> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let weight_share = if total > 0.0 {
                entry.tickets() / total
            } else {
                1.0 / n as f64
            };
            FrequencyRow {
                label: entry.label(label_field),
                tickets: entry.tickets(),
                weight_share,
                first_rate: tally.firsts[i] as f64 / trials,
                mean_position: tally.position_sums[i] as f64 / trials,
            }
        })
        .collect();

    let max_deviation = rows
        .iter()
        .map(|r| (r.first_rate - r.weight_share).abs())
        .fold(0.0, f64::max);

    info!(
        trials = config.trials,
        entries = n,
        max_deviation,
        "simulation complete"
    );

    Ok(SimulationResult {
        trials: config.trials,
        seed: config.seed,
        strategy: config.strategy,
        rows,
        max_deviation,
    })
}
