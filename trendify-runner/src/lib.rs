//! Trendify Runner — draw orchestration on top of `trendify-core`.
//!
//! This crate provides:
//! - TOML configuration (`config`)
//! - JSON record loading (`loader`)
//! - The load → shuffle → trim pipeline (`draw`)
//! - Monte Carlo draw-frequency simulation (`simulate`)
//! - JSON/CSV export and artifact bundles (`export`)
//! - Tracing setup (`logging`)

pub mod config;
pub mod draw;
pub mod export;
pub mod loader;
pub mod logging;
pub mod simulate;

pub use config::{ConfigError, DrawSettings, SimulationSettings, TrendifyConfig};
pub use draw::{draw_from_file, run_draw, DrawError, DrawOptions, DrawResult, SCHEMA_VERSION};
pub use export::{
    load_manifest, render_entries, save_draw_artifacts, write_output, CurveReport, DrawManifest,
    OutputFormat,
};
pub use loader::{load_entries, parse_entries, LoadError};
pub use logging::init_tracing;
pub use simulate::{run_simulation, FrequencyRow, SimulationConfig, SimulationError, SimulationResult};
