//! Trendify CLI — weighted lottery ordering and trend curves.
//!
//! Commands:
//! - `draw` — shuffle a JSON list of entries by ticket weight, optionally trimmed
//! - `trim` — cap a JSON list to its first N entries
//! - `curve` — generate a trend curve and list its peak/trough segments
//! - `simulate` — estimate first-place rates over many seeded draws

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use trendify_core::{trim, DrawRng, ShuffleStrategy};
use trendify_runner::export::export_entries_json;
use trendify_runner::{
    init_tracing, load_entries, render_entries, run_draw, run_simulation, save_draw_artifacts,
    write_output, CurveReport, DrawOptions, DrawResult, OutputFormat, SimulationConfig,
    SimulationResult, TrendifyConfig,
};

#[derive(Parser)]
#[command(
    name = "trendify",
    about = "Trendify CLI — weighted lottery ordering and trend curves"
)]
struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shuffle entries so that more tickets means an earlier position.
    Draw {
        /// JSON array of objects, each with a numeric "tickets" field.
        #[arg(long)]
        input: PathBuf,

        /// TOML config file. Command-line flags override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for a reproducible draw. Defaults to an entropy seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Keep only the first N drawn entries.
        #[arg(long)]
        max: Option<usize>,

        /// Draw structure: cumulative or fenwick.
        #[arg(long)]
        strategy: Option<ShuffleStrategy>,

        /// Output format: json or csv.
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also save manifest + JSON + CSV under this directory.
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,
    },
    /// Keep the first N entries of a JSON list.
    Trim {
        #[arg(long)]
        input: PathBuf,

        /// Maximum number of participants (must be at least 1).
        #[arg(long)]
        max: usize,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a trend curve and localize its peak/trough segments.
    Curve {
        /// Number of samples (at least 2).
        #[arg(long)]
        length: usize,

        /// Print curve and segments as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Repeat the draw many times and compare first-place rates with ticket shares.
    Simulate {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of trials. Defaults to the config value (10000).
        #[arg(long)]
        trials: Option<usize>,

        /// Master seed for the trial hierarchy. Defaults to an entropy seed.
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        strategy: Option<ShuffleStrategy>,

        /// Run trials on one thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Draw {
            input,
            config,
            seed,
            max,
            strategy,
            format,
            output,
            artifacts_dir,
        } => run_draw_cmd(
            &input,
            config.as_deref(),
            DrawOverrides {
                seed,
                max,
                strategy,
                format,
            },
            output.as_deref(),
            artifacts_dir.as_deref(),
        ),
        Commands::Trim { input, max, output } => run_trim_cmd(&input, max, output.as_deref()),
        Commands::Curve { length, json } => run_curve_cmd(length, json),
        Commands::Simulate {
            input,
            config,
            trials,
            seed,
            strategy,
            sequential,
        } => run_simulate_cmd(&input, config.as_deref(), trials, seed, strategy, sequential),
    }
}

fn load_config(path: Option<&Path>) -> Result<TrendifyConfig> {
    match path {
        Some(p) => TrendifyConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(TrendifyConfig::default()),
    }
}

struct DrawOverrides {
    seed: Option<u64>,
    max: Option<usize>,
    strategy: Option<ShuffleStrategy>,
    format: Option<OutputFormat>,
}

fn run_draw_cmd(
    input: &Path,
    config_path: Option<&Path>,
    overrides: DrawOverrides,
    output: Option<&Path>,
    artifacts_dir: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    let draw = &mut config.draw;
    if overrides.seed.is_some() {
        draw.seed = overrides.seed;
    }
    if overrides.max.is_some() {
        draw.max_entries = overrides.max;
    }
    if let Some(strategy) = overrides.strategy {
        draw.strategy = strategy;
    }
    if let Some(format) = overrides.format {
        draw.output_format = format;
    }

    let entries = load_entries(input)?;
    info!(path = %input.display(), count = entries.len(), "file selected");

    let mut rng = match draw.seed {
        Some(seed) => DrawRng::from_seed(seed),
        None => DrawRng::from_entropy(),
    };
    let result = run_draw(&entries, &DrawOptions::from(&*draw), &mut rng)?;

    let rendered = render_entries(&result.entries, draw.output_format, &draw.label_field)?;
    write_output(output, &rendered)?;
    if let Some(path) = output {
        info!(path = %path.display(), "draw saved");
    }

    if let Some(dir) = artifacts_dir {
        let run_dir = save_draw_artifacts(&result, dir, &draw.label_field)?;
        info!(dir = %run_dir.display(), "artifacts saved");
    }

    print_draw_summary(&result, &draw.label_field);
    Ok(())
}

fn run_trim_cmd(input: &Path, max: usize, output: Option<&Path>) -> Result<()> {
    if max == 0 {
        bail!("--max must be a positive number of participants");
    }
    let entries = load_entries(input)?;
    let before = entries.len();
    let trimmed = trim(entries, max);
    write_output(output, &export_entries_json(&trimmed)?)?;
    info!(before, after = trimmed.len(), "list trimmed");
    Ok(())
}

fn run_curve_cmd(length: usize, json: bool) -> Result<()> {
    let report = CurveReport::build(length)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize curve report")?
        );
    } else {
        print!("{}", report.to_markdown());
    }
    Ok(())
}

fn run_simulate_cmd(
    input: &Path,
    config_path: Option<&Path>,
    trials: Option<usize>,
    seed: Option<u64>,
    strategy: Option<ShuffleStrategy>,
    sequential: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let sim_config = SimulationConfig {
        trials: trials.unwrap_or(config.simulation.trials),
        seed: seed
            .or(config.draw.seed)
            .unwrap_or_else(trendify_core::entropy_seed),
        strategy: strategy.unwrap_or(config.draw.strategy),
        parallel: config.simulation.parallel && !sequential,
    };

    let entries = load_entries(input)?;
    let result = run_simulation(&entries, &config.draw.label_field, &sim_config)?;
    print_simulation(&result);
    Ok(())
}

fn print_draw_summary(result: &DrawResult, label_field: &str) {
    eprintln!();
    eprintln!("=== Draw Result ===");
    eprintln!("Seed:           {}", result.seed);
    eprintln!("Strategy:       {}", result.strategy.name());
    eprintln!("Entries:        {} ({} trimmed)", result.entries.len(), result.trimmed_count());
    eprintln!("Total Tickets:  {}", result.total_tickets);
    if let Some(first) = result.entries.first() {
        eprintln!("First:          {}", first.label(label_field));
    }
    eprintln!();
}

fn print_simulation(result: &SimulationResult) {
    println!();
    println!("=== Simulation ===");
    println!("Trials:         {}", result.trials);
    println!("Seed:           {}", result.seed);
    println!("Strategy:       {}", result.strategy.name());
    println!();
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10}",
        "Entry", "Tickets", "Share", "First", "Mean Pos"
    );
    println!("{}", "-".repeat(64));
    for row in &result.rows {
        println!(
            "{:<20} {:>10.2} {:>9.2}% {:>9.2}% {:>10.2}",
            row.label,
            row.tickets,
            row.weight_share * 100.0,
            row.first_rate * 100.0,
            row.mean_position
        );
    }
    println!();
    println!("Max deviation:  {:.2}%", result.max_deviation * 100.0);
}
