// Coalition Lab Runner — ensemble experiments from the command line
// Seedable ChaCha8 runs over built-in presets or scenario JSON files
//
// Usage:
//   cargo run --release --bin lab -- list                        # Built-in presets
//   cargo run --release --bin lab -- run climate-change          # Catalogue runs/steps
//   cargo run --release --bin lab -- run ai-safety --runs 50 -I 0.1 --epsilon 0.5
//   cargo run --release --bin lab -- run --scenario my.json --time-series
//   cargo run --release --bin lab -- sweep ancient-athens --grid 5
//   cargo run --release --bin lab -- --config lab.toml run green-belt-movement
//   cargo run --release --bin lab -- config > lab.toml           # Default config
//
// Log verbosity follows RUST_LOG (default: info).

mod report;
mod scenarios;
mod sweep;
mod time_series;

use clap::{Args, Parser, Subcommand};
use coalition_engine::config::{ConfigError, ConfigFile};
use coalition_engine::metrics::group_breakdown;
use coalition_engine::{
    CoalitionLab, EngineError, EnsembleConfig, EnsembleRunner, InsightCategory, LabConfig,
    Scenario,
};
use report::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use time_series::TimeSeriesRecorder;
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lab", version, about = "Coalition ethics ensemble runner")]
struct Cli {
    /// TOML file with model coefficients and ensemble defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List built-in presets
    List,
    /// Run one ensemble and report statistics, group breakdown and insights
    Run(RunArgs),
    /// Sweep protocol complexity and tolerance over a grid
    Sweep(SweepArgs),
    /// Print the default configuration as TOML
    Config,
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Preset id or part of its name
    preset: Option<String>,

    /// Scenario JSON file instead of a preset
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EnsembleArgs {
    #[arg(long)]
    runs: Option<usize>,

    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Directory for JSON reports
    #[arg(long, default_value = "lab-results")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    ensemble: EnsembleArgs,

    /// Protocol complexity override
    #[arg(short = 'I', long = "protocol")]
    protocol_complexity: Option<f64>,

    /// Tolerance override
    #[arg(short = 'e', long = "epsilon")]
    tolerance: Option<f64>,

    /// Also write one JSONL line per run and step
    #[arg(long)]
    time_series: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    ensemble: EnsembleArgs,

    /// Points per axis
    #[arg(long, default_value_t = 5)]
    grid: usize,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum LabError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no preset matches {0:?}; see `lab list`")]
    UnknownPreset(String),
    #[error("name a preset or pass --scenario <file>")]
    NoScenario,
    #[error("sweep grid needs at least 2 points per axis, got {0}")]
    GridTooSmall(usize),
}

// ─── Scenario Resolution ────────────────────────────────────────────────────

struct Resolved {
    label: String,
    scenario: Scenario,
    config: LabConfig,
}

fn load_config(config_path: Option<&Path>) -> Result<Option<ConfigFile>, LabError> {
    Ok(config_path.map(ConfigFile::from_file).transpose()?)
}

/// Precedence for runs/steps/seed: flags, then keys set in the config file,
/// then the preset's catalogue values, then the built-in defaults.
fn resolve(
    file_config: Option<ConfigFile>,
    scenario_args: &ScenarioArgs,
    ensemble_args: &EnsembleArgs,
) -> Result<Resolved, LabError> {
    let (label, scenario, base) = match (&scenario_args.preset, &scenario_args.scenario) {
        (Some(query), _) => {
            let preset = scenarios::find(query).ok_or_else(|| LabError::UnknownPreset(query.clone()))?;
            let catalogue = EnsembleConfig {
                num_runs: preset.runs,
                num_steps: preset.steps,
                ..EnsembleConfig::default()
            };
            (preset.id.to_string(), preset.scenario(), catalogue)
        }
        (None, Some(path)) => {
            let file = std::fs::File::open(path)?;
            let scenario: Scenario = serde_json::from_reader(std::io::BufReader::new(file))?;
            (path.display().to_string(), scenario, EnsembleConfig::default())
        }
        (None, None) => return Err(LabError::NoScenario),
    };

    let mut config = file_config.unwrap_or_default().over(base);
    if let Some(runs) = ensemble_args.runs {
        config.ensemble.num_runs = runs;
    }
    if let Some(steps) = ensemble_args.steps {
        config.ensemble.num_steps = steps;
    }
    if let Some(seed) = ensemble_args.seed {
        config.ensemble.base_seed = seed;
    }

    Ok(Resolved { label, scenario, config })
}

fn scenario_info(label: &str, scenario: &Scenario) -> ScenarioInfo {
    ScenarioInfo {
        label: label.to_string(),
        task: scenario.task_description.clone(),
        agents: scenario.agents.len(),
        protocol_complexity: scenario.protocol_complexity,
        tolerance: scenario.tolerance,
    }
}

fn timestamp() -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}", ms)
}

fn write_report<T: serde::Serialize>(dir: &Path, file_name: &str, report: &T) -> Result<PathBuf, LabError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn category_tag(category: InsightCategory) -> &'static str {
    match category {
        InsightCategory::Success => "ok",
        InsightCategory::Warning => "warn",
        InsightCategory::Error => "fail",
        InsightCategory::Info => "info",
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn cmd_list() {
    println!("\n  {:<24} {:>4} {:>6} {:>6} {:>6} {:>7}  {}", "Preset", "I", "eps", "steps", "runs", "groups", "Name");
    println!("  {}", "-".repeat(100));
    for preset in scenarios::PRESETS {
        println!(
            "  {:<24} {:>4.1} {:>6.2} {:>6} {:>6} {:>7}  {} ({}, {})",
            preset.id,
            preset.protocol_complexity(),
            preset.tolerance,
            preset.steps,
            preset.runs,
            preset.groups.len(),
            preset.name,
            preset.period,
            preset.tradition,
        );
    }
    println!();
}

fn cmd_config(config_path: Option<&Path>) -> Result<(), LabError> {
    let config = match config_path {
        Some(path) => LabConfig::from_file(path)?,
        None => LabConfig::default(),
    };
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_run(config_path: Option<&Path>, args: &RunArgs) -> Result<(), LabError> {
    let Resolved { label, scenario, config } = resolve(load_config(config_path)?, &args.scenario, &args.ensemble)?;
    let scenario = scenario.with_parameters(
        args.protocol_complexity.unwrap_or(scenario.protocol_complexity),
        args.tolerance.unwrap_or(scenario.tolerance),
    );

    println!("\n  Coalition Lab Runner v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  PRNG: ChaCha8Rng | Runs: {} | Steps: {} | Base seed: {}",
        config.ensemble.num_runs, config.ensemble.num_steps, config.ensemble.base_seed
    );
    println!(
        "  Scenario: {} ({} agents, I = {:.2}, epsilon = {:.2})\n",
        label,
        scenario.agents.len(),
        scenario.protocol_complexity,
        scenario.tolerance
    );

    let ensemble = config.ensemble.clone();
    let start = Instant::now();
    let lab = CoalitionLab::with_config(scenario.clone(), config);
    let result = lab.run_core()?;
    let elapsed = start.elapsed();
    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "ensemble finished");

    let summary = &result.ensemble.summary;
    let final_atcf = Stats::final_atcf(&result.ensemble.runs);
    let final_p = Stats::final_success_probability(&result.ensemble.runs);

    println!("  {:<22} {:>8}", "Metric", "Value");
    println!("  {}", "-".repeat(48));
    println!("  {:<22} {:>7.1}%", "Success rate", summary.avg_success_rate_pct);
    println!(
        "  {:<22} {:>8.3}  ±{:.3} (95% CI {:.3}..{:.3})",
        "Final ATCF", final_atcf.mean, final_atcf.std_dev, final_atcf.ci_lower, final_atcf.ci_upper
    );
    println!("  {:<22} {:>8.3}", "Min final ATCF", summary.min_final_atcf);
    println!("  {:<22} {:>8.3}", "Final success p", final_p.mean);
    println!("  {:<22} {:>7.1}%", "Robustness", summary.robustness_pct);

    let groups = group_breakdown(&result.ensemble, 0);
    if let Some(groups) = &groups {
        println!("\n  Group ATCF (run 1, final step):");
        for entry in &groups.atcf_by_group {
            println!("    {:<32} {:>5.1}%", entry.group, entry.atcf * 100.0);
        }
    }

    if !result.insights.is_empty() {
        println!("\n  Insights:");
        for insight in &result.insights {
            println!("    [{:<4}] {}", category_tag(insight.category), insight.message);
        }
    }

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = timestamp();
    let report = RunReport {
        timestamp: ts.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        scenario: scenario_info(&label, &scenario),
        n_runs: ensemble.num_runs,
        n_steps: ensemble.num_steps,
        base_seed: ensemble.base_seed,
        summary: summary.clone(),
        final_atcf,
        final_success_probability: final_p,
        group_metrics: groups,
        insights: result.insights.clone(),
        time_series: result.ensemble.time_series.clone(),
    };
    let path = write_report(&args.ensemble.out, &format!("run-{}.json", ts), &report)?;
    println!("\n  Results saved to: {}", path.display());

    if args.time_series {
        let recorder = TimeSeriesRecorder::from_ensemble(&result.ensemble);
        let path = args.ensemble.out.join(format!("run-{}.jsonl", ts));
        recorder.write_jsonl(&path)?;
        println!("  Time series ({} lines): {}", recorder.len(), path.display());
    }
    println!();
    Ok(())
}

fn cmd_sweep(config_path: Option<&Path>, args: &SweepArgs) -> Result<(), LabError> {
    if args.grid < 2 {
        return Err(LabError::GridTooSmall(args.grid));
    }
    let Resolved { label, scenario, config } = resolve(load_config(config_path)?, &args.scenario, &args.ensemble)?;
    let ensemble = config.ensemble.clone();
    let runner = EnsembleRunner::new(config.model, config.ensemble);

    println!("\n  Coalition Lab Sweep v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Scenario: {} | Grid: {}x{} | Runs/cell: {} | Steps: {} | Base seed: {}\n",
        label, args.grid, args.grid, ensemble.num_runs, ensemble.num_steps, ensemble.base_seed
    );

    let start = Instant::now();
    let cells = sweep::run_sweep(&runner, &scenario, args.grid)?;
    tracing::info!(cells = cells.len(), elapsed_ms = start.elapsed().as_millis() as u64, "sweep finished");

    println!("  {:>5} {:>6} {:>9} {:>10} {:>9} {:>11}", "I", "eps", "success", "final ATCF", "min ATCF", "robustness");
    println!("  {}", "-".repeat(56));
    for cell in &cells {
        println!(
            "  {:>5.2} {:>6.2} {:>8.1}% {:>10.3} {:>9.3} {:>10.1}%",
            cell.protocol_complexity,
            cell.tolerance,
            cell.success_rate_pct,
            cell.final_atcf,
            cell.min_final_atcf,
            cell.robustness_pct,
        );
    }

    let ts = timestamp();
    let report = SweepReport {
        timestamp: ts.clone(),
        version: env!("CARGO_PKG_VERSION"),
        scenario: scenario_info(&label, &scenario),
        grid: args.grid,
        n_runs: ensemble.num_runs,
        n_steps: ensemble.num_steps,
        base_seed: ensemble.base_seed,
        cells,
    };
    let path = write_report(&args.ensemble.out, &format!("sweep-{}.json", ts), &report)?;
    println!("\n  Results saved to: {}\n", path.display());
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let outcome = match &cli.command {
        Command::List => {
            cmd_list();
            Ok(())
        }
        Command::Run(args) => cmd_run(config_path, args),
        Command::Sweep(args) => cmd_sweep(config_path, args),
        Command::Config => cmd_config(config_path),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
