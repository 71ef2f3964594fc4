mod reports;
mod tracer;
mod util;

use anyhow::{Context, Result};
use cadence_sim::{RunConfig, ScoreAggregator, Simulation, SimulationOutcome, StopHandle};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stderr, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use reports::ScoreReport;
use tracer::ConsoleTracer;
use util::{parse_cadences, report_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "cadence-runner", version = "0.1.0")]
#[command(about = "Simulate goal-seeking walks at several cadences and score their arrival days")]
struct Args {
    /// JSON run configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Goal distance
    #[arg(long)]
    goal: Option<f64>,

    /// Goal tolerance as a percentage of the goal distance
    #[arg(long)]
    tolerance: Option<f64>,

    /// Interpretation fidelity (0 = pure noise, 100 = no noise)
    #[arg(long)]
    interpretation: Option<f64>,

    /// Cadences in days (comma-separated)
    #[arg(long)]
    cadences: Option<String>,

    /// Repeat runs until stopped (Ctrl-C) or --runs is reached
    #[arg(long)]
    repeat: bool,

    /// Maximum number of runs when repeating
    #[arg(long)]
    runs: Option<u64>,

    /// Delay between simulated days in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print a status line for every cadence boundary
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let simulation = Simulation::new(config.clone())
        .context("invalid run configuration")?
        .with_max_runs(args.runs);

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let stop = StopHandle::new();
    let (scores, outcome) = drive(simulation, stop, args.verbose).await?;

    let report = ScoreReport::new(report_timestamp(), config, outcome, &scores);
    write_report(&args, &report, start_time)?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎯 Cadence Simulation Runner".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

/// Merge the optional config file with command-line overrides.
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(goal) = args.goal {
        config.goal_distance = goal;
    }
    if let Some(tolerance) = args.tolerance {
        config.goal_tolerance_percent = tolerance;
    }
    if let Some(interpretation) = args.interpretation {
        config.interpretation_percent = interpretation;
    }
    if let Some(raw) = &args.cadences {
        config.cadences = parse_cadences(raw)?;
    }
    if args.repeat {
        config.repeat = true;
    }
    if let Some(period_ms) = args.period_ms {
        config.period_ms = period_ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("invalid run configuration")?;
    Ok(config)
}

/// Exit status after a second Ctrl-C abandons the running simulation.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run the simulation on a blocking worker. The first Ctrl-C requests a stop,
/// which the repeat loop honours once the current run has finished; a second
/// one exits without waiting. Progress goes to stderr so stdout carries only
/// the report.
async fn drive(
    mut simulation: Simulation,
    stop: StopHandle,
    verbose: bool,
) -> Result<(ScoreAggregator, SimulationOutcome)> {
    let worker_stop = stop.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut scores = ScoreAggregator::new();
        let mut tracer = ConsoleTracer::new(stderr(), verbose);
        let outcome = simulation.run(&mut tracer, &mut scores, &worker_stop);
        (scores, outcome)
    });

    tokio::select! {
        joined = &mut worker => return joined.context("simulation worker panicked"),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            eprintln!("{}", "⏹  Stop requested; finishing the current run".yellow());
            stop.stop();
        }
    }

    tokio::select! {
        joined = &mut worker => joined.context("simulation worker panicked"),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            eprintln!("{}", "⏹  Interrupted again; abandoning the current run".red());
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

fn write_report(args: &Args, report: &ScoreReport, start_time: Instant) -> Result<()> {
    let mut sink = open_report_sink(args.output.as_deref())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut sink, report)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut sink, report)?,
        ReportFormat::Csv => reports::generate_csv_report(&mut sink, report)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut sink, report)?;
            writeln!(sink)?;
            writeln!(sink, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    sink.flush().context("failed to flush report")?;
    Ok(())
}

/// Buffered report destination: the `--output` file when given, stdout otherwise.
fn open_report_sink(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };
    Ok(BufWriter::new(sink))
}
