//! Lanchester simulator CLI
//!
//! Runs a scenario template as a single run, a parameter sweep, or a Monte
//! Carlo batch, and writes one record per run.

use clap::Parser;
use lanchester_core::{LanchesterError, Result, ScenarioTemplate};
use lanchester_sim::{open_sink, Session, SessionSummary};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Template used when no path is given.
const DEFAULT_CONFIG: &str = "parameters.json";

/// Stochastic Lanchester attrition simulator
#[derive(Parser, Debug)]
#[command(name = "lanchester-sim")]
#[command(about = "Explore stochastic Lanchester attrition scenarios", long_about = None)]
struct Args {
    /// Scenario template (JSON); defaults to ./parameters.json
    config: Option<PathBuf>,

    /// Seed for the session's random stream (overrides the template)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file, .csv or .jsonl (overrides the template)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run sweeps without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Abort any run that has not resolved after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary for scripting
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                eprintln!("Please provide a JSON file with the appropriate model parameters");
                std::process::exit(1);
            }
            eprintln!("Using default parameter settings...");
            default
        }
    };

    let template = match ScenarioTemplate::load(&config_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    // Initialize logging
    let level = if args.verbose || template.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    match run(&args, &config_path, template) {
        Ok(summary) => report(&summary, args.json),
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(args: &Args, config_path: &Path, mut template: ScenarioTemplate) -> Result<SessionSummary> {
    if let Some(seed) = args.seed {
        template.seed = Some(seed);
    }
    if let Some(output) = &args.output {
        template.output = Some(output.clone());
    }
    if let Some(output) = &template.output {
        if same_file(output, config_path) {
            return Err(LanchesterError::config(format!(
                "output {} would overwrite the scenario template",
                output.display()
            )));
        }
    }

    let sink = open_sink(template.output.as_deref())?;
    if let Some(output) = &template.output {
        info!("Writing results to {}", output.display());
    }

    let mut session = Session::new(template, sink).with_turn_limit(args.max_turns);
    session.execute(|total| args.yes || confirm_on_stdin(total))
}

/// Operator gate for sweeps. Empty, `y` or `yes` proceeds.
fn confirm_on_stdin(total_runs: u64) -> bool {
    print!("Run parameter sweep with {} runs? (Y/n):  ", total_runs);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes"),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn report(summary: &SessionSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
        return;
    }

    if summary.cancelled {
        info!("Cancelled - no runs executed");
        return;
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  {} session finished (seed={})", summary.mode, summary.seed);
    info!("    Runs:           {}", summary.runs);
    info!("    Red victories:  {}", summary.red_victories);
    info!("    Blue victories: {}", summary.blue_victories);
    info!("    Ties:           {}", summary.ties);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
