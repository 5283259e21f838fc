//! CLI commands implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use titlescan::candidate::{UploadCandidate, ADVISORY_MAX_BYTES};
use titlescan::config::Settings;
use titlescan::session::AnalysisSession;
use titlescan::{render, SettledOutcome};

#[derive(Parser)]
#[command(name = "titlescan")]
#[command(about = "Title insurance document analysis client")]
#[command(version)]
pub struct Cli {
    /// Analysis service base address (e.g. http://localhost:8000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one document and print the extracted fields
    Analyze {
        /// Path to a PDF or image document
        file: PathBuf,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal client
    Tui {
        /// Directory to start browsing in (default: current directory)
        dir: Option<PathBuf>,
    },

    /// Check whether the analysis service is reachable and healthy
    Health,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.api_url.as_deref());

    match cli.command {
        Commands::Analyze { file, json } => cmd_analyze(&settings, &file, json).await,
        Commands::Tui { dir } => titlescan::tui::run(&settings, dir).await,
        Commands::Health => cmd_health(&settings).await,
    }
}

/// One-shot submission: acquire, submit, render the settled outcome.
async fn cmd_analyze(settings: &Settings, file: &Path, json: bool) -> anyhow::Result<()> {
    let candidate = UploadCandidate::from_path(file)?;

    if !candidate.is_accepted_type() {
        println!(
            "{} {} has type {}; the service accepts PDF and image files and may reject it",
            style("!").yellow(),
            candidate.file_name,
            candidate.media_type
        );
    }
    if candidate.exceeds_advisory_limit() {
        println!(
            "{} {} is larger than {} MB; the service may reject it",
            style("!").yellow(),
            candidate.file_name,
            ADVISORY_MAX_BYTES / (1024 * 1024)
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("valid spinner template"),
    );
    spinner.set_message(format!("Analyzing {}...", candidate.file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let client = settings.client();
    let mut session = AnalysisSession::new();
    let outcome = session.submit(&client, candidate).await?;

    spinner.finish_and_clear();

    match outcome {
        SettledOutcome::Result(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else {
                render::print_result(result);
            }
            Ok(())
        }
        SettledOutcome::Failure(failure) => {
            render::print_failure(failure);
            anyhow::bail!("analysis failed ({})", failure.kind.as_str())
        }
    }
}

/// Probe the service's health endpoint.
async fn cmd_health(settings: &Settings) -> anyhow::Result<()> {
    let client = settings.client();

    match client.health().await {
        Ok(health) => {
            println!(
                "{} {} ({})",
                style("✓").green(),
                health.status,
                client.base_url()
            );
            for (service, state) in &health.services {
                println!("  {:<12} {}", format!("{}:", service), state);
            }
            Ok(())
        }
        Err(outcome) => {
            anyhow::bail!("service unreachable at {}: {}", client.base_url(), outcome)
        }
    }
}
