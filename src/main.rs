//! Babypool - Baby Shower Guessing Pool
//!
//! A CLI app that collects guesses about an upcoming baby (guessed
//! name, weight, arrival timing), persists them as per-submitter shard
//! files in a blob store, and renders the pool as a chart, name cloud,
//! and table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (store failure, corrupt shard, config error, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod repo;
mod report;
mod store;

use analysis::{distinct_submitters, AggregateView};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use config::Config;
use models::{Guess, ReportMetadata};
use repo::GuessRepository;
use store::FsBlobStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        if let Err(e) = handle_init_config() {
            eprintln!("\u{274C} Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Command failed: {}", e);
        eprintln!("\n\u{274C} Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle init-config: generate a default .babypool.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".babypool.toml");

    if path.exists() {
        anyhow::bail!(".babypool.toml already exists. Remove it first or edit it manually.");
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .babypool.toml")?;

    println!("\u{2705} Created .babypool.toml with default settings.");
    println!("   Edit it to customize the store directory, weight bounds, and report output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the parsed command.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let repository = GuessRepository::new(FsBlobStore::new(config.store.root.clone()));
    info!("Guess store: {}", config.store.root);

    match args.command {
        Command::Submit {
            name,
            baby_name,
            weight,
            arrival,
        } => run_submit(&repository, &config, name, baby_name, weight, arrival.into()),
        Command::Report { output, format } => run_report(&repository, &config, output, format),
        Command::List => run_list(&repository),
        Command::InitConfig => unreachable!("handled before dispatch"),
    }
}

/// Submit one guess: the form equivalent.
fn run_submit(
    repository: &GuessRepository<FsBlobStore>,
    config: &Config,
    name: String,
    baby_name: String,
    weight: Option<f64>,
    arrival: models::Arrival,
) -> Result<()> {
    let guess = Guess {
        guesser_name: name,
        baby_name,
        weight: weight.unwrap_or(config.guess.default_weight),
        arrival,
    };

    // Required-field presence, then the display weight bounds. Neither
    // is ever re-checked on guesses already in the store.
    if let Err(reason) = guess.validate() {
        anyhow::bail!("Please fill out all the fields: {}", reason);
    }
    if guess.weight < config.guess.min_weight || guess.weight > config.guess.max_weight {
        anyhow::bail!(
            "Weight must be between {:.1} and {:.1} lbs",
            config.guess.min_weight,
            config.guess.max_weight
        );
    }

    repository
        .append(&guess.guesser_name, std::slice::from_ref(&guess))
        .context("Your guess was not saved")?;

    println!("\u{2705} Your guess has been submitted! \u{1F389}");
    println!(
        "   {} guesses {} at {:.1} lbs, arriving {}",
        guess.guesser_name, guess.baby_name, guess.weight, guess.arrival
    );
    Ok(())
}

/// Render the pool into a report file.
fn run_report(
    repository: &GuessRepository<FsBlobStore>,
    config: &Config,
    output: Option<std::path::PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let guesses = repository.load_all()?;
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        store_root: config.store.root.clone(),
        total_guesses: guesses.len(),
        submitters: distinct_submitters(&guesses),
    };
    let view = AggregateView::build(guesses, config.report.stack_spacing);

    let options = report::RenderOptions {
        min_weight: config.guess.min_weight,
        max_weight: config.guess.max_weight,
        stack_spacing: config.report.stack_spacing,
        include_name_cloud: config.report.include_name_cloud,
    };

    let content = match format {
        OutputFormat::Html => report::generate_html_report(&view, &metadata, &options),
        OutputFormat::Markdown => report::generate_markdown_report(&view, &metadata),
        OutputFormat::Json => report::generate_json_report(&view, &metadata)?,
    };

    let output = output.unwrap_or_else(|| std::path::PathBuf::from(&config.report.output));
    std::fs::write(&output, &content)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!("\u{1F4CA} Pool summary:");
    println!("   Guesses: {}", metadata.total_guesses);
    println!("   Guessers: {}", metadata.submitters);
    if let Some((name, count)) = analysis::sorted_name_counts(&view.name_counts).first() {
        println!("   Top name: {} ({} guesses)", name, count);
    }
    println!("\n\u{2705} Report saved to: {}", output.display());
    Ok(())
}

/// Print the guess table to stdout.
fn run_list(repository: &GuessRepository<FsBlobStore>) -> Result<()> {
    let guesses = repository.load_all()?;
    print!("{}", report::render_list_table(&guesses));
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .babypool.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
