//! Quadtree command-line tool.
//!
//! Loads the TOML configuration, applies command-line overrides, sets up
//! logging and runs one command over JSON snapshots. Command output goes to
//! stdout as JSON; logs go to stderr.

mod cli;
mod commands;
mod config;

use cli::CliArgs;
use config::{AppConfig, LoggingSettings};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system
fn setup_logging(config: &LoggingSettings) {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(false)
                    .with_line_number(false),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false),
            )
            .init();
    }

    info!("Logging initialized with level: {}", log_level);
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load_from_file(&args.config_path)?;

    // Apply CLI overrides
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration validation failed: {}", e);
    }

    setup_logging(&config.logging);
    info!("Config: {}", args.config_path.display());

    let report = commands::execute(&config, args.command)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
