//! Kona Filters - command-line entrypoint.
//!
//! Loads the configuration, initializes logging, and measures the
//! false-positive rate and space use of the filter family.

use clap::{Parser, Subcommand};
use kona_filters_lib::config::{self, ConfigLoader, KonaConfig, LogConfig};
use kona_filters_lib::error::{KonaError, KonaResult};
use kona_filters_lib::filters::measure::{measure, unique_random_keys, FilterReport};
use kona_filters_lib::filters::FilterKind;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the Kona filters tool.
#[derive(Parser, Debug)]
#[clap(name = "Kona Filters", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Measure false-positive rate and space use
    Measure {
        /// Filter to measure (all kinds when omitted)
        #[clap(short, long, value_parser)]
        kind: Option<FilterKind>,

        /// Number of keys to insert
        #[clap(short = 'n', long, value_parser)]
        keys: Option<usize>,

        /// Space budget in bits per key
        #[clap(short, long, value_parser)]
        bits_per_key: Option<f64>,

        /// Hash seed for the filters
        #[clap(short, long, value_parser)]
        seed: Option<u64>,

        /// Print reports as JSON
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> KonaResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_thread_names(true)
        .with_writer(std::io::stderr);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };
    result.map_err(|e| KonaError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(
    config: &mut KonaConfig,
    kind: Option<FilterKind>,
    keys: Option<usize>,
    bits_per_key: Option<f64>,
    seed: Option<u64>,
    json: bool,
) -> KonaResult<()> {
    if kind.is_some() {
        config.filter.kind = kind;
    }
    if let Some(keys) = keys {
        config.measure.keys = keys;
    }
    if let Some(bits_per_key) = bits_per_key {
        config.filter.bits_per_key = bits_per_key;
    }
    if seed.is_some() {
        config.filter.seed = seed;
    }
    config.measure.json |= json;
    config::Validate::validate(config)?;
    Ok(())
}

/// Measure every selected filter kind and print one report per kind.
fn run_measure(config: &KonaConfig) -> KonaResult<()> {
    let count = config.measure.keys;
    info!(keys = count, seed = config.measure.key_seed, "Generating keys");
    let all_keys = unique_random_keys(count * 2, config.measure.key_seed);
    let (keys, non_keys) = all_keys.split_at(count);

    let filter_config = config.filter.to_filter_config();
    let mut failed = Vec::new();
    for kind in config.filter.kinds() {
        let report = measure(kind, &filter_config, keys, non_keys)?;
        print_report(&report, config.measure.json)?;
        if report.false_negatives > 0 {
            failed.push(kind);
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(KonaError::Custom(format!("False negatives in {failed:?}")))
    }
}

fn print_report(report: &FilterReport, json: bool) -> KonaResult<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!(
            "{:<24} fpp {:>8.4}%  expected {:>8.4}%  bits/key {:>6.2}  k {}",
            report.kind.as_str(),
            report.fpp * 100.0,
            report.theoretical_fpp * 100.0,
            report.bits_per_key,
            report.hash_functions
        );
    }
    Ok(())
}

/// Main entry point for the application.
fn main() -> KonaResult<()> {
    // Parse command-line arguments
    let args = <Args as clap::Parser>::parse();

    let config_loader = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX);
    let loaded = config_loader.load();

    // Initialize logging early to capture any startup errors
    let log = loaded.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    init_logging(&log)?;

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let command = args.command.unwrap_or(Command::Measure {
        kind: None,
        keys: None,
        bits_per_key: None,
        seed: None,
        json: false,
    });

    match command {
        Command::Measure {
            kind,
            keys,
            bits_per_key,
            seed,
            json,
        } => {
            apply_overrides(&mut config, kind, keys, bits_per_key, seed, json)?;
            info!(
                kinds = ?config.filter.kinds(),
                bits_per_key = config.filter.bits_per_key,
                "Measuring filters"
            );
            run_measure(&config)
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = KonaConfig::default();

            // Create parent directories if they don't exist
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
