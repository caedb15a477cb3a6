#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the storm impact pipeline.
//!
//! Loads a storm database CSV, runs normalization, classification, window
//! filtering and aggregation, and writes every output table as JSON for
//! downstream rendering.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use storm_impact_analytics::config::PipelineConfig;
use storm_impact_analytics::pipeline::Pipeline;
use storm_impact_cli_utils::IndicatifProgress;
use storm_impact_geography_models::states::state_name;
use storm_impact_source::csv_load::load_csv;

#[derive(Parser)]
#[command(name = "storm_impact", about = "Storm event impact aggregation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a storm data CSV and write the output
    /// tables as JSON
    Report {
        /// Path to the storm data CSV (`.csv` or `.csv.gz`)
        #[arg(long)]
        input: PathBuf,
        /// TOML pipeline configuration (defaults are used if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of top-ranked regions per outcome (overrides the config)
        #[arg(long)]
        top_k: Option<usize>,
        /// Output JSON path (prints to stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the category assigned to each event type label
    Classify {
        /// Event type labels (e.g. "TSTM WIND")
        #[arg(required = true)]
        labels: Vec<String>,
        /// TOML pipeline configuration (defaults are used if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the valid region codes
    Regions {
        /// TOML pipeline configuration (defaults are used if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default pipeline configuration as TOML
    DefaultConfig,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = storm_impact_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            config,
            top_k,
            output,
        } => {
            let start = Instant::now();

            let mut config = load_config(config.as_deref())?;
            if let Some(top_k) = top_k {
                config.top_k = top_k;
            }
            let pipeline = Pipeline::new(config)?;

            let loaded = load_csv(
                &input,
                &IndicatifProgress::records_bar(&multi, "Loading records"),
            )?;
            let report = pipeline.run(
                &loaded.records,
                &IndicatifProgress::records_bar(&multi, "Normalizing"),
            )?;

            let summary = &report.summary;
            log::info!(
                "Window {}-{}: {} of {} records retained ({} bad rows, {} bad dates, {} outside window, {} outside regions)",
                summary.window.min_year,
                summary.window.max_year,
                summary.retained_records,
                summary.input_records,
                loaded.skipped_rows,
                summary.malformed_dates,
                summary.out_of_window,
                summary.out_of_domain
            );

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Wrote report to {}", path.display());
                }
                None => println!("{json}"),
            }

            log::info!("Done in {:.1}s", start.elapsed().as_secs_f64());
        }
        Commands::Classify { labels, config } => {
            let pipeline = Pipeline::new(load_config(config.as_deref())?)?;
            for label in &labels {
                let category = pipeline.classify(label);
                println!("{label:<40} {category:<20} {}", category.label());
            }
        }
        Commands::Regions { config } => {
            let config = load_config(config.as_deref())?;
            println!("{:<6} NAME", "CODE");
            println!("{}", "-".repeat(30));
            for code in config.valid_regions.iter() {
                println!("{:<6} {}", code, state_name(code).unwrap_or("-"));
            }
        }
        Commands::DefaultConfig => {
            print!("{}", PipelineConfig::default().to_toml_string()?);
        }
    }

    Ok(())
}
