use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use fluxcat_model::CatalogueBuilder;
use fluxcat_storage::{CatalogueBackend, FlareSearch, SubCatalogue};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fluxcat")]
#[command(about = "Synthetic radio transient catalogue tools", long_about = None)]
struct Cli {
    /// SQLite catalogue database (default: under the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Use a flat CSV catalogue at this path instead of SQLite
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic catalogue into the store
    Build {
        /// Number of synthetic sources to generate
        #[arg(short, long, default_value = "10000")]
        sources: usize,
        /// Seed for a reproducible build
        #[arg(long)]
        seed: Option<u64>,
        /// Sources accumulated between storage flushes
        #[arg(long, default_value = "100")]
        batch_size: usize,
        /// Observations generated per source
        #[arg(long, default_value = "365")]
        per_source: usize,
    },
    /// List sources flaring above a threshold in the last week
    Search {
        /// Selection threshold (mJy, or sigma with --snr)
        #[arg(short, long)]
        threshold: f64,
        /// Threshold signal-to-noise instead of flux
        #[arg(long)]
        snr: bool,
    },
    /// Export a hierarchical sub-catalogue of high-significance sources
    Subcat {
        /// Signal-to-noise selection threshold
        #[arg(long, default_value = "50.0")]
        snr_threshold: f64,
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print row and source counts
    Stats,
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fluxcat")
        .join("transients.db")
}

fn open_backend(db: Option<PathBuf>, csv: Option<PathBuf>) -> Result<CatalogueBackend> {
    if let Some(path) = csv {
        return Ok(CatalogueBackend::open_csv(&path));
    }
    let db_path = db.unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(CatalogueBackend::open_sqlite(&db_path)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let backend = open_backend(cli.db, cli.csv)?;

    match cli.command {
        Commands::Build {
            sources,
            seed,
            batch_size,
            per_source,
        } => {
            let mut builder = CatalogueBuilder::new(sources)
                .observations_per_source(per_source)
                .batch_size(batch_size);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            let report = builder.build(&backend)?;
            println!(
                "Generated {} observations across {} sources.",
                report.observations, report.sources
            );
        }
        Commands::Search { threshold, snr } => {
            let now = Utc::now();
            let search = if snr {
                FlareSearch::above_snr(threshold, now)
            } else {
                FlareSearch::above_flux(threshold, now)
            };
            let curves = search.light_curves(&backend)?;
            let unit = if snr { "sigma" } else { "mJy" };
            println!(
                "Found {} sources flaring above {threshold} {unit} in f093 in the last week.",
                curves.len()
            );
            for curve in &curves {
                let peak = curve
                    .observations
                    .iter()
                    .map(|o| o.flux_093)
                    .fold(f64::NEG_INFINITY, f64::max);
                println!(
                    "  {}: {} observations in the last month, peak f093 {peak:.3} mJy",
                    curve.source,
                    curve.observations.len()
                );
            }
        }
        Commands::Subcat {
            snr_threshold,
            output,
        } => {
            let subcat = SubCatalogue::extract(&backend, snr_threshold, Utc::now())?;
            subcat.write_json(&output)?;
            println!(
                "Wrote {} sources to {}.",
                subcat.number_of_sources,
                output.display()
            );
        }
        Commands::Stats => {
            let stats = backend.stats()?;
            println!(
                "{} observations across {} sources.",
                stats.observations, stats.sources
            );
        }
    }

    Ok(())
}
