//! Loss Triangles CLI
//!
//! Builds cumulative triangles and age-to-age factors from a CSV file and
//! writes them as JSON.
//!
//! ```bash
//! loss_triangles build claims.csv --origin accidentYear --development dev --value paid --category lob
//! loss_triangles summary claims.csv --origin accidentYear --value paid
//! loss_triangles profile claims.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loss_triangles::labels::{aggregation_options, profile_columns};
use loss_triangles::{build_triangles, origin_totals, Grain, RecordSet, TriangleRequest};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Loss development triangle builder
#[derive(Parser)]
#[command(name = "loss_triangles", version)]
#[command(about = "Build loss development triangles and age-to-age factors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build cumulative triangles and age-to-age factors
    Build {
        /// Input CSV with a header row
        input: PathBuf,

        /// JSON file with a full build request; flags below override it
        #[arg(long)]
        request: Option<PathBuf>,

        /// Origin cohort column
        #[arg(long)]
        origin: Option<String>,

        /// Development age column
        #[arg(long)]
        development: Option<String>,

        /// Value column
        #[arg(long)]
        value: Option<String>,

        /// Category column; one triangle per distinct value
        #[arg(long)]
        category: Option<String>,

        /// Grain for a date-like origin column
        #[arg(long, value_enum)]
        origin_grain: Option<Grain>,

        /// Grain for a date-like development column
        #[arg(long, value_enum)]
        development_grain: Option<Grain>,

        /// Build categories one at a time
        #[arg(long)]
        sequential: bool,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sum the value column per origin
    Summary {
        input: PathBuf,

        #[arg(long, default_value = "accidentYear")]
        origin: String,

        #[arg(long, default_value = "paid")]
        value: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify columns as date-like, numeric or categorical
    Profile {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ProfileReport {
    #[serde(flatten)]
    columns: loss_triangles::labels::ColumnProfile,
    /// Supported grains per date-like column
    grains: Vec<(String, Vec<Grain>)>,
}

fn load_records(path: &Path) -> Result<RecordSet> {
    RecordSet::from_csv_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Unable to create {}", path.display()))?;
            writeln!(file, "{}", json)?;
            eprintln!("Results written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            request,
            origin,
            development,
            value,
            category,
            origin_grain,
            development_grain,
            sequential,
            output,
        } => {
            let mut req = match request {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    serde_json::from_reader(file)
                        .with_context(|| format!("Invalid request in {}", path.display()))?
                }
                None => TriangleRequest::default(),
            };
            if let Some(col) = origin { req.origin_col = col; }
            if let Some(col) = development { req.development_col = col; }
            if let Some(col) = value { req.value_col = col; }
            if category.is_some() { req.category_col = category; }
            if origin_grain.is_some() { req.origin_grain = origin_grain; }
            if development_grain.is_some() { req.development_grain = development_grain; }
            if sequential { req.parallel = false; }

            let records = load_records(&input)?;
            let built = build_triangles(&records, &req)?;
            if built.coerced_values > 0 {
                eprintln!("{} non-numeric value cell(s) counted as 0", built.coerced_values);
            }
            write_json(&built.to_output(&req.origin_col), output.as_deref())?;
        }

        Commands::Summary { input, origin, value, output } => {
            let records = load_records(&input)?;
            let totals = origin_totals(&records, &origin, &value)?;
            write_json(&totals, output.as_deref())?;
        }

        Commands::Profile { input, output } => {
            let records = load_records(&input)?;
            let columns = profile_columns(&records);
            let grains = columns
                .date_like
                .iter()
                .map(|c| (c.clone(), aggregation_options(&records, c)))
                .collect();
            write_json(&ProfileReport { columns, grains }, output.as_deref())?;
        }
    }

    Ok(())
}
