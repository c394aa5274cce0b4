//! Draft-prep CLI Module
//!
//! Command-line interface for building features, training and prediction.

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::inference::{default_models, make_predictions, ModelArtifact, ModelRegistry};
use crate::preprocessing::{FitPolicy, ScalerPolicy};
use crate::runner::{run_pipeline, target_labels, PipelineConfig, PipelinePaths, PipelineReport};
use crate::table::{Schema, Table};
use crate::training::{fit_assess_classifier, labels_to_f64};
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "draft-prep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Feature preprocessing and models for draft prediction")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean, encode, scale, balance and split the raw datasets
    BuildFeatures {
        /// Raw training data (with the target column)
        #[arg(long, default_value = "data/raw/train.csv")]
        train: PathBuf,

        /// Raw test data
        #[arg(long, default_value = "data/raw/test.csv")]
        test: PathBuf,

        /// Output directory for the six split files
        #[arg(short, long, default_value = "data/processed")]
        output: PathBuf,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fit policy (per-dataset, fit-on-train)
        #[arg(long)]
        fit_policy: Option<String>,

        /// Seed for balancing and splitting
        #[arg(long)]
        seed: Option<u64>,

        /// Neighbours used by the class balancer
        #[arg(long)]
        k_neighbors: Option<usize>,

        /// Skip columns to drop that are not present
        #[arg(long)]
        lenient_drop: bool,

        /// Zero-variance column handling (error, passthrough)
        #[arg(long)]
        constant_columns: Option<String>,

        /// Also write the processed test features to X_predict.csv
        #[arg(long)]
        predict_features: bool,
    },

    /// Train the default models on processed splits and save them
    Train {
        /// Directory holding X_train/y_train/X_val/y_val
        #[arg(short, long, default_value = "data/processed")]
        data: PathBuf,

        /// Directory to save model artifacts into
        #[arg(short, long, default_value = "models")]
        models: PathBuf,
    },

    /// Score processed features with the saved models
    Predict {
        /// Directory holding model artifacts
        #[arg(short, long, default_value = "models")]
        models: PathBuf,

        /// Processed feature file
        #[arg(short, long)]
        data: PathBuf,

        /// Output predictions file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show schema and missing values of a dataset
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Overrides for the pipeline configuration taken from command-line flags
#[derive(Debug, Default)]
pub struct BuildOverrides {
    pub fit_policy: Option<String>,
    pub seed: Option<u64>,
    pub k_neighbors: Option<usize>,
    pub lenient_drop: bool,
    pub constant_columns: Option<String>,
    pub predict_features: bool,
}

impl BuildOverrides {
    /// Apply every flag that was given on top of `config`
    pub fn apply(&self, mut config: PipelineConfig) -> anyhow::Result<PipelineConfig> {
        if let Some(policy) = &self.fit_policy {
            config.preprocessing.fit_policy = match policy.as_str() {
                "per-dataset" => FitPolicy::PerDataset,
                "fit-on-train" => FitPolicy::FitOnTrain,
                _ => bail!("Invalid fit policy: {}", policy),
            };
        }
        if let Some(policy) = &self.constant_columns {
            config.preprocessing.constant_columns = match policy.as_str() {
                "error" => ScalerPolicy::Error,
                "passthrough" => ScalerPolicy::Passthrough,
                _ => bail!("Invalid constant column policy: {}", policy),
            };
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(k) = self.k_neighbors {
            config.balance.k_neighbors = k;
        }
        if self.lenient_drop {
            config.preprocessing.strict_drop = false;
        }
        if self.predict_features {
            config.write_predict_features = true;
        }
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_build_features(
    train: &Path,
    test: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &BuildOverrides,
) -> anyhow::Result<()> {
    section("Build Features");

    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let config = overrides.apply(config)?;

    step_run("Running pipeline");
    let start = Instant::now();
    let report = run_pipeline(&config, &PipelinePaths::new(train, test, output))?;
    step_done(&format!("{:?}", start.elapsed()));

    print_report(&report);
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!();
    println!(
        "  {:<20} {} / {}",
        muted("Rows loaded"),
        report.rows_loaded.0,
        report.rows_loaded.1
    );
    println!(
        "  {:<20} {} / {}",
        muted("Rows kept"),
        report.rows_after_filter.0,
        report.rows_after_filter.1
    );
    println!(
        "  {:<20} {} numeric, {} categorical",
        muted("Features"),
        report.schema.numeric_columns().len(),
        report.schema.categorical_columns().len()
    );
    for (label, &before) in &report.class_counts_before {
        let after = report.class_counts_after.get(label).copied().unwrap_or(0);
        println!(
            "  {:<20} {} → {}",
            muted(&format!("Class {}", label)),
            before,
            after.to_string().white().bold()
        );
    }
    println!(
        "  {:<20} {} / {} / {}",
        muted("Train / val / test"),
        report.split_sizes.train,
        report.split_sizes.validation,
        report.split_sizes.test
    );
    println!();
    for path in &report.outputs {
        step_ok(&path.display().to_string());
    }
    println!();
}

/// The single label column of a target file
fn label_column(table: &Table) -> anyhow::Result<&crate::table::Column> {
    match table.columns() {
        [column] => Ok(column),
        other => bail!("expected one label column, found {}", other.len()),
    }
}

pub fn cmd_train(data_dir: &Path, models_dir: &Path) -> anyhow::Result<()> {
    section("Train");

    step_run("Loading splits");
    let start = Instant::now();
    let loader = DataLoader::new();
    let x_train = loader.load_csv(data_dir.join("X_train.csv"))?;
    let y_train = loader.load_csv(data_dir.join("y_train.csv"))?;
    let x_val = loader.load_csv(data_dir.join("X_val.csv"))?;
    let y_val = loader.load_csv(data_dir.join("y_val.csv"))?;

    let feature_names: Vec<String> = x_train.column_names().iter().map(|s| s.to_string()).collect();
    let columns: Vec<&str> = feature_names.iter().map(|s| s.as_str()).collect();
    let xt = x_train.to_array2(&columns)?;
    let xv = x_val.to_array2(&columns)?;
    let yt = labels_to_f64(&target_labels(label_column(&y_train)?)?);
    let yv = labels_to_f64(&target_labels(label_column(&y_val)?)?);
    step_done(&format!(
        "{} train / {} val rows × {} features in {:?}",
        xt.nrows(),
        xv.nrows(),
        xt.ncols(),
        start.elapsed()
    ));

    let registry = ModelRegistry::new(models_dir);
    for (spec, model) in default_models() {
        step_run(&format!("Training {}", spec.name.cyan()));
        let start = Instant::now();
        let (model, report) = fit_assess_classifier(model, &xt, &yt, &xv, &yv)?;
        step_done(&format!("{:?}", start.elapsed()));

        println!(
            "  {:<24} {}",
            muted("Training AUROC"),
            format!("{:.2}", report.train).white().bold()
        );
        println!(
            "  {:<24} {}",
            muted("Validation AUROC"),
            format!("{:.2}", report.validation).white().bold()
        );

        let path = registry.save(&spec, &ModelArtifact::new(feature_names.clone(), model))?;
        step_ok(&format!("Saved → {}", path.display()));
    }

    println!();
    Ok(())
}

pub fn cmd_predict(
    models_dir: &Path,
    data_path: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Predict");

    step_run("Loading models");
    let models = ModelRegistry::new(models_dir).load_models()?;
    step_done(&format!("{} model(s)", models.len()));

    step_run("Scoring");
    let features = DataLoader::new().load_csv(data_path)?;
    let predictions = make_predictions(&models, &features)?;
    step_done(&format!("{} rows", predictions.n_rows()));

    match output {
        Some(path) => {
            DataSaver::save_csv(&predictions, path)?;
            step_ok(&format!("Saved → {}", path.display()));
        }
        None => {
            println!();
            let header: Vec<String> = predictions
                .column_names()
                .iter()
                .map(|n| format!("{:>18}", n))
                .collect();
            println!("  {}", muted(&header.join("")));
            let columns = predictions
                .columns()
                .iter()
                .map(|c| c.to_dense())
                .collect::<crate::error::Result<Vec<_>>>()?;
            for row in 0..predictions.n_rows().min(10) {
                let line: String = columns.iter().map(|c| format!("{:>18.4}", c[row])).collect();
                println!("  {}", line);
            }
            if predictions.n_rows() > 10 {
                println!("  {}", dim(&format!("… {} more rows", predictions.n_rows() - 10)));
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let table = DataLoader::new().load_csv(data_path)?;
    let schema = Schema::infer(&table, &[]);

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), table.n_rows());
    println!("  {:<12} {}", muted("Columns"), table.n_cols());
    println!("  {:<12} {}", muted("Missing"), table.null_count());
    println!();

    println!("  {:<24} {:<12} {:>6}", muted("Column"), muted("Kind"), muted("Nulls"));
    println!("  {}", dim(&"─".repeat(44)));

    for (name, kind) in schema.fields() {
        let nulls = table
            .column(name)
            .map(|c| c.data().null_count())
            .ok_or_else(|| anyhow!("column {} vanished", name))?;
        println!(
            "  {:<24} {:<12} {:>6}",
            name,
            format!("{:?}", kind).truecolor(140, 140, 140),
            nulls
        );
    }

    println!();
    Ok(())
}
