//! draft-prep - Main Entry Point
//!
//! Builds draft-prediction features and trains and applies the models.

use clap::Parser;
use draft_prep::cli::{cmd_build_features, cmd_info, cmd_predict, cmd_train, BuildOverrides, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "draft_prep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::BuildFeatures {
            train,
            test,
            output,
            config,
            fit_policy,
            seed,
            k_neighbors,
            lenient_drop,
            constant_columns,
            predict_features,
        } => {
            let overrides = BuildOverrides {
                fit_policy,
                seed,
                k_neighbors,
                lenient_drop,
                constant_columns,
                predict_features,
            };
            cmd_build_features(&train, &test, &output, config.as_deref(), &overrides)?;
        }
        Commands::Train { data, models } => {
            cmd_train(&data, &models)?;
        }
        Commands::Predict { models, data, output } => {
            cmd_predict(&models, &data, output.as_deref())?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
