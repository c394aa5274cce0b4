//! draft-prep - Feature preprocessing for draft prediction
//!
//! This crate turns raw player-season tables into model-ready splits:
//! - Cleaning: column dropping, sentinel filling, row filtering
//! - Transforms: imputation, label encoding, standard scaling
//! - Class balancing with SMOTE and seeded train/validation/test splitting
//! - Training, scoring and persisting the downstream classifiers
//!
//! # Modules
//!
//! ## Data
//! - [`table`] - In-memory columns, tables and schema inference
//! - [`utils`] - CSV loading and atomic output writing
//!
//! ## Pipeline
//! - [`preprocessing`] - Cleaning stages and fitted transforms
//! - [`synthetic`] - Minority oversampling (SMOTE)
//! - [`runner`] - End-to-end feature build
//!
//! ## Models
//! - [`training`] - Classifiers, splitting and AUROC
//! - [`inference`] - Model artifacts, registry and prediction
//!
//! ## Services
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data
pub mod table;
pub mod utils;

// Pipeline
pub mod preprocessing;
pub mod synthetic;
pub mod runner;

// Models
pub mod training;
pub mod inference;

// Services
pub mod cli;

pub use error::{DraftError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{DraftError, Result};

    // Data
    pub use crate::table::{Column, ColumnData, ColumnKind, Schema, Table};
    pub use crate::utils::{DataLoader, DataSaver, DatasetWriter};

    // Preprocessing
    pub use crate::preprocessing::{
        FeatureBuilder, FitPolicy, PreparedData, PreprocessingConfig, ScalerPolicy,
    };

    // Synthetic data
    pub use crate::synthetic::{BalanceConfig, Sampler, SMOTE};

    // Pipeline
    pub use crate::runner::{run_pipeline, Dataset, PipelineConfig, PipelinePaths, PipelineReport, Stage};

    // Training
    pub use crate::training::{
        roc_auc_score, split_dataset, AdaBoostClassifier, AurocReport, Classifier,
        LogisticRegression, SplitConfig,
    };

    // Inference
    pub use crate::inference::{make_predictions, ModelArtifact, ModelRegistry, SavedModel};
}
