//! Data preprocessing module
//!
//! Cleaning and fitted transforms that turn raw player tables into scaled,
//! fully numeric feature tables:
//! - Column dropping, sentinel filling and row filtering
//! - Mean / most-frequent imputation
//! - Label encoding of categorical columns
//! - Standard scaling of numeric columns

mod cleaning;
mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use cleaning::{drop_columns, drop_incomplete_rows, fill_sentinels};
pub use config::{FitPolicy, PreprocessingConfig};
pub use encoder::LabelEncoder;
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::{FeatureBuilder, PreparedData, TransformState};
pub use scaler::{ScalerParams, ScalerPolicy, StandardScaler};
