//! Pipeline stages and dataset labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the feature-building pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Load,
    DropColumns,
    SentinelImpute,
    FilterRows,
    ImputeNumeric,
    ImputeCategorical,
    Encode,
    Scale,
    Balance,
    Split,
    Write,
}

impl Stage {
    /// Stages applied to each dataset before any state is fitted
    pub const CLEANING: [Stage; 3] = [Stage::DropColumns, Stage::SentinelImpute, Stage::FilterRows];

    /// Fitted stages, each fitted on the output of the previous one
    pub const TRANSFORMS: [Stage; 4] = [
        Stage::ImputeNumeric,
        Stage::ImputeCategorical,
        Stage::Encode,
        Stage::Scale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::DropColumns => "drop_columns",
            Stage::SentinelImpute => "sentinel_impute",
            Stage::FilterRows => "filter_rows",
            Stage::ImputeNumeric => "impute_numeric",
            Stage::ImputeCategorical => "impute_categorical",
            Stage::Encode => "encode",
            Stage::Scale => "scale",
            Stage::Balance => "balance",
            Stage::Split => "split",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input a stage was processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    Train,
    Test,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Train => f.write_str("train"),
            Dataset::Test => f.write_str("test"),
        }
    }
}
