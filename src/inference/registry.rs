//! On-disk model registry

use super::{ModelArtifact, SavedModel};
use crate::error::{DraftError, Result};
use crate::training::{AdaBoostClassifier, LogisticRegression};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Display name of a model and the artifact file stem it is stored under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub artifact: String,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
        }
    }
}

/// The model set trained by default, untrained
pub fn default_models() -> Vec<(ModelSpec, SavedModel)> {
    vec![
        (
            ModelSpec::new("polynomial_2", "log_poly_2"),
            SavedModel::Logistic(LogisticRegression::polynomial(2)),
        ),
        (
            ModelSpec::new("adaboost_default", "adaboost_default"),
            SavedModel::AdaBoost(AdaBoostClassifier::default()),
        ),
    ]
}

/// Directory of JSON model artifacts, `<dir>/<artifact>.json`
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    dir: PathBuf,
    specs: Vec<ModelSpec>,
}

impl ModelRegistry {
    /// Registry over the default model set
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let specs = default_models().into_iter().map(|(spec, _)| spec).collect();
        Self::with_specs(dir, specs)
    }

    pub fn with_specs(dir: impl Into<PathBuf>, specs: Vec<ModelSpec>) -> Self {
        Self {
            dir: dir.into(),
            specs,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn specs(&self) -> &[ModelSpec] {
        &self.specs
    }

    pub fn artifact_path(&self, spec: &ModelSpec) -> PathBuf {
        self.dir.join(format!("{}.json", spec.artifact))
    }

    /// Write one fitted model, creating the directory if needed
    pub fn save(&self, spec: &ModelSpec, artifact: &ModelArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| DraftError::io(&self.dir, e))?;
        let path = self.artifact_path(spec);
        let json = serde_json::to_string_pretty(artifact)?;
        fs::write(&path, json).map_err(|e| DraftError::io(&path, e))?;
        info!(model = %spec.name, path = %path.display(), "Saved model");
        Ok(path)
    }

    /// Load every registered model, in registry order.
    ///
    /// Fails with `ModelNotFound` listing every missing artifact before
    /// reading any of them.
    pub fn load_models(&self) -> Result<Vec<(String, ModelArtifact)>> {
        let missing: Vec<String> = self
            .specs
            .iter()
            .map(|spec| self.artifact_path(spec))
            .filter(|path| !path.is_file())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        if !missing.is_empty() {
            return Err(DraftError::ModelNotFound {
                dir: self.dir.clone(),
                missing: missing.join(", "),
            });
        }

        self.specs
            .iter()
            .map(|spec| {
                let path = self.artifact_path(spec);
                let json = fs::read_to_string(&path).map_err(|e| DraftError::io(&path, e))?;
                let artifact: ModelArtifact = serde_json::from_str(&json)?;
                debug!(model = %spec.name, path = %path.display(), "Loaded model");
                Ok((spec.name.clone(), artifact))
            })
            .collect()
    }
}
