//! Project directory layout
//!
//! Paths are derived from a single root. Nothing touches the filesystem
//! until the entry point calls [`ProjectPaths::initialize`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pipeline::ArtifactStore;

/// Default training file name, looked up in `data/raw`
pub const DEFAULT_DATASET: &str = "customer_churn_dataset-training-master.csv";

/// Directory layout of a churnrisk project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub raw_data_dir: PathBuf,
    pub processed_data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub figures_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("data");
        let models_dir = root.join("models");
        let reports_dir = root.join("reports");
        Self {
            raw_data_dir: data_dir.join("raw"),
            processed_data_dir: data_dir.join("processed"),
            artifacts_dir: models_dir.join("artifacts"),
            figures_dir: reports_dir.join("figures"),
            models_dir,
            reports_dir,
            root,
        }
    }

    /// Create every project directory. Safe to call more than once.
    pub fn initialize(&self) -> Result<()> {
        for dir in [
            &self.raw_data_dir,
            &self.processed_data_dir,
            &self.models_dir,
            &self.artifacts_dir,
            &self.reports_dir,
            &self.figures_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Store holding the column schema, encoders and scaler
    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.artifacts_dir)
    }

    /// Store holding fitted models
    pub fn model_store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.models_dir)
    }

    /// Resolve a dataset argument: absolute or existing paths are used as-is,
    /// bare names are looked up in `data/raw`.
    pub fn resolve_dataset(&self, dataset: &Path) -> PathBuf {
        if dataset.is_absolute() || dataset.exists() {
            dataset.to_path_buf()
        } else {
            self.raw_data_dir.join(dataset)
        }
    }

    pub fn evaluation_report_path(&self, model_name: &str) -> PathBuf {
        self.reports_dir.join(format!("{}_evaluation.json", model_name))
    }
}
