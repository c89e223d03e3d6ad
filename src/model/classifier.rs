//! Churn classifier
//!
//! The pipeline only needs `predict` and, optionally, class probabilities
//! over the transformed matrix. [`LogisticChurnModel`] provides both with a
//! linfa logistic regression.

use anyhow::{Context, Result};
use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::pipeline::{ArtifactStore, PipelineResult, StagedWrite};

/// Default store key for the fitted model
pub const DEFAULT_MODEL_NAME: &str = "LogisticRegression";

/// Label value that means the customer churned
pub const CHURN_LABEL: usize = 1;

/// Capability contract of a fitted binary classifier
pub trait ChurnClassifier {
    /// Predicted label (0 or 1) for every row
    fn predict(&self, x: &Array2<f64>) -> Array1<usize>;

    /// `[p_class0, p_class1]` for every row, if the model can estimate it
    fn predict_proba(&self, _x: &Array2<f64>) -> Option<Array2<f64>> {
        None
    }
}

/// Hyperparameters of the logistic regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    pub max_iterations: u64,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            alpha: 1.0,
        }
    }
}

/// Fitted logistic regression over the scaled feature matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogisticChurnModel {
    inner: FittedLogisticRegression<f64, usize>,
}

impl LogisticChurnModel {
    /// Fit on scaled features and 0/1 labels. Both classes must be present.
    pub fn fit(params: LogisticParams, x: &Array2<f64>, y: &Array1<usize>) -> Result<Self> {
        if x.nrows() != y.len() {
            anyhow::bail!(
                "Feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            );
        }
        let churned = y.iter().filter(|&&label| label == CHURN_LABEL).count();
        if churned == 0 || churned == y.len() {
            anyhow::bail!(
                "Training labels contain a single class ({} of {} rows churned); need both 0 and 1",
                churned,
                y.len()
            );
        }

        let dataset = Dataset::new(x.clone(), y.clone());
        let inner = LogisticRegression::default()
            .max_iterations(params.max_iterations)
            .alpha(params.alpha)
            .fit(&dataset)
            .context("Logistic regression failed to converge")?;

        Ok(Self { inner })
    }

    /// Persist under `name` in `store`.
    pub fn save(&self, store: &ArtifactStore, name: &str) -> PipelineResult<()> {
        store.put_json(name, self)
    }

    /// Stage under `name` so it is published with the rest of `group`.
    pub fn stage(&self, store: &ArtifactStore, name: &str, group: &mut StagedWrite) -> PipelineResult<()> {
        store.stage_json(group, name, self)
    }

    pub fn load(store: &ArtifactStore, name: &str) -> PipelineResult<Self> {
        store.get_json(name)
    }

    /// Probability of churn for every row
    fn churn_probabilities(&self, x: &Array2<f64>) -> Array1<f64> {
        let positive = self.inner.predict_probabilities(x);
        if self.inner.labels().pos.class == CHURN_LABEL {
            positive
        } else {
            positive.mapv(|p| 1.0 - p)
        }
    }
}

impl ChurnClassifier for LogisticChurnModel {
    fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        self.inner.predict(x)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array2<f64>> {
        let churn = self.churn_probabilities(x);
        let stay = churn.mapv(|p| 1.0 - p);
        ndarray::stack(Axis(1), &[stay.view(), churn.view()]).ok()
    }
}

/// Outcome of scoring one customer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: usize,
    /// `[p_class0, p_class1]` when the model exposes probabilities
    pub probabilities: Option<[f64; 2]>,
}

impl Prediction {
    pub fn is_churn(&self) -> bool {
        self.label == CHURN_LABEL
    }

    /// Probability of churn, `0.0` when the model has no probabilities
    pub fn churn_probability(&self) -> f64 {
        self.probabilities.map(|p| p[1]).unwrap_or(0.0)
    }

    /// Probability of staying, `0.0` when the model has no probabilities
    pub fn stay_probability(&self) -> f64 {
        self.probabilities.map(|p| p[0]).unwrap_or(0.0)
    }
}

/// Score the first row of `features`.
pub fn predict_one<M: ChurnClassifier + ?Sized>(model: &M, features: &Array2<f64>) -> Result<Prediction> {
    if features.nrows() == 0 {
        anyhow::bail!("Cannot predict on an empty feature matrix");
    }
    let label = ChurnClassifier::predict(model, features)
        .get(0)
        .copied()
        .context("Model returned no prediction")?;
    let probabilities = ChurnClassifier::predict_proba(model, features)
        .filter(|p| p.ncols() == 2 && p.nrows() > 0)
        .map(|p| [p[[0, 0]], p[[0, 1]]]);

    Ok(Prediction {
        label,
        probabilities,
    })
}
