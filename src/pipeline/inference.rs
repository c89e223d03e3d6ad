//! Inference-time transform
//!
//! Replays the persisted training transform on a single customer record:
//! every schema column is required, categoricals go through the stored
//! encoders and the row is scaled with the stored ranges.

use ndarray::{Array2, ArrayView1};

use super::artifacts::{ArtifactSet, ArtifactStore, ColumnSchema};
use super::encoder::EncodingWarning;
use super::error::PipelineResult;
use super::record::RawRecord;

/// A single transformed record ready for the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    /// One row, columns in schema order
    pub features: Array2<f64>,
    pub warnings: Vec<EncodingWarning>,
}

/// Holds an independent snapshot of the artifacts for a prediction
#[derive(Debug, Clone)]
pub struct InferenceTransform {
    artifacts: ArtifactSet,
}

impl InferenceTransform {
    /// Load the artifact set; fails with `ArtifactsMissing` if any piece is absent.
    pub fn load(store: &ArtifactStore) -> PipelineResult<Self> {
        Ok(Self {
            artifacts: ArtifactSet::load(store)?,
        })
    }

    pub fn from_artifacts(artifacts: ArtifactSet) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.artifacts.columns
    }

    /// Encode and scale one record.
    pub fn transform(&self, record: &RawRecord) -> PipelineResult<EncodedRecord> {
        let ArtifactSet {
            columns,
            encoders,
            scaler,
        } = &self.artifacts;

        let (row, warnings) = encoders.encode_row(columns, |col| record.get(col))?;
        let scaled = scaler.transform_row(ArrayView1::from(row.as_slice()))?;
        let features = Array2::from_shape_vec((1, scaled.len()), scaled)?;

        Ok(EncodedRecord { features, warnings })
    }
}
