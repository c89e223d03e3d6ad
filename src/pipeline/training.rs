//! Training-time transform
//!
//! Turns a raw labeled table into scaled train/test matrices plus the
//! artifacts that let inference reproduce the exact same encoding:
//!
//! 1. drop exact duplicates, then rows with any missing value
//! 2. drop the leakage columns
//! 3. split off the target; the remaining names become the column schema
//! 4. encode categoricals (learned index for gender, fixed vocabularies for
//!    subscription type and contract length)
//! 5. fit the min-max scaler over the full encoded matrix and apply it
//! 6. seeded 80/20 train/test split
//!
//! Nothing is persisted here: the caller saves [`TrainingOutput::artifacts`]
//! once the whole run has succeeded.

use std::collections::{BTreeMap, HashMap};

use ndarray::{Array1, Array2, Axis};
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::artifacts::{ArtifactSet, ColumnSchema, EncoderSet};
use super::encoder::{CategoricalEncoding, EncodingWarning};
use super::error::{PipelineError, PipelineResult};
use super::record::{RawTable, RawValue};
use super::scaler::ScalerParams;
use super::schema::{fixed_vocabularies, required_columns, DEFAULT_TARGET, LEAKAGE_COLUMNS, LEARNED_COLUMNS};

/// Seed used by the reference setup for the train/test partition
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of rows held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Settings for one training transform
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub target: String,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Scaled matrices and labels, partitioned for fitting and evaluation
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
}

/// Row accounting for the cleaning step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub incomplete_removed: usize,
    pub rows_kept: usize,
}

/// Everything produced by a training transform
#[derive(Debug, Clone)]
pub struct TrainingOutput {
    pub split: DataSplit,
    pub artifacts: ArtifactSet,
    pub cleaning: CleaningStats,
    pub dropped_columns: Vec<String>,
    /// Fixed-mapping fallbacks hit while encoding the training rows
    pub warnings: Vec<EncodingWarning>,
}

/// Fits the feature transformation on a labeled table
#[derive(Debug, Clone, Default)]
pub struct TrainingTransform {
    config: TrainingConfig,
}

impl TrainingTransform {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the transform on a polars frame.
    pub fn fit(&self, df: &DataFrame) -> PipelineResult<TrainingOutput> {
        self.fit_table(RawTable::from_dataframe(df)?)
    }

    /// Run the transform on an already-extracted table.
    pub fn fit_table(&self, mut table: RawTable) -> PipelineResult<TrainingOutput> {
        let target = self.config.target.as_str();
        for column in required_columns().into_iter().chain(std::iter::once(target)) {
            if table.column_index(column).is_none() {
                return Err(PipelineError::MissingColumn(column.to_string()));
            }
        }

        // 1. cleaning
        let rows_loaded = table.height();
        let duplicates_removed = table.drop_duplicates();
        let incomplete_removed = table.drop_incomplete();
        if table.height() == 0 {
            return Err(PipelineError::EmptyDataset);
        }
        let cleaning = CleaningStats {
            rows_loaded,
            duplicates_removed,
            incomplete_removed,
            rows_kept: table.height(),
        };

        // 2. leakage columns
        table.drop_columns(&LEAKAGE_COLUMNS);
        let dropped_columns = LEAKAGE_COLUMNS.iter().map(|c| c.to_string()).collect();

        // 3. features vs label
        let columns = ColumnSchema::new(
            table
                .columns()
                .iter()
                .filter(|c| c.as_str() != target)
                .cloned()
                .collect(),
        );
        let target_idx = table
            .column_index(target)
            .ok_or_else(|| PipelineError::MissingColumn(target.to_string()))?;
        let labels = extract_labels(&table, target_idx, target)?;

        // 4. encoders
        let encoders = fit_encoders(&table)?;
        let index: HashMap<&str, usize> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut values = Vec::with_capacity(table.height() * columns.len());
        let mut warnings = Vec::new();
        for row in table.rows() {
            let (encoded, row_warnings) = encoders.encode_row(&columns, |col| {
                index.get(col).and_then(|&i| row[i].as_ref())
            })?;
            values.extend(encoded);
            warnings.extend(row_warnings);
        }
        let matrix = Array2::from_shape_vec((table.height(), columns.len()), values)?;

        // 5. scaling
        let scaler = ScalerParams::fit(&matrix)?;
        let scaled = scaler.transform(&matrix)?;

        // 6. split
        let split = train_test_split(&scaled, &labels, self.config.test_size, self.config.seed);

        Ok(TrainingOutput {
            split,
            artifacts: ArtifactSet {
                columns,
                encoders,
                scaler,
            },
            cleaning,
            dropped_columns,
            warnings,
        })
    }
}

fn fit_encoders(table: &RawTable) -> PipelineResult<EncoderSet> {
    let mut encoders = BTreeMap::new();

    for column in LEARNED_COLUMNS {
        let idx = table
            .column_index(column)
            .ok_or_else(|| PipelineError::MissingColumn(column.to_string()))?;
        let observed: Vec<String> = table
            .rows()
            .iter()
            .filter_map(|row| row[idx].as_ref().map(RawValue::as_category))
            .collect();
        encoders.insert(column.to_string(), CategoricalEncoding::fit_learned(&observed));
    }

    for (column, vocabulary) in fixed_vocabularies() {
        encoders.insert(column.to_string(), CategoricalEncoding::fixed(vocabulary));
    }

    Ok(EncoderSet::new(encoders))
}

fn extract_labels(table: &RawTable, idx: usize, target: &str) -> PipelineResult<Array1<usize>> {
    table
        .rows()
        .iter()
        .map(|row| {
            let raw = row[idx]
                .as_ref()
                .ok_or_else(|| PipelineError::MissingColumn(target.to_string()))?;
            match raw.as_number() {
                Some(v) if v == 0.0 => Ok(0),
                Some(v) if v == 1.0 => Ok(1),
                _ => Err(PipelineError::InvalidTarget {
                    column: target.to_string(),
                    value: raw.to_string(),
                }),
            }
        })
        .collect()
}

/// Shuffle row indices with a seeded RNG and hold out `ceil(n * test_size)` rows.
///
/// The same input, fraction and seed always yield the same partition.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<usize>,
    test_size: f64,
    seed: u64,
) -> DataSplit {
    let n = x.nrows();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_size).ceil() as usize;
    let n_test = n_test.min(n);
    let (test_idx, train_idx) = indices.split_at(n_test);

    DataSplit {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    }
}
