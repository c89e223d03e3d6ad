//! Durable storage of training artifacts
//!
//! [`ArtifactStore`] keeps named JSON blobs in a directory, one file per
//! name. [`ArtifactSet`] bundles the three artifacts produced by a training
//! run (column schema, encoders, scaler) and is always written as a group.
//! [`StagedWrite`] extends that group across stores so the model blob is
//! published together with the artifacts it was fitted on.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::encoder::{CategoricalEncoding, EncodingWarning};
use super::error::{PipelineError, PipelineResult};
use super::record::RawValue;
use super::scaler::ScalerParams;

pub const COLUMNS_ARTIFACT: &str = "columns";
pub const ENCODERS_ARTIFACT: &str = "encoders";
pub const SCALER_ARTIFACT: &str = "scaler";

const BLOB_EXTENSION: &str = "json";
const STAGING_EXTENSION: &str = "json.tmp";
const BACKUP_EXTENSION: &str = "json.bak";

/// Directory-backed key-value store for named blobs
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Point a store at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, BLOB_EXTENSION))
    }

    fn staging_path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, STAGING_EXTENSION))
    }

    fn backup_path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, BACKUP_EXTENSION))
    }

    /// Persist `blob` under `name`, replacing any previous value.
    pub fn put(&self, name: &str, blob: &[u8]) -> PipelineResult<()> {
        self.put_group(&[(name, blob.to_vec())])
    }

    /// Persist several blobs so that either all of them or none replace
    /// the current values.
    pub fn put_group(&self, entries: &[(&str, Vec<u8>)]) -> PipelineResult<()> {
        let mut group = StagedWrite::new();
        for (name, blob) in entries {
            self.stage(&mut group, name, blob)?;
        }
        group.commit()
    }

    /// Write `blob` to the staging file for `name` and track it in `group`.
    ///
    /// Nothing is visible under `name` until the group is committed.
    pub fn stage(&self, group: &mut StagedWrite, name: &str, blob: &[u8]) -> PipelineResult<()> {
        fs::create_dir_all(&self.root)?;
        let entry = StagedEntry {
            staging: self.staging_path_for(name),
            live: self.path_for(name),
            backup: self.backup_path_for(name),
        };
        let staging = entry.staging.clone();
        group.entries.push(entry);
        fs::write(staging, blob)?;
        Ok(())
    }

    pub fn stage_json<T: Serialize>(
        &self,
        group: &mut StagedWrite,
        name: &str,
        value: &T,
    ) -> PipelineResult<()> {
        let blob = serde_json::to_vec_pretty(value)?;
        self.stage(group, name, &blob)
    }

    /// Most recently stored blob for `name`.
    pub fn get(&self, name: &str) -> PipelineResult<Vec<u8>> {
        match fs::read(self.path_for(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PipelineError::NotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    pub fn put_json<T: Serialize>(&self, name: &str, value: &T) -> PipelineResult<()> {
        let blob = serde_json::to_vec_pretty(value)?;
        self.put(name, &blob)
    }

    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> PipelineResult<T> {
        let blob = self.get(name)?;
        Ok(serde_json::from_slice(&blob)?)
    }
}

/// Blobs staged in one or more stores and published together.
///
/// [`commit`](Self::commit) moves the current files aside, renames every
/// staging file into place and restores the previous files if any step
/// fails. Dropping an uncommitted group removes its staging files.
#[derive(Debug, Default)]
pub struct StagedWrite {
    entries: Vec<StagedEntry>,
}

#[derive(Debug)]
struct StagedEntry {
    staging: PathBuf,
    live: PathBuf,
    backup: PathBuf,
}

impl StagedWrite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish every staged blob, or none of them.
    pub fn commit(mut self) -> PipelineResult<()> {
        let entries = std::mem::take(&mut self.entries);

        let mut backed_up: Vec<&StagedEntry> = Vec::new();
        for entry in &entries {
            if entry.live.exists() {
                if let Err(e) = fs::rename(&entry.live, &entry.backup) {
                    rollback(&[], &backed_up);
                    discard(&entries);
                    return Err(e.into());
                }
                backed_up.push(entry);
            }
        }

        let mut published: Vec<&StagedEntry> = Vec::new();
        for entry in &entries {
            if let Err(e) = fs::rename(&entry.staging, &entry.live) {
                rollback(&published, &backed_up);
                discard(&entries);
                return Err(e.into());
            }
            published.push(entry);
        }

        for entry in backed_up {
            let _ = fs::remove_file(&entry.backup);
        }
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        discard(&self.entries);
    }
}

/// Remove newly published files, then put the previous generation back.
fn rollback(published: &[&StagedEntry], backed_up: &[&StagedEntry]) {
    for entry in published {
        let _ = fs::remove_file(&entry.live);
    }
    for entry in backed_up {
        let _ = fs::rename(&entry.backup, &entry.live);
    }
}

fn discard(entries: &[StagedEntry]) {
    for entry in entries {
        let _ = fs::remove_file(&entry.staging);
    }
}

/// Ordered feature column names fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSchema(Vec<String>);

impl ColumnSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }
}

/// Categorical column name to its fitted encoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet(BTreeMap<String, CategoricalEncoding>);

impl EncoderSet {
    pub fn new(encoders: BTreeMap<String, CategoricalEncoding>) -> Self {
        Self(encoders)
    }

    pub fn get(&self, column: &str) -> Option<&CategoricalEncoding> {
        self.0.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoricalEncoding)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode one record into a numeric row ordered by `schema`.
    ///
    /// Training and inference both go through here, so a value always maps
    /// to the same number in both phases. `lookup` resolves a column name to
    /// its raw value.
    pub fn encode_row<'a, F>(
        &self,
        schema: &ColumnSchema,
        lookup: F,
    ) -> PipelineResult<(Vec<f64>, Vec<EncodingWarning>)>
    where
        F: Fn(&str) -> Option<&'a RawValue>,
    {
        let mut row = Vec::with_capacity(schema.len());
        let mut warnings = Vec::new();

        for column in schema.names() {
            let raw = lookup(column).ok_or_else(|| PipelineError::MissingColumn(column.clone()))?;

            match self.get(column) {
                Some(encoding) => {
                    let encoded = encoding.apply(column, &raw.as_category())?;
                    warnings.extend(encoded.warning);
                    row.push(f64::from(encoded.code));
                }
                None => {
                    let value = raw.as_number().ok_or_else(|| PipelineError::InvalidNumber {
                        column: column.clone(),
                        value: raw.to_string(),
                    })?;
                    row.push(value);
                }
            }
        }

        Ok((row, warnings))
    }
}

/// Everything needed to replay the training transform
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub columns: ColumnSchema,
    pub encoders: EncoderSet,
    pub scaler: ScalerParams,
}

impl ArtifactSet {
    /// Write all three artifacts as one group.
    pub fn save(&self, store: &ArtifactStore) -> PipelineResult<()> {
        let mut group = StagedWrite::new();
        self.stage(store, &mut group)?;
        group.commit()
    }

    /// Stage all three artifacts into `group`, e.g. next to the model blob.
    pub fn stage(&self, store: &ArtifactStore, group: &mut StagedWrite) -> PipelineResult<()> {
        store.stage_json(group, COLUMNS_ARTIFACT, &self.columns)?;
        store.stage_json(group, ENCODERS_ARTIFACT, &self.encoders)?;
        store.stage_json(group, SCALER_ARTIFACT, &self.scaler)
    }

    /// Load all three artifacts; an absent one means the model is untrained.
    pub fn load(store: &ArtifactStore) -> PipelineResult<Self> {
        Ok(Self {
            columns: load_required(store, COLUMNS_ARTIFACT)?,
            encoders: load_required(store, ENCODERS_ARTIFACT)?,
            scaler: load_required(store, SCALER_ARTIFACT)?,
        })
    }

    pub fn exists(store: &ArtifactStore) -> bool {
        [COLUMNS_ARTIFACT, ENCODERS_ARTIFACT, SCALER_ARTIFACT]
            .iter()
            .all(|name| store.exists(name))
    }
}

fn load_required<T: DeserializeOwned>(store: &ArtifactStore, name: &str) -> PipelineResult<T> {
    store.get_json(name).map_err(|e| match e {
        PipelineError::NotFound { name } => PipelineError::ArtifactsMissing { name },
        other => other,
    })
}
