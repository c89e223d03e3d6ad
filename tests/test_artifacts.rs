//! Tests for the artifact store and the grouped artifact set

use churnrisk::pipeline::{
    ArtifactSet, ArtifactStore, PipelineError, StagedWrite, TrainingTransform,
    COLUMNS_ARTIFACT, ENCODERS_ARTIFACT, SCALER_ARTIFACT,
};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_put_then_get_returns_blob() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    store.put("columns", b"[\"Age\"]").unwrap();

    assert!(store.exists("columns"));
    assert_eq!(store.get("columns").unwrap(), b"[\"Age\"]".to_vec());
}

#[test]
fn test_put_overwrites_previous_value() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    store.put("scaler", b"first").unwrap();
    store.put("scaler", b"second").unwrap();

    assert_eq!(store.get("scaler").unwrap(), b"second".to_vec());
}

#[test]
fn test_get_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    let err = store.get("nope").unwrap_err();
    assert!(
        matches!(err, PipelineError::NotFound { ref name } if name == "nope"),
        "Expected NotFound, got {:?}",
        err
    );
    assert!(!store.exists("nope"));
}

#[test]
fn test_store_creates_root_on_first_write() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("models").join("artifacts");
    let store = ArtifactStore::new(&root);

    assert!(!root.exists(), "Constructing a store must not touch disk");
    store.put("columns", b"[]").unwrap();
    assert!(root.is_dir());
}

#[test]
fn test_blobs_survive_a_new_store_instance() {
    let temp_dir = TempDir::new().unwrap();
    ArtifactStore::new(temp_dir.path())
        .put_json("columns", &vec!["Age".to_string(), "Tenure".to_string()])
        .unwrap();

    let reopened = ArtifactStore::new(temp_dir.path());
    let columns: Vec<String> = reopened.get_json("columns").unwrap();
    assert_eq!(columns, vec!["Age", "Tenure"]);
}

#[test]
fn test_failed_group_write_leaves_nothing_behind() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    // A directory squatting on the staging path makes the third write fail
    std::fs::create_dir_all(temp_dir.path().join("scaler.json.tmp")).unwrap();

    let result = store.put_group(&[
        ("columns", b"[]".to_vec()),
        ("encoders", b"{}".to_vec()),
        ("scaler", b"{}".to_vec()),
    ]);

    assert!(result.is_err());
    assert!(!store.exists("columns"), "No artifact may be published");
    assert!(!store.exists("encoders"), "No artifact may be published");
    assert!(!temp_dir.path().join("columns.json.tmp").exists());
    assert!(!temp_dir.path().join("encoders.json.tmp").exists());
}

#[test]
fn test_failed_group_write_keeps_previous_generation() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());
    store.put("columns", b"old").unwrap();

    std::fs::create_dir_all(temp_dir.path().join("encoders.json.tmp")).unwrap();
    let result = store.put_group(&[("columns", b"new".to_vec()), ("encoders", b"new".to_vec())]);

    assert!(result.is_err());
    assert_eq!(store.get("columns").unwrap(), b"old".to_vec());
}

#[test]
fn test_artifact_set_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());
    let output = TrainingTransform::default()
        .fit(&common::create_sample_churn_dataframe())
        .unwrap();

    assert!(!ArtifactSet::exists(&store));
    output.artifacts.save(&store).unwrap();
    assert!(ArtifactSet::exists(&store));

    for name in [COLUMNS_ARTIFACT, ENCODERS_ARTIFACT, SCALER_ARTIFACT] {
        assert!(store.exists(name), "Artifact '{}' should be stored", name);
    }

    let loaded = ArtifactSet::load(&store).unwrap();
    assert_eq!(loaded, output.artifacts);
}

#[test]
fn test_load_with_missing_piece_is_artifacts_missing() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());
    let output = TrainingTransform::default()
        .fit(&common::create_sample_churn_dataframe())
        .unwrap();
    output.artifacts.save(&store).unwrap();

    std::fs::remove_file(store.path_for(SCALER_ARTIFACT)).unwrap();

    let err = ArtifactSet::load(&store).unwrap_err();
    assert!(
        matches!(err, PipelineError::ArtifactsMissing { ref name } if name == SCALER_ARTIFACT),
        "Expected ArtifactsMissing(scaler), got {:?}",
        err
    );
}

#[test]
fn test_encoders_artifact_is_tagged_json() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());
    let output = TrainingTransform::default()
        .fit(&common::create_sample_churn_dataframe())
        .unwrap();
    output.artifacts.save(&store).unwrap();

    let json: serde_json::Value = store.get_json(ENCODERS_ARTIFACT).unwrap();
    assert_eq!(json["Gender"]["kind"], "learned_index");
    assert_eq!(json["Gender"]["classes"][0], "Female");
    assert_eq!(json["Subscription Type"]["kind"], "fixed_mapping");
    assert_eq!(json["Subscription Type"]["mapping"]["Premium"], 2);
}

#[test]
fn test_staged_group_spans_stores() {
    let temp_dir = TempDir::new().unwrap();
    let artifacts = ArtifactStore::new(temp_dir.path().join("artifacts"));
    let models = ArtifactStore::new(temp_dir.path().join("models"));

    let mut group = StagedWrite::new();
    artifacts.stage(&mut group, "encoders", b"{}").unwrap();
    models.stage(&mut group, "LogisticRegression", b"{}").unwrap();
    assert_eq!(group.len(), 2);
    assert!(!artifacts.exists("encoders"), "Staged blobs stay hidden");
    assert!(!models.exists("LogisticRegression"), "Staged blobs stay hidden");

    group.commit().unwrap();
    assert!(artifacts.exists("encoders"));
    assert!(models.exists("LogisticRegression"));
    assert!(!temp_dir.path().join("models").join("LogisticRegression.json.tmp").exists());
}

#[test]
fn test_dropped_group_discards_staging_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    {
        let mut group = StagedWrite::new();
        store.stage(&mut group, "columns", b"[]").unwrap();
        assert!(temp_dir.path().join("columns.json.tmp").exists());
    }

    assert!(!temp_dir.path().join("columns.json.tmp").exists());
    assert!(!store.exists("columns"));
}

#[test]
fn test_failed_commit_restores_previous_generation() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());
    store
        .put_group(&[("columns", b"old".to_vec()), ("encoders", b"old".to_vec())])
        .unwrap();

    // Occupy the backup slot of the second blob so moving it aside fails
    let blocker = temp_dir.path().join("encoders.json.bak");
    std::fs::create_dir_all(blocker.join("occupied")).unwrap();

    let result = store.put_group(&[("columns", b"new".to_vec()), ("encoders", b"new".to_vec())]);

    assert!(result.is_err());
    assert_eq!(store.get("columns").unwrap(), b"old".to_vec());
    assert_eq!(store.get("encoders").unwrap(), b"old".to_vec());
    assert!(!temp_dir.path().join("columns.json.tmp").exists());
    assert!(!temp_dir.path().join("encoders.json.tmp").exists());
    assert!(!temp_dir.path().join("columns.json.bak").exists());
}

#[test]
fn test_successful_commit_leaves_no_backups() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    store.put("scaler", b"first").unwrap();
    store.put("scaler", b"second").unwrap();

    assert!(!temp_dir.path().join("scaler.json.bak").exists());
    assert!(!temp_dir.path().join("scaler.json.tmp").exists());
}
