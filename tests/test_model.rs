//! Tests for the classifier and evaluation metrics

use churnrisk::model::{
    evaluate, predict_one, ChurnClassifier, LogisticChurnModel, LogisticParams, Prediction,
};
use churnrisk::pipeline::{ArtifactStore, InferenceTransform, TrainingOutput, TrainingTransform};
use ndarray::{array, Array1, Array2};
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::{create_scenario_record, create_synthetic_churn_dataframe};

fn synthetic_output() -> TrainingOutput {
    TrainingTransform::default()
        .fit(&create_synthetic_churn_dataframe(300, 5))
        .unwrap()
}

fn fit(output: &TrainingOutput) -> LogisticChurnModel {
    LogisticChurnModel::fit(
        LogisticParams::default(),
        &output.split.x_train,
        &output.split.y_train,
    )
    .unwrap()
}

#[test]
fn test_model_learns_separable_signal() {
    let output = synthetic_output();
    let model = fit(&output);

    let predictions = model.predict(&output.split.x_test);
    let report = evaluate(&output.split.y_test.to_vec(), &predictions.to_vec());

    assert!(
        report.accuracy > 0.8,
        "Expected a clear signal to be learned, accuracy was {}",
        report.accuracy
    );
}

#[test]
fn test_probabilities_are_normalized() {
    let output = synthetic_output();
    let model = fit(&output);

    let proba = model.predict_proba(&output.split.x_test).unwrap();
    assert_eq!(proba.ncols(), 2);
    assert_eq!(proba.nrows(), output.split.x_test.nrows());
    for row in proba.rows() {
        assert!((row[0] + row[1] - 1.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&row[1]));
    }
}

#[test]
fn test_probability_agrees_with_label() {
    let output = synthetic_output();
    let model = fit(&output);

    let labels = model.predict(&output.split.x_test);
    let proba = model.predict_proba(&output.split.x_test).unwrap();
    for (label, row) in labels.iter().zip(proba.rows()) {
        if *label == 1 {
            assert!(row[1] >= 0.5);
        } else {
            assert!(row[1] <= 0.5);
        }
    }
}

#[test]
fn test_single_class_is_rejected() {
    let x: Array2<f64> = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];
    let y: Array1<usize> = array![0, 0, 0];

    let err = LogisticChurnModel::fit(LogisticParams::default(), &x, &y).unwrap_err();
    assert!(err.to_string().contains("single class"));
}

#[test]
fn test_row_label_mismatch_is_rejected() {
    let x: Array2<f64> = array![[0.0], [1.0]];
    let y: Array1<usize> = array![0, 1, 1];

    assert!(LogisticChurnModel::fit(LogisticParams::default(), &x, &y).is_err());
}

#[test]
fn test_model_roundtrip_through_store() {
    let output = synthetic_output();
    let model = fit(&output);
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    model.save(&store, "LogisticRegression").unwrap();
    let restored = LogisticChurnModel::load(&store, "LogisticRegression").unwrap();

    assert_eq!(
        restored.predict(&output.split.x_test),
        model.predict(&output.split.x_test)
    );
}

#[test]
fn test_predict_one_scores_inference_row() {
    let output = synthetic_output();
    let model = fit(&output);
    let transform = InferenceTransform::from_artifacts(output.artifacts.clone());

    let encoded = transform.transform(&create_scenario_record()).unwrap();
    let prediction = predict_one(&model, &encoded.features).unwrap();

    assert!(prediction.label <= 1);
    assert!((prediction.churn_probability() + prediction.stay_probability() - 1.0).abs() < 1e-9);
    assert_eq!(prediction.is_churn(), prediction.label == 1);
}

#[test]
fn test_predict_one_rejects_empty_matrix() {
    let output = synthetic_output();
    let model = fit(&output);

    let empty = Array2::<f64>::zeros((0, output.artifacts.columns.len()));
    assert!(predict_one(&model, &empty).is_err());
}

/// A classifier that cannot estimate probabilities
struct AlwaysStay;

impl ChurnClassifier for AlwaysStay {
    fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

#[test]
fn test_classifier_without_probabilities() {
    let prediction = predict_one(&AlwaysStay, &array![[0.1, 0.2]]).unwrap();

    assert_eq!(
        prediction,
        Prediction {
            label: 0,
            probabilities: None,
        }
    );
    assert!(!prediction.is_churn());
    assert_eq!(prediction.churn_probability(), 0.0);
}

#[test]
fn test_evaluate_confusion_and_scores() {
    let y_true = [0, 0, 1, 1, 1];
    let y_pred = [0, 1, 1, 1, 0];

    let report = evaluate(&y_true, &y_pred);

    assert_eq!(report.confusion, [[1, 1], [1, 2]]);
    assert!((report.accuracy - 0.6).abs() < 1e-9);
    assert!((report.classes[1].precision - 2.0 / 3.0).abs() < 1e-9);
    assert!((report.classes[1].recall - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.classes[0].support, 2);
    assert_eq!(report.classes[1].support, 3);
}
