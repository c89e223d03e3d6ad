//! Scoring customers: one-shot from key/value pairs, or an interactive loop

use anyhow::{Context, Result};

use crate::model::{predict_one, LogisticChurnModel, Prediction};
use crate::pipeline::{EncodingWarning, InferenceTransform, PipelineError, RawRecord};
use crate::utils::{print_error, print_info, print_prediction, print_success, print_warning, ProjectPaths};

use super::{ask_customer_record, check_is_trained, confirm_another_customer, run_training, Cli};

/// Artifacts and model loaded once per session
pub struct Scorer {
    transform: InferenceTransform,
    model: LogisticChurnModel,
}

impl Scorer {
    /// Load artifacts and model from the project's stores.
    pub fn load(paths: &ProjectPaths, model_name: &str) -> Result<Self> {
        let transform = InferenceTransform::load(&paths.artifact_store()).map_err(|e| match e {
            PipelineError::ArtifactsMissing { .. } => anyhow::anyhow!(
                "{}. Run `churnrisk train` (or delete {} and start again) to retrain.",
                e,
                paths.models_dir.display()
            ),
            other => other.into(),
        })?;
        let model = LogisticChurnModel::load(&paths.model_store(), model_name)
            .with_context(|| format!("Could not load model '{}'", model_name))?;
        Ok(Self { transform, model })
    }

    pub fn transform(&self) -> &InferenceTransform {
        &self.transform
    }

    /// Transform and score one record.
    ///
    /// Pipeline failures keep their [`PipelineError`] type inside the
    /// returned error so callers can downcast and decide whether to re-prompt.
    pub fn score(&self, record: &RawRecord) -> Result<(Prediction, Vec<EncodingWarning>)> {
        let encoded = self.transform.transform(record)?;
        let prediction = predict_one(&self.model, &encoded.features)?;
        Ok((prediction, encoded.warnings))
    }
}

/// Build a record from `column=value` pairs; numeric text is parsed later by the transform
pub fn record_from_pairs(pairs: &[(String, String)]) -> RawRecord {
    pairs
        .iter()
        .map(|(column, value)| (column.clone(), value.clone()))
        .collect()
}

/// Score one customer given on the command line
pub fn run_predict(cli: &Cli, paths: &ProjectPaths, pairs: &[(String, String)]) -> Result<Prediction> {
    if cli.retrain {
        print_info(RETRAIN_NOTICE);
        run_training(cli, paths)?;
    }
    let scorer = Scorer::load(paths, &cli.model_name)?;
    let (prediction, warnings) = scorer
        .score(&record_from_pairs(pairs))
        .context("Could not score customer")?;
    for warning in &warnings {
        print_warning(&warning.to_string());
    }
    print_prediction(&prediction);
    Ok(prediction)
}

/// Train if needed, then prompt for customers until the operator stops
pub fn run_interactive(cli: &Cli, paths: &ProjectPaths) -> Result<()> {
    match training_notice(cli.retrain, check_is_trained(paths, &cli.model_name)) {
        Some(notice) => {
            print_info(notice);
            run_training(cli, paths)?;
        }
        None => print_success("Model loaded"),
    }

    let scorer = Scorer::load(paths, &cli.model_name)?;

    loop {
        let record = ask_customer_record(scorer.transform())?;
        match scorer.score(&record) {
            Ok((prediction, warnings)) => {
                for warning in &warnings {
                    print_warning(&warning.to_string());
                }
                print_prediction(&prediction);
            }
            Err(e) if is_recoverable(&e) => {
                print_error(&e.to_string());
                continue;
            }
            Err(e) => return Err(e),
        }

        if !confirm_another_customer()? {
            print_info("Closing...");
            break;
        }
    }

    Ok(())
}

const RETRAIN_NOTICE: &str = "Retraining requested. Starting training...";
const UNTRAINED_NOTICE: &str = "Model not found. Starting training...";

/// Why a session has to train before scoring, if it has to
fn training_notice(retrain: bool, trained: bool) -> Option<&'static str> {
    if retrain {
        Some(RETRAIN_NOTICE)
    } else if !trained {
        Some(UNTRAINED_NOTICE)
    } else {
        None
    }
}

/// Input problems the operator can fix by answering again
fn is_recoverable(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PipelineError>(),
        Some(
            PipelineError::UnknownCategory { .. }
                | PipelineError::MissingColumn(_)
                | PipelineError::InvalidNumber { .. }
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_notice() {
        assert_eq!(training_notice(true, true), Some(RETRAIN_NOTICE));
        assert_eq!(training_notice(true, false), Some(RETRAIN_NOTICE));
        assert_eq!(training_notice(false, false), Some(UNTRAINED_NOTICE));
        assert_eq!(training_notice(false, true), None);
    }
}
