//! Training run: load, transform, fit, evaluate, persist

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use crate::model::{evaluate, ChurnClassifier, EvaluationReport, LogisticChurnModel};
use crate::pipeline::{
    load_dataset_with_progress, StagedWrite, TrainingOutput, TrainingTransform, ENCODERS_ARTIFACT,
};
use crate::report::{display_evaluation, export_evaluation, ExportParams, TrainingSummary};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success, print_warning,
    ProjectPaths,
};

use super::Cli;

/// Result of a completed training run
pub struct TrainingRun {
    pub output: TrainingOutput,
    pub model: LogisticChurnModel,
    pub evaluation: EvaluationReport,
}

/// A model counts as trained when both the model blob and the encoders exist
pub fn check_is_trained(paths: &ProjectPaths, model_name: &str) -> bool {
    paths.model_store().exists(model_name) && paths.artifact_store().exists(ENCODERS_ARTIFACT)
}

/// Publish the artifacts and the model as one group: either the whole new
/// generation replaces the old one, or the old one stays untouched.
pub fn persist_run(
    paths: &ProjectPaths,
    model_name: &str,
    output: &TrainingOutput,
    model: &LogisticChurnModel,
) -> Result<()> {
    let mut group = StagedWrite::new();
    output
        .artifacts
        .stage(&paths.artifact_store(), &mut group)
        .context("Failed to stage training artifacts")?;
    model
        .stage(&paths.model_store(), model_name, &mut group)
        .context("Failed to stage model")?;
    group
        .commit()
        .context("Failed to save model and training artifacts")?;
    Ok(())
}

/// Run the full training workflow and persist the model with its artifacts.
///
/// Artifacts and model are written only after every earlier step succeeded.
pub fn run_training(cli: &Cli, paths: &ProjectPaths) -> Result<TrainingRun> {
    let dataset = cli.dataset_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&dataset, &cli.target, &paths.models_dir, &cli.model_name);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, stats) = load_dataset_with_progress(&dataset, cli.infer_schema_length)
        .with_context(|| {
            format!(
                "Could not load training data. Place the dataset at {}",
                dataset.display()
            )
        })?;
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.columns);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);
    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Feature transformation
    print_step_header(2, "Feature Transformation");
    let step_start = Instant::now();
    let spinner = create_spinner("Cleaning, encoding and scaling...");
    let output = TrainingTransform::new(cli.training_config())
        .fit(&df)
        .context("Feature transformation failed")?;
    if output.warnings.is_empty() {
        finish_with_success(&spinner, "Features encoded and scaled");
    } else {
        finish_with_warning(
            &spinner,
            &format!(
                "Features encoded; {} unlisted categorical value(s) fell back to code 0",
                output.warnings.len()
            ),
        );
    }
    print_info(&format!(
        "{} duplicate and {} incomplete row(s) removed",
        output.cleaning.duplicates_removed, output.cleaning.incomplete_removed
    ));
    print_info(&format!(
        "Dropped leakage columns: {}",
        output.dropped_columns.join(", ")
    ));
    let transform_elapsed = step_start.elapsed();
    print_step_time(transform_elapsed);

    // Step 3: Fit model
    print_step_header(3, "Fit Model");
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Training {}...", cli.model_name));
    let model = LogisticChurnModel::fit(
        cli.logistic_params(),
        &output.split.x_train,
        &output.split.y_train,
    )?;
    finish_with_success(&spinner, &format!("{} trained", cli.model_name));
    let fit_elapsed = step_start.elapsed();
    print_step_time(fit_elapsed);

    // Step 4: Evaluate
    print_step_header(4, "Evaluate");
    let predictions = model.predict(&output.split.x_test);
    let evaluation = evaluate(
        &output.split.y_test.to_vec(),
        &predictions.to_vec(),
    );
    if output.split.y_test.is_empty() {
        print_warning("Test partition is empty; metrics are not meaningful");
    }
    display_evaluation(&cli.model_name, &evaluation);

    let report_path = paths.evaluation_report_path(&cli.model_name);
    export_evaluation(
        &evaluation,
        &report_path,
        &ExportParams {
            model_name: &cli.model_name,
            dataset: &dataset.display().to_string(),
            target_column: &cli.target,
            seed: cli.seed,
            test_size: cli.test_size,
            train_rows: output.split.x_train.nrows(),
            test_rows: output.split.x_test.nrows(),
            features: output.artifacts.columns.names(),
        },
    )?;
    print_success(&format!("Evaluation report saved to {}", report_path.display()));

    // Step 5: Persist
    print_step_header(5, "Save Model & Artifacts");
    let step_start = Instant::now();
    persist_run(paths, &cli.model_name, &output, &model)?;
    print_success(&format!("Saved to {}", paths.models_dir.display()));
    let save_elapsed = step_start.elapsed();
    print_step_time(save_elapsed);

    let mut summary = TrainingSummary::from_output(&output);
    summary.set_load_time(load_elapsed);
    summary.set_transform_time(transform_elapsed);
    summary.set_fit_time(fit_elapsed);
    summary.set_save_time(save_elapsed);
    summary.display();

    print_completion("Training complete!");

    Ok(TrainingRun {
        output,
        model,
        evaluation,
    })
}
