//! Evaluation report display and JSON export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use serde::Serialize;

use crate::model::{ClassMetrics, EvaluationReport};

const CLASS_NAMES: [&str; 2] = ["0 (stays)", "1 (churns)"];

/// Metadata about the training run that produced the report
#[derive(Debug, Serialize)]
pub struct EvaluationMetadata {
    /// Timestamp of the evaluation (ISO 8601 format)
    pub timestamp: String,
    pub churnrisk_version: String,
    pub model_name: String,
    pub dataset: String,
    pub target_column: String,
    pub seed: u64,
    pub test_size: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: Vec<String>,
}

/// Complete evaluation export
#[derive(Debug, Serialize)]
pub struct EvaluationExport<'a> {
    pub metadata: EvaluationMetadata,
    pub metrics: &'a EvaluationReport,
}

/// Parameters describing the run, used for the export metadata
pub struct ExportParams<'a> {
    pub model_name: &'a str,
    pub dataset: &'a str,
    pub target_column: &'a str,
    pub seed: u64,
    pub test_size: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: &'a [String],
}

/// Print the confusion matrix and the per-class report
pub fn display_evaluation(model_name: &str, report: &EvaluationReport) {
    println!();
    println!(
        "    {} {} {}",
        style("📈").cyan(),
        style("EVALUATION").white().bold(),
        style(format!("({})", model_name)).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut confusion = Table::new();
    confusion.load_preset(UTF8_FULL_CONDENSED);
    confusion.set_header(vec![
        Cell::new("Actual \\ Predicted").add_attribute(Attribute::Bold),
        Cell::new(CLASS_NAMES[0]).add_attribute(Attribute::Bold),
        Cell::new(CLASS_NAMES[1]).add_attribute(Attribute::Bold),
    ]);
    for (actual, row) in report.confusion.iter().enumerate() {
        confusion.add_row(vec![
            Cell::new(CLASS_NAMES[actual]),
            confusion_cell(row[0], actual == 0),
            confusion_cell(row[1], actual == 1),
        ]);
    }
    for line in confusion.to_string().lines() {
        println!("    {}", line);
    }
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Precision").add_attribute(Attribute::Bold),
        Cell::new("Recall").add_attribute(Attribute::Bold),
        Cell::new("F1").add_attribute(Attribute::Bold),
        Cell::new("Support").add_attribute(Attribute::Bold),
    ]);
    for (name, metrics) in CLASS_NAMES.iter().zip(&report.classes) {
        table.add_row(metrics_row(name, metrics));
    }
    table.add_row(metrics_row("macro avg", &report.macro_avg));
    table.add_row(metrics_row("weighted avg", &report.weighted_avg));
    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    let color = if report.accuracy >= 0.8 {
        Color::Green
    } else if report.accuracy >= 0.6 {
        Color::Yellow
    } else {
        Color::Red
    };
    let mut accuracy = Table::new();
    accuracy.load_preset(UTF8_FULL_CONDENSED);
    accuracy.add_row(vec![
        Cell::new("🎯 Accuracy").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}%", report.accuracy * 100.0))
            .fg(color)
            .add_attribute(Attribute::Bold),
    ]);
    for line in accuracy.to_string().lines() {
        println!("    {}", line);
    }
}

fn confusion_cell(count: usize, correct: bool) -> Cell {
    Cell::new(count)
        .set_alignment(CellAlignment::Right)
        .fg(if correct { Color::Green } else { Color::Red })
}

fn metrics_row(name: &str, metrics: &ClassMetrics) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(format!("{:.2}", metrics.precision)),
        Cell::new(format!("{:.2}", metrics.recall)),
        Cell::new(format!("{:.2}", metrics.f1)),
        Cell::new(metrics.support),
    ]
}

/// Export an evaluation report with run metadata to a JSON file
pub fn export_evaluation(
    report: &EvaluationReport,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = EvaluationExport {
        metadata: EvaluationMetadata {
            timestamp: Utc::now().to_rfc3339(),
            churnrisk_version: env!("CARGO_PKG_VERSION").to_string(),
            model_name: params.model_name.to_string(),
            dataset: params.dataset.to_string(),
            target_column: params.target_column.to_string(),
            seed: params.seed,
            test_size: params.test_size,
            train_rows: params.train_rows,
            test_rows: params.test_rows,
            features: params.features.to_vec(),
        },
        metrics: report,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize evaluation report to JSON")?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write evaluation report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
