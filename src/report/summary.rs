//! Training run summary report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningStats, TrainingOutput};

/// Summary of one training run
#[derive(Debug, Default)]
pub struct TrainingSummary {
    pub cleaning: CleaningStats,
    pub dropped_columns: Vec<String>,
    pub feature_columns: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub fallback_encodings: usize,
    pub load_time: Option<Duration>,
    pub transform_time: Option<Duration>,
    pub fit_time: Option<Duration>,
    pub save_time: Option<Duration>,
}

impl TrainingSummary {
    pub fn from_output(output: &TrainingOutput) -> Self {
        Self {
            cleaning: output.cleaning.clone(),
            dropped_columns: output.dropped_columns.clone(),
            feature_columns: output.artifacts.columns.names().to_vec(),
            train_rows: output.split.x_train.nrows(),
            test_rows: output.split.x_test.nrows(),
            fallback_encodings: output.warnings.len(),
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, duration: Duration) {
        self.load_time = Some(duration);
    }

    pub fn set_transform_time(&mut self, duration: Duration) {
        self.transform_time = Some(duration);
    }

    pub fn set_fit_time(&mut self, duration: Duration) {
        self.fit_time = Some(duration);
    }

    pub fn set_save_time(&mut self, duration: Duration) {
        self.save_time = Some(duration);
    }

    pub fn total_time(&self) -> Duration {
        [self.load_time, self.transform_time, self.fit_time, self.save_time]
            .iter()
            .flatten()
            .sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows Loaded"),
            Cell::new(self.cleaning.rows_loaded),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Duplicates Removed"),
            count_cell(self.cleaning.duplicates_removed),
        ]);
        table.add_row(vec![
            Cell::new("🕳️  Incomplete Rows Removed"),
            count_cell(self.cleaning.incomplete_removed),
        ]);
        table.add_row(vec![
            Cell::new("🚫 Leakage Columns Dropped"),
            Cell::new(self.dropped_columns.len()),
        ]);
        table.add_row(vec![
            Cell::new("🧩 Features"),
            Cell::new(self.feature_columns.len()).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🏋️  Train Rows"),
            Cell::new(self.train_rows).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("🧪 Test Rows"),
            Cell::new(self.test_rows).fg(Color::Cyan),
        ]);
        if self.fallback_encodings > 0 {
            table.add_row(vec![
                Cell::new("⚠️  Fallback Encodings"),
                Cell::new(self.fallback_encodings).fg(Color::Yellow),
            ]);
        }

        let timings = [
            ("⏱️  Load", self.load_time),
            ("⏱️  Transform", self.transform_time),
            ("⏱️  Fit", self.fit_time),
            ("⏱️  Save", self.save_time),
        ];
        for (label, time) in timings {
            if let Some(t) = time {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format!("{:.2}s", t.as_secs_f64())),
                ]);
            }
        }
        if self.load_time.is_some() {
            table.add_row(vec![
                Cell::new("⏱️  Total").add_attribute(Attribute::Bold),
                Cell::new(format!("{:.2}s", self.total_time().as_secs_f64()))
                    .add_attribute(Attribute::Bold),
            ]);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.feature_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Feature order").yellow(),
                style(format!("({})", self.feature_columns.len())).dim()
            );
            for (i, feature) in self.feature_columns.iter().enumerate() {
                println!("        {} {}", style(format!("{}.", i + 1)).dim(), feature);
            }
        }
    }
}

fn count_cell(count: usize) -> Cell {
    Cell::new(count).fg(if count == 0 { Color::White } else { Color::Red })
}
