//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::{LogisticParams, DEFAULT_MODEL_NAME};
use crate::pipeline::schema::DEFAULT_TARGET;
use crate::pipeline::TrainingConfig;
use crate::utils::{ProjectPaths, DEFAULT_DATASET};

/// Churnrisk - Train a churn classifier and score customers interactively
#[derive(Parser, Debug)]
#[command(name = "churnrisk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project root holding data/, models/ and reports/
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Training dataset (CSV or Parquet). Bare file names are looked up in data/raw.
    #[arg(short, long, default_value = DEFAULT_DATASET, global = true)]
    pub data: PathBuf,

    /// Target column name (binary 0/1 churn label)
    #[arg(short, long, default_value = DEFAULT_TARGET, global = true)]
    pub target: String,

    /// Name under which the fitted model is stored
    #[arg(long, default_value = DEFAULT_MODEL_NAME, global = true)]
    pub model_name: String,

    /// Seed for the train/test split
    #[arg(long, default_value = "42", global = true)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value = "0.2", value_parser = validate_test_size, global = true)]
    pub test_size: f64,

    /// Maximum optimizer iterations for the logistic regression
    #[arg(long, default_value = "200", global = true)]
    pub max_iterations: u64,

    /// L2 regularization strength for the logistic regression
    #[arg(long, default_value = "1.0", global = true)]
    pub alpha: f64,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,

    /// Retrain even if a model and its artifacts already exist
    #[arg(long, global = true)]
    pub retrain: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the model, persist it with its artifacts and exit
    Train,

    /// Score one customer from column=value pairs without prompting
    Predict {
        /// Customer attribute, e.g. --set "Gender=Male" (repeat for every column)
        #[arg(short = 's', long = "set", value_parser = parse_key_value, required = true)]
        values: Vec<(String, String)>,
    },
}

impl Cli {
    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(&self.root)
    }

    /// Dataset location, resolved against the project's raw data directory
    pub fn dataset_path(&self) -> PathBuf {
        self.paths().resolve_dataset(&self.data)
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            target: self.target.clone(),
            test_size: self.test_size,
            seed: self.seed,
        }
    }

    pub fn logistic_params(&self) -> LogisticParams {
        LogisticParams {
            max_iterations: self.max_iterations,
            alpha: self.alpha,
        }
    }
}

/// Parser for `column=value` pairs; the column may contain spaces
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not of the form column=value", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("'{}' has an empty column name", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_with_spaces() {
        assert_eq!(
            parse_key_value("Subscription Type = Basic").unwrap(),
            ("Subscription Type".to_string(), "Basic".to_string())
        );
    }

    #[test]
    fn test_parse_key_value_rejects_missing_separator() {
        assert!(parse_key_value("Gender").is_err());
        assert!(parse_key_value("=Male").is_err());
    }

    #[test]
    fn test_validate_test_size_bounds() {
        assert!(validate_test_size("0.2").is_ok());
        assert!(validate_test_size("0").is_err());
        assert!(validate_test_size("1.0").is_err());
        assert!(validate_test_size("abc").is_err());
    }
}
