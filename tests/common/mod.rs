//! Shared test utilities and fixture generators

#![allow(dead_code)]

use churnrisk::pipeline::RawRecord;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Feature columns left after the leakage columns and the target are removed
pub const EXPECTED_SCHEMA: [&str; 7] = [
    "Gender",
    "Subscription Type",
    "Contract Length",
    "Age",
    "Tenure",
    "Support Calls",
    "Payment Delay",
];

/// Two-customer dataset with the full churn schema
///
/// - `Gender`: Male / Female (learned index: Female=0, Male=1)
/// - `Subscription Type`: Basic / Premium (fixed codes 0 / 2)
/// - `Contract Length`: Monthly / Annual (fixed codes 0 / 2)
/// - leakage columns with arbitrary values
pub fn create_sample_churn_dataframe() -> DataFrame {
    df! {
        "CustomerID" => [1i64, 2],
        "Gender" => ["Male", "Female"],
        "Subscription Type" => ["Basic", "Premium"],
        "Contract Length" => ["Monthly", "Annual"],
        "Usage Frequency" => [5i64, 3],
        "Last Interaction" => [10i64, 15],
        "Total Spend" => [200.0f64, 500.0],
        "Age" => [35i64, 50],
        "Tenure" => [24i64, 36],
        "Support Calls" => [2i64, 1],
        "Payment Delay" => [3i64, 5],
        "Churn" => [0i64, 1],
    }
    .unwrap()
}

/// Customer record scored against artifacts fitted on the sample dataset
pub fn create_scenario_record() -> RawRecord {
    RawRecord::new()
        .with("Gender", "Male")
        .with("Subscription Type", "Basic")
        .with("Contract Length", "Monthly")
        .with("Age", 30)
        .with("Tenure", 10)
        .with("Support Calls", 0)
        .with("Payment Delay", 2)
}

/// Synthetic churn dataset where churn follows support calls and payment delay
///
/// Rows alternate between the two classes, so both are always present.
pub fn create_synthetic_churn_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let genders = ["Male", "Female"];
    let tiers = ["Basic", "Standard", "Premium"];
    let contracts = ["Monthly", "Quarterly", "Annual"];

    let mut customer_id = Vec::with_capacity(rows);
    let mut gender = Vec::with_capacity(rows);
    let mut subscription = Vec::with_capacity(rows);
    let mut contract = Vec::with_capacity(rows);
    let mut usage = Vec::with_capacity(rows);
    let mut last_interaction = Vec::with_capacity(rows);
    let mut total_spend = Vec::with_capacity(rows);
    let mut age = Vec::with_capacity(rows);
    let mut tenure = Vec::with_capacity(rows);
    let mut support_calls = Vec::with_capacity(rows);
    let mut payment_delay = Vec::with_capacity(rows);
    let mut churn = Vec::with_capacity(rows);

    for i in 0..rows {
        let churned = i % 2 == 1;
        let (calls, delay): (i64, i64) = if churned {
            (rng.gen_range(6..11), rng.gen_range(15..31))
        } else {
            (rng.gen_range(0..4), rng.gen_range(0..10))
        };

        customer_id.push(i as i64 + 1);
        gender.push(genders[rng.gen_range(0..genders.len())]);
        subscription.push(tiers[rng.gen_range(0..tiers.len())]);
        contract.push(contracts[rng.gen_range(0..contracts.len())]);
        usage.push(rng.gen_range(1i64..31));
        last_interaction.push(rng.gen_range(1i64..31));
        total_spend.push(rng.gen_range(100.0f64..1000.0));
        age.push(rng.gen_range(18i64..66));
        tenure.push(rng.gen_range(1i64..61));
        support_calls.push(calls);
        payment_delay.push(delay);
        churn.push(churned as i64);
    }

    df! {
        "CustomerID" => customer_id,
        "Gender" => gender,
        "Subscription Type" => subscription,
        "Contract Length" => contract,
        "Usage Frequency" => usage,
        "Last Interaction" => last_interaction,
        "Total Spend" => total_spend,
        "Age" => age,
        "Tenure" => tenure,
        "Support Calls" => support_calls,
        "Payment Delay" => payment_delay,
        "Churn" => churn,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("churn.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Assert two floats are equal within a small tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected {}, got {}",
        expected,
        actual
    );
}
