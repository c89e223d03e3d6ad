//! Interactive prompts using dialoguer

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};

use crate::pipeline::{CategoricalEncoding, InferenceTransform, RawRecord};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Ask whether to score another customer
pub fn confirm_another_customer() -> Result<bool> {
    confirm_step("Evaluate another customer?")
}

/// Collect one customer's attributes, column by column in schema order.
///
/// Categorical answers are validated against the stored vocabulary (exact
/// for learned encoders, any capitalization for fixed ones); numeric answers
/// are re-asked until they parse.
pub fn ask_customer_record(transform: &InferenceTransform) -> Result<RawRecord> {
    println!();
    println!("    {}", style("═".repeat(40)).cyan());
    println!("    {}", style("   CHURN RISK - PREDICTION").cyan().bold());
    println!("    {}", style("═".repeat(40)).cyan());

    let artifacts = transform.artifacts();
    let mut record = RawRecord::new();

    for column in artifacts.columns.names() {
        println!();
        println!(
            "    {} {}",
            style("🔹 Field:").cyan(),
            style(column.to_uppercase()).white().bold()
        );

        match artifacts.encoders.get(column) {
            Some(encoding) => {
                let value = ask_category(encoding)?;
                record.insert(column, value);
            }
            None => {
                let value: f64 = Input::new()
                    .with_prompt("      Enter a number")
                    .validate_with(|input: &f64| -> Result<(), String> {
                        if input.is_finite() {
                            Ok(())
                        } else {
                            Err("Enter a finite number".to_string())
                        }
                    })
                    .interact_text()?;
                record.insert(column, value);
            }
        }
    }

    Ok(record)
}

fn ask_category(encoding: &CategoricalEncoding) -> Result<String> {
    println!(
        "      Valid options: {}",
        style(encoding.options().join(", ")).yellow()
    );
    let hint = if encoding.is_learned() {
        "Type one of the options above exactly"
    } else {
        "Type one of the options above (any capitalization)"
    };

    let value: String = Input::new()
        .with_prompt("      Choose an option")
        .validate_with(|input: &String| -> Result<(), String> {
            if encoding.accepts(input) {
                Ok(())
            } else {
                Err(hint.to_string())
            }
        })
        .interact_text()?;

    Ok(value.trim().to_string())
}
