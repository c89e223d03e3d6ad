//! Terminal styling utilities for operator-facing output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::model::Prediction;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static MODEL: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static ALERT: Emoji<'_, '_> = Emoji("🔴 ", "[HIGH] ");
pub static STABLE: Emoji<'_, '_> = Emoji("🟢 ", "[LOW] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ___ _                    ___ _    _
    / __| |_ _  _ _ _ _ _    | _ (_)__| |__
   | (__| ' \ || | '_| ' \   |   / (_-< / /
    \___|_||_\_,_|_| |_||_|  |_|_\_/__/_\_\
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("◆").magenta().bold(),
        style("Customer churn risk, one customer at a time").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the training configuration card
pub fn print_config(dataset: &Path, target: &str, storage: &Path, model_name: &str) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Dataset: {:<38}│",
        FOLDER,
        truncate_path(dataset, 37)
    );
    println!(
        "    │  {} Target:  {:<38}│",
        TARGET,
        truncate_string(target, 37)
    );
    println!(
        "    │  {} Models:  {:<38}│",
        SAVE,
        truncate_path(storage, 37)
    );
    println!(
        "    │  {} Model:   {:<38}│",
        MODEL,
        truncate_string(model_name, 37)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a non-fatal warning
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print an error that the session recovers from
pub fn print_error(message: &str) {
    eprintln!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("completed in {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the verdict for one customer
pub fn print_prediction(prediction: &Prediction) {
    println!();
    println!("    {}", style("─".repeat(40)).dim());
    if prediction.is_churn() {
        println!(
            "    {}{} {}",
            ALERT,
            style("HIGH CHURN RISK").red().bold(),
            style(format!(
                "(probability: {:.1}%)",
                prediction.churn_probability() * 100.0
            ))
            .red()
        );
    } else {
        println!(
            "    {}{} {}",
            STABLE,
            style("Stable customer").green().bold(),
            style(format!(
                "(low risk - no-churn confidence: {:.1}%)",
                prediction.stay_probability() * 100.0
            ))
            .green()
        );
    }
    println!("    {}", style("─".repeat(40)).dim());
    println!();
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("    {} {}", ROCKET, style(message).green().bold());
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
