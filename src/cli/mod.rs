//! CLI module - argument parsing, prompts and the train/predict workflows

mod args;
pub mod predict;
mod prompts;
pub mod train;

pub use args::{Cli, Commands};
pub use predict::*;
pub use prompts::*;
pub use train::*;
