//! Report module - training summary and model evaluation

pub mod evaluation;
pub mod summary;

pub use evaluation::*;
pub use summary::*;
