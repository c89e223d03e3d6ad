//! Model module - the classifier fitted on the transformed matrix and its metrics

pub mod classifier;
pub mod metrics;

pub use classifier::*;
pub use metrics::*;
