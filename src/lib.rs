//! Churnrisk: Churn Prediction Library
//!
//! Trains a churn classifier on a customer dataset and replays the exact
//! training-time feature transformation on single customer records.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
