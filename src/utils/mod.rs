//! Utilities - project paths, terminal styling and progress spinners

pub mod paths;
pub mod progress;
pub mod styling;

pub use paths::*;
pub use progress::*;
pub use styling::*;
