//! Pipeline module - the feature transformation shared by training and inference

pub mod artifacts;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod loader;
pub mod record;
pub mod scaler;
pub mod schema;
pub mod training;

pub use artifacts::*;
pub use encoder::*;
pub use error::*;
pub use inference::*;
pub use loader::*;
pub use record::*;
pub use scaler::*;
pub use training::*;
