//! Model artifact loading and scoring
//!
//! The offline training step exports three files (column order, dtype map,
//! fitted pipeline); `artifact` loads and checks them at startup, `pipeline`
//! holds the scoring math.

pub mod artifact;
pub mod pipeline;

pub use artifact::{Dtype, ModelArtifact};
pub use pipeline::{LogisticRegression, Pipeline, StandardScaler};
