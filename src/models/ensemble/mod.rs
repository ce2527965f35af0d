//! Ensemble combination of the base forecasters.
//!
//! Weights come from the velocity class; forecasters without a value drop
//! out and the rest are renormalised.

mod confidence;
mod model;

pub use confidence::{confidence_score, velocity_points};
pub use model::{renormalize, Ensemble, EnsembleOutput};
