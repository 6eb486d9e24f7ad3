//! Weight Tracker Shared Library
//!
//! This crate contains the metrics and display derivation engine together
//! with the models and request types shared by the backend, the client
//! and the WASM module.

pub mod bmi;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod period;
pub mod progress;
pub mod summary;
pub mod trend;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use bmi::{classify, BmiCategory, BmiReport, Rgb};
pub use dashboard::{Command, Dashboard, DerivedView, HistoryRow, Intent, ProfileForm};
pub use errors::*;
pub use models::*;
pub use period::PeriodSelector;
pub use progress::{ProgressProjection, ProjectionStatus};
pub use summary::Summary;
pub use trend::{Direction, TrendAnnotation};
pub use types::*;
