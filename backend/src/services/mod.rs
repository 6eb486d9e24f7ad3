//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared derivation engine.

pub mod avatar;
pub mod dashboard;
pub mod import;
pub mod profile;
pub mod weight;

pub use avatar::{AvatarService, AvatarUpload};
pub use dashboard::DashboardService;
pub use import::{ImportService, ImportSummary};
pub use profile::ProfileService;
pub use weight::WeightService;
