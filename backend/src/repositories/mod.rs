//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod user;
pub mod weight;

pub use user::{ProfileRecord, ProfileRepository, UserRecord, UserRepository};
pub use weight::{CreateWeightEntry, WeightEntryRecord, WeightRepository};
