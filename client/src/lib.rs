//! Weight Tracker Client
//!
//! HTTP access to the backend and the refresh/intent loop that keeps a
//! [`Dashboard`](weight_tracker_shared::Dashboard) in sync with it.

pub mod api;
pub mod error;
pub mod orchestrator;
pub mod store;

pub use api::ApiClient;
pub use error::ClientError;
pub use orchestrator::{LoadMore, Orchestrator};
pub use store::WeightStore;
