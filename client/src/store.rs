//! Persistence collaborator
//!
//! The orchestrator only talks to storage through [`WeightStore`], so the
//! HTTP client can be swapped for any other backing store.

use crate::error::ClientError;
use async_trait::async_trait;
use uuid::Uuid;
use weight_tracker_shared::models::{Profile, WeightEntry};
use weight_tracker_shared::types::{CreateEntryRequest, EntryPage, SaveProfileRequest};

/// Storage operations the dashboard needs
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// One page of history, newest first
    async fn list_entries(&self, page: u32, page_size: u32) -> Result<EntryPage, ClientError>;

    /// Every entry, oldest first
    async fn list_all_entries(&self) -> Result<Vec<WeightEntry>, ClientError>;

    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<WeightEntry, ClientError>;

    /// Fails with [`ClientError::NotFound`] for unknown or foreign entries
    async fn delete_entry(&self, id: Uuid) -> Result<(), ClientError>;

    async fn get_profile(&self) -> Result<Profile, ClientError>;

    async fn save_profile(&self, req: &SaveProfileRequest) -> Result<Profile, ClientError>;

    /// Returns the public URL of the stored avatar
    async fn upload_avatar(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, ClientError>;
}
