//! HTTP implementation of [`WeightStore`] against the backend API

use crate::error::ClientError;
use crate::store::WeightStore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;
use weight_tracker_shared::dashboard::{decode_entries, decode_page, decode_profile};
use weight_tracker_shared::models::{Profile, WeightEntry};
use weight_tracker_shared::types::{
    AvatarResponse, CreateEntryRequest, EntryPage, ErrorResponse, SaveProfileRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header the backend reads the user name from unless configured otherwise
pub const DEFAULT_USER_HEADER: &str = "Remote-User";

/// Client for the Weight Tracker API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    user_header: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - Server root (e.g., "http://localhost:8080")
    /// * `username` - Sent as the identity header; `None` when a proxy adds it
    pub fn new(base_url: impl Into<String>, username: Option<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username,
            user_header: DEFAULT_USER_HEADER.to_string(),
        })
    }

    /// Send the identity under a different header name
    ///
    /// Must match the backend's `auth.user_header` setting.
    pub fn with_user_header(mut self, name: impl Into<String>) -> Self {
        self.user_header = name.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn with_identity(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.header(self.user_header.as_str(), user),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self.with_identity(request).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => ClientError::Api {
                status: status.as_u16(),
                code: err.error.code,
                message: err.error.message,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: "UNKNOWN".to_string(),
                message: body,
            },
        }
    }
}

#[async_trait]
impl WeightStore for ApiClient {
    async fn list_entries(&self, page: u32, page_size: u32) -> Result<EntryPage, ClientError> {
        let request = self
            .client
            .get(self.url("/weight"))
            .query(&[("page", page), ("limit", page_size)]);
        let body = self.send(request).await?.text().await?;
        Ok(decode_page(&body, page))
    }

    async fn list_all_entries(&self) -> Result<Vec<WeightEntry>, ClientError> {
        let body = self.send(self.client.get(self.url("/weight/all"))).await?.text().await?;
        Ok(decode_entries(&body))
    }

    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<WeightEntry, ClientError> {
        let request = self.client.post(self.url("/weight")).json(req);
        let entry = self.send(request).await?.json::<WeightEntry>().await?;
        debug!(entry_id = %entry.id, "Entry created");
        Ok(entry)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(&format!("/weight/{}", id)));
        match self.send(request).await {
            Ok(_) => Ok(()),
            Err(ClientError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ClientError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_profile(&self) -> Result<Profile, ClientError> {
        let body = self.send(self.client.get(self.url("/profile"))).await?.text().await?;
        Ok(decode_profile(&body))
    }

    async fn save_profile(&self, req: &SaveProfileRequest) -> Result<Profile, ClientError> {
        let request = self.client.put(self.url("/profile")).json(req);
        let profile = self.send(request).await?.json::<Profile>().await?;
        Ok(profile)
    }

    async fn upload_avatar(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ClientError::Upload(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let request = self.client.post(self.url("/profile/avatar")).multipart(form);
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(ClientError::Api { message, .. }) => return Err(ClientError::Upload(message)),
            Err(e) => return Err(e),
        };

        let body = response
            .json::<AvatarResponse>()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;
        Ok(body.avatar_url)
    }
}
