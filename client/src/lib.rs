//! Thin client helpers for the chat backend's conversation routes.

use anyhow::{Result, bail};
use serde::Deserialize;
use tracing::error;

/// Returned by the share endpoint: the public URL of the shared
/// conversation.
#[derive(Debug, Deserialize)]
pub struct SharedConversation {
    pub url: String,
}

pub struct ChatClient {
    base_url: String,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Publishes a conversation and returns its share URL. A non-success
    /// response fails with the server's error text; callers show a generic
    /// message and keep the detail for their logs.
    pub async fn share_conversation(&self, conversation_id: &str) -> Result<SharedConversation> {
        let url = format!("{}/conversation/{}/share", self.base_url, conversation_id);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("sharing conversation failed: {detail}");
            bail!("Error while sharing conversation: {detail}");
        }

        Ok(response.json().await?)
    }
}
