use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub created_at: DateTime<Utc>,
    pub id: String,
    pub model: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub active_model: String,
    #[serde(default)]
    pub custom_prompts: HashMap<String, String>,
    pub ethics_modal_accepted_at: Option<DateTime<Utc>>,
    pub share_conversations_with_model_authors: bool,
}

impl UserSettings {
    pub fn with_defaults(default_model_id: &str) -> Self {
        Self {
            active_model: default_model_id.to_string(),
            custom_prompts: HashMap::new(),
            ethics_modal_accepted_at: None,
            share_conversations_with_model_authors: true,
        }
    }
}

/// Per-user conversation and settings storage. The production document
/// database lives behind this seam; the in-memory implementation below
/// backs tests and local runs.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Conversations for one user, most recently updated first.
    async fn list_conversations(&self, user_id: &str) -> anyhow::Result<Vec<ConversationSummary>>;

    async fn settings(&self, user_id: &str) -> anyhow::Result<Option<UserSettings>>;

    /// Sets the active model, creating default settings for the user if
    /// none exist yet.
    async fn set_active_model(&self, user_id: &str, model_id: &str) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, Vec<ConversationSummary>>>,
    settings: RwLock<HashMap<String, UserSettings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_conversation(&self, user_id: &str, conversation: ConversationSummary) {
        self.conversations
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(conversation);
    }

    pub async fn seed_settings(&self, user_id: &str, settings: UserSettings) {
        self.settings
            .write()
            .await
            .insert(user_id.to_string(), settings);
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn list_conversations(&self, user_id: &str) -> anyhow::Result<Vec<ConversationSummary>> {
        let mut conversations = self
            .conversations
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn settings(&self, user_id: &str) -> anyhow::Result<Option<UserSettings>> {
        Ok(self.settings.read().await.get(user_id).cloned())
    }

    async fn set_active_model(&self, user_id: &str, model_id: &str) -> anyhow::Result<()> {
        let mut settings = self.settings.write().await;
        settings
            .entry(user_id.to_string())
            .or_insert_with(|| UserSettings::with_defaults(model_id))
            .active_model = model_id.to_string();
        Ok(())
    }
}
