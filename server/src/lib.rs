use axum::{Router, routing::get};
use models::{ModelConfig, OldModel};
use std::sync::Arc;

pub mod error;
pub mod handlers;
pub mod store;

use handlers::layout::layout;
use store::ConversationStore;

pub struct AppState {
    pub default_model_id: String,
    pub models: Vec<ModelConfig>,
    pub old_models: Vec<OldModel>,
    pub store: Arc<dyn ConversationStore>,
}

pub fn get_app(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(layout)).with_state(state)
}
