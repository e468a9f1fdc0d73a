use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use models::{ModelConfig, OldModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::AppState;
use crate::error::AppError;
use crate::store::{ConversationSummary, UserSettings};

/// Everything the page shell needs on load: the user's conversation list,
/// their settings, and the public projection of each served model.
#[derive(Serialize)]
struct LayoutData<'a> {
    conversations: Vec<ConversationSummary>,
    settings: UserSettings,
    models: &'a [ModelConfig],
    old_models: &'a [OldModel],
}

#[derive(Deserialize)]
pub struct LayoutQuery {
    pub model: Option<String>,
}

fn user_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
}

pub async fn layout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LayoutQuery>,
) -> Result<Response, AppError> {
    let user_id = user_id(&headers);

    // A `?model=` query switches the active model (when the id is one we
    // serve) and redirects back to the bare path.
    if let Some(model_id) = query.model {
        if state.models.iter().any(|m| m.id == model_id) {
            info!(user = user_id, model = %model_id, "switching active model");
            state.store.set_active_model(user_id, &model_id).await?;
        }
        return Ok(Redirect::to("/").into_response());
    }

    let mut settings = match state.store.settings(user_id).await? {
        Some(settings) => settings,
        None => UserSettings::with_defaults(&state.default_model_id),
    };

    // The stored active model may no longer be served, e.g. after it was
    // disabled. Fall back to the default and persist the fix.
    if !state.models.iter().any(|m| m.id == settings.active_model) {
        debug!(
            user = user_id,
            stale = %settings.active_model,
            "active model no longer served, resetting to default"
        );
        settings.active_model = state.default_model_id.clone();
        state
            .store
            .set_active_model(user_id, &state.default_model_id)
            .await?;
    }

    let conversations = state.store.list_conversations(user_id).await?;

    Ok(Json(LayoutData {
        conversations,
        settings,
        models: &state.models,
        old_models: &state.old_models,
    })
    .into_response())
}
