// SPDX-License-Identifier: MIT

//! Rally configuration endpoints.

use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::RallyConfig;
use crate::services::Session;
use crate::AppState;

/// Session-optional route: anyone may read the contest info.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/rally", get(get_rally))
}

/// Protected route: only administrators may edit.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/rally", put(update_rally))
}

#[derive(Serialize)]
pub struct RallyResponse {
    pub config: Option<RallyConfig>,
}

/// Current rally configuration, `null` until an administrator creates it.
async fn get_rally(State(state): State<Arc<AppState>>) -> Result<Json<RallyResponse>> {
    let config = state.db.get_rally_config().await?;
    Ok(Json(RallyResponse { config }))
}

/// Create or update the rally configuration singleton.
async fn update_rally(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(mut config): Json<RallyConfig>,
) -> Result<Json<RallyResponse>> {
    let session = Session::resolve(&state.db, Some(&user.uid)).await;
    match session.role() {
        Some(role) if role.can_moderate() => {}
        Some(_) => {
            return Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            ))
        }
        None => return Err(AppError::Unauthorized),
    }

    config
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Preserve the original creation timestamp across edits.
    let existing = state.db.get_rally_config().await?;
    config.created_at = match existing.and_then(|c| c.created_at) {
        Some(created_at) => Some(created_at),
        None => Some(chrono::Utc::now().to_rfc3339()),
    };

    state.db.set_rally_config(&config).await?;
    tracing::info!(uid = %user.uid, title = %config.title, "Rally config updated");

    Ok(Json(RallyResponse {
        config: Some(config),
    }))
}
