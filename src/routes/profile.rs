// SPDX-License-Identifier: MIT

//! Current-user profile.

use axum::{
    extract::{Multipart, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Role, UserProfile};
use crate::services::CloudinaryClient;
use crate::AppState;

const AVATAR_SIZE: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me", put(update_me))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub photos_submitted: u32,
    pub votes_given: u32,
    pub profile_image_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl ProfileResponse {
    fn from_profile(profile: UserProfile) -> Self {
        let avatar_url = profile
            .profile_image_url
            .as_deref()
            .map(|url| CloudinaryClient::optimized_url(url, AVATAR_SIZE, AVATAR_SIZE));
        Self {
            uid: profile.uid,
            email: profile.email,
            name: profile.name,
            role: profile.role,
            is_active: profile.is_active,
            photos_submitted: profile.photos_submitted,
            votes_given: profile.votes_given,
            profile_image_url: profile.profile_image_url,
            avatar_url,
            created_at: profile.created_at,
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(ProfileResponse::from_profile(profile)))
}

/// Update name and/or profile image: multipart form with optional `name`
/// and `image` fields.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>> {
    let mut profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    let mut changed = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?
    {
        match field.name() {
            Some("name") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed name field: {}", e)))?;
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(AppError::Validation("Name is required".to_string()));
                }
                profile.name = name;
                changed = true;
            }
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed image field: {}", e)))?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("Image is empty".to_string()));
                }
                let uploaded = state.images.upload(bytes.to_vec(), &user.uid).await?;
                profile.profile_image_url = Some(uploaded.url);
                changed = true;
            }
            _ => {}
        }
    }

    if !changed {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }

    state.db.upsert_user(&profile).await?;
    tracing::info!(uid = %user.uid, "Profile updated");

    Ok(Json(ProfileResponse::from_profile(profile)))
}
