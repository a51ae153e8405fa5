// SPDX-License-Identifier: MIT

//! Administrator endpoints: moderation queue and user dashboard.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PhotoStatus, Role};
use crate::services::{CloudinaryClient, Session};
use crate::AppState;

const MODERATION_THUMB: u32 = 300;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/photos", get(moderation_queue))
        .route("/api/admin/photos/{photo_id}/approve", post(approve_photo))
        .route("/api/admin/photos/{photo_id}/reject", post(reject_photo))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{uid}", delete(delete_user))
}

async fn admin_session(state: &Arc<AppState>, uid: &str) -> Result<Session> {
    let session = Session::resolve(&state.db, Some(uid)).await;
    match session.role() {
        Some(role) if role.can_moderate() => Ok(session),
        Some(_) => Err(AppError::Forbidden(
            "Administrator role required".to_string(),
        )),
        None => Err(AppError::Unauthorized),
    }
}

#[derive(Serialize)]
pub struct PendingPhoto {
    pub photo_id: String,
    pub title: String,
    pub user_id: String,
    pub user_name: String,
    pub created_at: String,
    pub thumb_url: String,
}

#[derive(Serialize)]
pub struct ModerationQueueResponse {
    pub photos: Vec<PendingPhoto>,
}

/// Photos awaiting moderation, oldest first.
async fn moderation_queue(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ModerationQueueResponse>> {
    let session = admin_session(&state, &user.uid).await?;
    let photos = state.contest.moderation_queue(&session).await?;

    Ok(Json(ModerationQueueResponse {
        photos: photos
            .into_iter()
            .map(|p| PendingPhoto {
                thumb_url: CloudinaryClient::optimized_url(
                    &p.image_url,
                    MODERATION_THUMB,
                    MODERATION_THUMB,
                ),
                photo_id: p.photo_id,
                title: p.title,
                user_id: p.user_id,
                user_name: p.user_name,
                created_at: p.created_at,
            })
            .collect(),
    }))
}

#[derive(Serialize)]
pub struct ApproveResponse {
    pub photo_id: String,
    pub status: PhotoStatus,
}

/// Approve a pending photo.
async fn approve_photo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(photo_id): Path<String>,
) -> Result<Json<ApproveResponse>> {
    let session = admin_session(&state, &user.uid).await?;
    let photo = state.contest.approve_photo(&session, &photo_id).await?;

    Ok(Json(ApproveResponse {
        photo_id: photo.photo_id,
        status: photo.status,
    }))
}

#[derive(Serialize)]
pub struct RejectResponse {
    pub photo_id: String,
    pub votes_removed: usize,
}

/// Reject a photo, removing it and all its votes.
async fn reject_photo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(photo_id): Path<String>,
) -> Result<Json<RejectResponse>> {
    let session = admin_session(&state, &user.uid).await?;
    let votes_removed = state.contest.reject_photo(&session, &photo_id).await?;

    Ok(Json(RejectResponse {
        photo_id,
        votes_removed,
    }))
}

#[derive(Serialize)]
pub struct DashboardUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub photos_submitted: u32,
    pub votes_given: u32,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<DashboardUser>,
}

/// All user profiles for the dashboard.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserListResponse>> {
    admin_session(&state, &user.uid).await?;

    let users = state
        .db
        .list_users()
        .await?
        .into_iter()
        .map(|p| DashboardUser {
            uid: p.uid,
            name: p.name,
            email: p.email,
            role: p.role,
            is_active: p.is_active,
            photos_submitted: p.photos_submitted,
            votes_given: p.votes_given,
        })
        .collect();

    Ok(Json(UserListResponse { users }))
}

#[derive(Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub documents_deleted: usize,
}

/// Delete a participant and all their contest data: photos (with their
/// votes), votes cast, and the profile document.
///
/// Administrator rows are not deletable from the dashboard.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(uid): Path<String>,
) -> Result<Json<DeleteUserResponse>> {
    admin_session(&state, &user.uid).await?;

    let target = state
        .db
        .get_user(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;

    if target.role == Role::Administrator {
        return Err(AppError::Refused(
            "Administrators cannot be deleted".to_string(),
        ));
    }

    let documents_deleted = state.db.delete_user_data(&uid).await?;
    tracing::info!(admin = %user.uid, deleted = %uid, documents_deleted, "User deleted from dashboard");

    Ok(Json(DeleteUserResponse {
        success: true,
        documents_deleted,
    }))
}
