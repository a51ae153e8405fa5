// SPDX-License-Identifier: MIT

//! Gallery, photo detail, submission, voting and ranking.

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::VoteToggle;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Photo;
use crate::services::{CloudinaryClient, Session};
use crate::AppState;

const THUMB_SIZE: u32 = 300;
const DETAIL_SIZE: u32 = 800;
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Session-optional routes: gallery, detail and ranking are public reads.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/photos", get(gallery))
        .route("/api/photos/{photo_id}", get(photo_detail))
        .route("/api/ranking", get(ranking))
}

/// Protected routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/photos", post(submit_photo))
        .route("/api/photos/{photo_id}/vote", post(toggle_vote))
}

#[derive(Serialize)]
pub struct PhotoSummary {
    pub photo_id: String,
    pub title: String,
    pub user_name: String,
    pub vote_count: u32,
    pub created_at: String,
    pub thumb_url: String,
}

impl PhotoSummary {
    fn from_photo(photo: Photo) -> Self {
        let thumb_url = CloudinaryClient::optimized_url(&photo.image_url, THUMB_SIZE, THUMB_SIZE);
        Self {
            photo_id: photo.photo_id,
            title: photo.title,
            user_name: photo.user_name,
            vote_count: photo.vote_count,
            created_at: photo.created_at,
            thumb_url,
        }
    }
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub photos: Vec<PhotoSummary>,
}

/// Approved photos for the gallery grid.
async fn gallery(State(state): State<Arc<AppState>>) -> Result<Json<GalleryResponse>> {
    let photos = state.contest.gallery().await?;
    Ok(Json(GalleryResponse {
        photos: photos.into_iter().map(PhotoSummary::from_photo).collect(),
    }))
}

#[derive(Serialize)]
pub struct PhotoDetailResponse {
    pub photo_id: String,
    pub title: String,
    pub image_url: String,
    pub display_url: String,
    pub user_id: String,
    pub user_name: String,
    pub vote_count: u32,
    pub status: crate::models::PhotoStatus,
    pub created_at: String,
    /// Whether the caller has voted for this photo (false when anonymous).
    pub has_voted: bool,
    /// Whether the caller owns this photo.
    pub is_own: bool,
}

/// Single photo with the caller's vote state.
async fn photo_detail(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthUser>>,
    Path(photo_id): Path<String>,
) -> Result<Json<PhotoDetailResponse>> {
    let uid = user.as_ref().map(|Extension(u)| u.uid.as_str());
    let session = Session::resolve(&state.db, uid).await;

    let (photo, has_voted) = state.contest.photo_detail(&session, &photo_id).await?;
    let is_own = session.uid.as_deref() == Some(photo.user_id.as_str());
    let display_url = CloudinaryClient::optimized_url(&photo.image_url, DETAIL_SIZE, DETAIL_SIZE);

    Ok(Json(PhotoDetailResponse {
        photo_id: photo.photo_id,
        title: photo.title,
        image_url: photo.image_url,
        display_url,
        user_id: photo.user_id,
        user_name: photo.user_name,
        vote_count: photo.vote_count,
        status: photo.status,
        created_at: photo.created_at,
        has_voted,
        is_own,
    }))
}

#[derive(Serialize)]
pub struct RankingEntry {
    pub position: u32,
    pub photo_id: String,
    pub title: String,
    pub user_name: String,
    pub vote_count: u32,
    pub thumb_url: String,
}

#[derive(Serialize)]
pub struct RankingResponse {
    pub entries: Vec<RankingEntry>,
}

/// Top photos by votes.
async fn ranking(State(state): State<Arc<AppState>>) -> Result<Json<RankingResponse>> {
    let photos = state.contest.ranking().await?;
    let entries = photos
        .into_iter()
        .enumerate()
        .map(|(i, photo)| RankingEntry {
            position: i as u32 + 1,
            thumb_url: CloudinaryClient::optimized_url(&photo.image_url, THUMB_SIZE, THUMB_SIZE),
            photo_id: photo.photo_id,
            title: photo.title,
            user_name: photo.user_name,
            vote_count: photo.vote_count,
        })
        .collect();
    Ok(Json(RankingResponse { entries }))
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub photo_id: String,
    pub image_url: String,
    pub status: crate::models::PhotoStatus,
}

/// Submit a photo: multipart form with `title` and `image` fields.
async fn submit_photo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>> {
    let session = Session::resolve(&state.db, Some(&user.uid)).await;

    let mut title = String::new();
    let mut image_bytes: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?
    {
        match field.name() {
            Some("title") => {
                title = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed title field: {}", e)))?;
            }
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed image field: {}", e)))?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::Validation("Image exceeds 10 MiB".to_string()));
                }
                image_bytes = bytes.to_vec();
            }
            _ => {}
        }
    }

    let photo = state
        .contest
        .submit_photo(&session, &title, image_bytes)
        .await?;

    Ok(Json(SubmitResponse {
        photo_id: photo.photo_id,
        image_url: photo.image_url,
        status: photo.status,
    }))
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub voted: bool,
    pub vote_count: u32,
}

/// Toggle the caller's vote on a photo.
async fn toggle_vote(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(photo_id): Path<String>,
) -> Result<Json<VoteResponse>> {
    let session = Session::resolve(&state.db, Some(&user.uid)).await;

    let response = match state.contest.toggle_vote(&session, &photo_id).await? {
        VoteToggle::Cast { new_count } => VoteResponse {
            voted: true,
            vote_count: new_count,
        },
        VoteToggle::Retracted { new_count } => VoteResponse {
            voted: false,
            vote_count: new_count,
        },
    };

    Ok(Json(response))
}
