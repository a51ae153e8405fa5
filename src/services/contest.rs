// SPDX-License-Identifier: MIT

//! Contest lifecycle workflow: submission, voting, moderation, ranking.
//!
//! Capability checks happen here, against the resolved session, before any
//! storage write. The multi-document steps themselves are delegated to the
//! transactional operations in the db layer.

use crate::db::{FirestoreDb, VoteToggle};
use crate::error::AppError;
use crate::models::{Photo, PhotoStatus, RallyConfig};
use crate::services::{CloudinaryClient, Session};

const RANKING_SIZE: u32 = 10;
const GALLERY_PAGE: u32 = 60;

// Fallbacks when no rally config document exists yet.
const DEFAULT_MAX_PHOTOS: u32 = 5;
const DEFAULT_MAX_VOTES: u32 = 10;

/// Contest workflow service.
#[derive(Clone)]
pub struct ContestService {
    db: FirestoreDb,
    images: CloudinaryClient,
}

impl ContestService {
    pub fn new(db: FirestoreDb, images: CloudinaryClient) -> Self {
        Self { db, images }
    }

    /// Per-user limits from the rally config, with defaults when the
    /// singleton has not been created yet.
    async fn limits(&self) -> Result<(u32, u32), AppError> {
        Ok(match self.db.get_rally_config().await? {
            Some(RallyConfig {
                max_photos_per_user,
                max_votes_per_user,
                ..
            }) => (max_photos_per_user, max_votes_per_user),
            None => (DEFAULT_MAX_PHOTOS, DEFAULT_MAX_VOTES),
        })
    }

    /// Submit a photo: upload the binary, then record the photo document and
    /// the owner's counter in one transaction.
    ///
    /// The upload happens before the transaction; if the transaction is
    /// refused the uploaded image is orphaned on the host, never referenced
    /// by any document.
    pub async fn submit_photo(
        &self,
        session: &Session,
        title: &str,
        image_bytes: Vec<u8>,
    ) -> Result<Photo, AppError> {
        let profile = session
            .profile
            .as_ref()
            .ok_or(AppError::Unauthorized)?;

        if !profile.role.can_submit() {
            return Err(AppError::Forbidden(
                "Only participants can submit photos".to_string(),
            ));
        }

        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if image_bytes.is_empty() {
            return Err(AppError::Validation("Image is required".to_string()));
        }

        let (max_photos, _) = self.limits().await?;

        // Cheap pre-check on the session copy; the transaction re-checks
        // against current data.
        if profile.photos_submitted >= max_photos {
            return Err(AppError::Refused(format!(
                "Submission limit reached ({} of {})",
                profile.photos_submitted, max_photos
            )));
        }

        let uploaded = self.images.upload(image_bytes, &profile.uid).await?;

        let photo = Photo::new_submission(
            format!("{}_{}", profile.uid, chrono::Utc::now().timestamp_millis()),
            title.to_string(),
            uploaded.url,
            profile.uid.clone(),
            profile.name.clone(),
            chrono::Utc::now().to_rfc3339(),
        );

        self.db.submit_photo_atomic(&photo, max_photos).await?;

        Ok(photo)
    }

    /// Toggle the caller's vote on a photo.
    pub async fn toggle_vote(
        &self,
        session: &Session,
        photo_id: &str,
    ) -> Result<VoteToggle, AppError> {
        let profile = session
            .profile
            .as_ref()
            .ok_or(AppError::Unauthorized)?;

        if !profile.role.can_vote() {
            return Err(AppError::Forbidden(
                "Only participants can vote".to_string(),
            ));
        }

        let photo = self
            .db
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", photo_id)))?;

        if photo.user_id == profile.uid {
            return Err(AppError::Refused(
                "You cannot vote for your own photo".to_string(),
            ));
        }

        let (_, max_votes) = self.limits().await?;
        self.db
            .toggle_vote_atomic(&photo, &profile.uid, max_votes)
            .await
    }

    /// Approve a pending photo.
    pub async fn approve_photo(&self, session: &Session, photo_id: &str) -> Result<Photo, AppError> {
        self.require_moderator(session)?;
        self.db.approve_photo(photo_id).await
    }

    /// Reject a photo: cascade-delete its votes, the photo, and walk the
    /// owner's submission counter back. Returns the number of votes removed.
    pub async fn reject_photo(&self, session: &Session, photo_id: &str) -> Result<usize, AppError> {
        self.require_moderator(session)?;

        let photo = self
            .db
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", photo_id)))?;

        self.db.reject_photo_atomic(&photo).await
    }

    /// Approved photos, newest first.
    pub async fn gallery(&self) -> Result<Vec<Photo>, AppError> {
        self.db.approved_photos(GALLERY_PAGE).await
    }

    /// Photos awaiting moderation, oldest first.
    pub async fn moderation_queue(&self, session: &Session) -> Result<Vec<Photo>, AppError> {
        self.require_moderator(session)?;
        self.db.pending_photos().await
    }

    /// Top photos by vote count, ties broken by submission time.
    pub async fn ranking(&self) -> Result<Vec<Photo>, AppError> {
        self.db.ranking(RANKING_SIZE).await
    }

    /// A photo plus whether the caller has voted for it.
    pub async fn photo_detail(
        &self,
        session: &Session,
        photo_id: &str,
    ) -> Result<(Photo, bool), AppError> {
        let photo = self
            .db
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", photo_id)))?;

        // Pending photos are only visible to their owner and to moderators.
        if photo.status == PhotoStatus::Pending {
            let is_owner = session.uid.as_deref() == Some(photo.user_id.as_str());
            let is_moderator = session.role().is_some_and(|r| r.can_moderate());
            if !is_owner && !is_moderator {
                return Err(AppError::NotFound(format!("Photo {} not found", photo_id)));
            }
        }

        let has_voted = match &session.uid {
            Some(uid) => self.db.get_vote(photo_id, uid).await?.is_some(),
            None => false,
        };

        Ok((photo, has_voted))
    }

    fn require_moderator(&self, session: &Session) -> Result<(), AppError> {
        match session.role() {
            Some(role) if role.can_moderate() => Ok(()),
            Some(_) => Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            )),
            None => Err(AppError::Unauthorized),
        }
    }
}
