// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles with role and counters)
//! - Photos (submissions and moderation state)
//! - Votes (one document per `(photo, user)` pair)
//! - Rally config (singleton document)
//!
//! The multi-document contest workflows (submission, vote toggle, rejection
//! cascade) run inside Firestore transactions so a partial failure never
//! leaves counters out of step with the documents they describe.

use crate::db::{collections, RALLY_DOC_ID};
use crate::error::AppError;
use crate::models::{Photo, PhotoStatus, RallyConfig, UserProfile, Vote};
use futures_util::{stream, StreamExt};

// Firestore limits a single transaction to 500 writes. The rejection cascade
// deletes one vote per voter plus two more writes, so a photo would need
// ~498 voters to hit it.
const MAX_TXN_WRITES: usize = 500;

// Concurrency limit for bulk vote cleanup during user deletion.
const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Outcome of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToggle {
    /// A vote was created; `new_count` is the photo's updated tally.
    Cast { new_count: u32 },
    /// An existing vote was removed.
    Retracted { new_count: u32 },
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Unauthenticated connection for the emulator, to avoid local
        // credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by auth provider uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Flip the `is_active` flag, preserving all other fields.
    pub async fn set_user_active(&self, uid: &str, is_active: bool) -> Result<(), AppError> {
        let mut profile = self
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;
        profile.is_active = is_active;
        self.upsert_user(&profile).await
    }

    /// List all user profiles (admin dashboard).
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user profile document.
    pub async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Rally Config ────────────────────────────────────────────

    /// Get the rally configuration singleton.
    pub async fn get_rally_config(&self) -> Result<Option<RallyConfig>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RALLY_CONFIG)
            .obj()
            .one(RALLY_DOC_ID)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store the rally configuration singleton.
    pub async fn set_rally_config(&self, config: &RallyConfig) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RALLY_CONFIG)
            .document_id(RALLY_DOC_ID)
            .object(config)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Photo Operations ────────────────────────────────────────

    /// Get a photo by its client-generated id.
    pub async fn get_photo(&self, photo_id: &str) -> Result<Option<Photo>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PHOTOS)
            .obj()
            .one(photo_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a photo document.
    pub async fn upsert_photo(&self, photo: &Photo) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PHOTOS)
            .document_id(&photo.photo_id)
            .object(photo)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List approved photos, newest first (gallery).
    pub async fn approved_photos(&self, limit: u32) -> Result<Vec<Photo>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PHOTOS)
            .filter(|q| q.field("status").eq("aprobado"))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List photos awaiting moderation, oldest first.
    pub async fn pending_photos(&self) -> Result<Vec<Photo>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PHOTOS)
            .filter(|q| q.field("status").eq("pendiente"))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All photos submitted by a user, regardless of status.
    pub async fn photos_by_user(&self, user_id: &str) -> Result<Vec<Photo>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PHOTOS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top approved photos by vote count.
    ///
    /// Ties break by `created_at` ascending so earlier submissions rank
    /// first and the ordering is stable between reads.
    pub async fn ranking(&self, limit: u32) -> Result<Vec<Photo>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PHOTOS)
            .filter(|q| q.field("status").eq("aprobado"))
            .order_by([
                (
                    "vote_count",
                    firestore::FirestoreQueryDirection::Descending,
                ),
                (
                    "created_at",
                    firestore::FirestoreQueryDirection::Ascending,
                ),
            ])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Vote Operations ─────────────────────────────────────────

    /// Look up a vote by its deterministic `(photo, user)` id.
    pub async fn get_vote(&self, photo_id: &str, user_id: &str) -> Result<Option<Vote>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VOTES)
            .obj()
            .one(&Vote::doc_id(photo_id, user_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All votes referencing a photo.
    pub async fn votes_for_photo(&self, photo_id: &str) -> Result<Vec<Vote>, AppError> {
        let photo_id = photo_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VOTES)
            .filter(move |q| q.field("photo_id").eq(photo_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All votes a user has cast.
    pub async fn votes_by_user(&self, user_id: &str) -> Result<Vec<Vote>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VOTES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Contest Workflows (transactional) ──────────────────────

    /// Atomically record a submission: create the photo document and bump
    /// the owner's `photos_submitted`, refusing when the per-user limit is
    /// already reached.
    pub async fn submit_photo_atomic(
        &self,
        photo: &Photo,
        max_photos_per_user: u32,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the owner's profile to enforce the submission cap. The read
        // registers the document for conflict detection, so a concurrent
        // submission from the same user retries with fresh data.
        let profile: UserProfile = client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&photo.user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", photo.user_id)))?;

        if profile.photos_submitted >= max_photos_per_user {
            let _ = transaction.rollback().await;
            return Err(AppError::Refused(format!(
                "Submission limit reached ({} of {})",
                profile.photos_submitted, max_photos_per_user
            )));
        }

        client
            .fluent()
            .update()
            .in_col(collections::PHOTOS)
            .document_id(&photo.photo_id)
            .object(photo)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add photo write: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&photo.user_id)
            .transforms(|t| t.fields([t.field("photos_submitted").increment(1)]))
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            photo_id = %photo.photo_id,
            user_id = %photo.user_id,
            "Photo submission recorded"
        );

        Ok(())
    }

    /// Atomically toggle a vote for `(photo_id, user_id)`.
    ///
    /// Casting creates the vote document under its deterministic id and
    /// increments both counters; retracting deletes it and decrements them.
    /// The voter's profile is read inside the transaction so the cap check
    /// sees current data.
    pub async fn toggle_vote_atomic(
        &self,
        photo: &Photo,
        user_id: &str,
        max_votes_per_user: u32,
    ) -> Result<VoteToggle, AppError> {
        let client = self.get_client()?;
        let vote_id = Vote::doc_id(&photo.photo_id, user_id);

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let existing: Option<Vote> = client
            .fluent()
            .select()
            .by_id_in(collections::VOTES)
            .obj()
            .one(&vote_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            // Reversal: delete the vote and walk both counters back.
            client
                .fluent()
                .delete()
                .from(collections::VOTES)
                .document_id(&vote_id)
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Database(format!("Failed to add vote delete: {}", e)))?;

            client
                .fluent()
                .update()
                .in_col(collections::PHOTOS)
                .document_id(&photo.photo_id)
                .transforms(|t| t.fields([t.field("vote_count").increment(-1)]))
                .only_transform()
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

            client
                .fluent()
                .update()
                .in_col(collections::USERS)
                .document_id(user_id)
                .transforms(|t| t.fields([t.field("votes_given").increment(-1)]))
                .only_transform()
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

            tracing::info!(photo_id = %photo.photo_id, user_id, "Vote retracted");

            return Ok(VoteToggle::Retracted {
                new_count: photo.vote_count.saturating_sub(1),
            });
        }

        // Casting: enforce the per-user vote cap against current data.
        let voter: UserProfile = client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if voter.votes_given >= max_votes_per_user {
            let _ = transaction.rollback().await;
            return Err(AppError::Refused(format!(
                "Vote limit reached ({} of {})",
                voter.votes_given, max_votes_per_user
            )));
        }

        let vote = Vote {
            photo_id: photo.photo_id.clone(),
            user_id: user_id.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        client
            .fluent()
            .update()
            .in_col(collections::VOTES)
            .document_id(&vote_id)
            .object(&vote)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add vote write: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::PHOTOS)
            .document_id(&photo.photo_id)
            .transforms(|t| t.fields([t.field("vote_count").increment(1)]))
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .transforms(|t| t.fields([t.field("votes_given").increment(1)]))
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(photo_id = %photo.photo_id, user_id, "Vote cast");

        Ok(VoteToggle::Cast {
            new_count: photo.vote_count + 1,
        })
    }

    /// Approve a pending photo (`pendiente -> aprobado`).
    ///
    /// Refuses when the photo is already approved; there is no path back.
    pub async fn approve_photo(&self, photo_id: &str) -> Result<Photo, AppError> {
        let mut photo = self
            .get_photo(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", photo_id)))?;

        if photo.status != PhotoStatus::Pending {
            return Err(AppError::Refused(
                "Photo is not awaiting moderation".to_string(),
            ));
        }

        photo.status = PhotoStatus::Approved;
        self.upsert_photo(&photo).await?;

        tracing::info!(photo_id, "Photo approved");
        Ok(photo)
    }

    /// Atomically reject a photo: delete every vote referencing it, delete
    /// the photo itself, and decrement the owner's `photos_submitted`.
    pub async fn reject_photo_atomic(&self, photo: &Photo) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let votes = self.votes_for_photo(&photo.photo_id).await?;
        if votes.len() + 2 > MAX_TXN_WRITES {
            return Err(AppError::Database(format!(
                "Rejection cascade exceeds transaction limit ({} votes)",
                votes.len()
            )));
        }

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for vote in &votes {
            client
                .fluent()
                .delete()
                .from(collections::VOTES)
                .document_id(&Vote::doc_id(&vote.photo_id, &vote.user_id))
                .add_to_transaction(&mut transaction)
                .map_err(|e| AppError::Database(format!("Failed to add vote delete: {}", e)))?;
        }

        client
            .fluent()
            .delete()
            .from(collections::PHOTOS)
            .document_id(&photo.photo_id)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add photo delete: {}", e)))?;

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&photo.user_id)
            .transforms(|t| t.fields([t.field("photos_submitted").increment(-1)]))
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add counter write: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            photo_id = %photo.photo_id,
            owner = %photo.user_id,
            votes_removed = votes.len(),
            "Photo rejected"
        );

        Ok(votes.len())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL contest data for a user:
    /// - their photos, each with its votes (per-photo transaction)
    /// - votes they cast on other photos, decrementing those tallies
    /// - the profile document itself
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, uid: &str) -> Result<usize, AppError> {
        let client = self.get_client()?;
        let mut deleted_count = 0;

        // 1. Photos the user submitted, each rejected with its full cascade
        let photos = self.photos_by_user(uid).await?;
        for photo in &photos {
            deleted_count += self.reject_photo_atomic(photo).await? + 1;
        }
        tracing::debug!(uid, count = photos.len(), "Deleted user photos");

        // 2. Votes the user cast. Self-votes are refused at cast time, so
        //    every referenced photo belongs to someone else and survives
        //    step 1. Each delete pairs with a tally decrement on the photo,
        //    in its own transaction, with bounded concurrency.
        let votes = self.votes_by_user(uid).await?;
        let count = votes.len();
        stream::iter(votes)
            .map(|vote| async move {
                let mut transaction = client.begin_transaction().await.map_err(|e| {
                    AppError::Database(format!("Failed to begin transaction: {}", e))
                })?;

                client
                    .fluent()
                    .delete()
                    .from(collections::VOTES)
                    .document_id(&Vote::doc_id(&vote.photo_id, &vote.user_id))
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add vote delete: {}", e))
                    })?;

                client
                    .fluent()
                    .update()
                    .in_col(collections::PHOTOS)
                    .document_id(&vote.photo_id)
                    .transforms(|t| t.fields([t.field("vote_count").increment(-1)]))
                    .only_transform()
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add counter write: {}", e))
                    })?;

                transaction.commit().await.map_err(|e| {
                    AppError::Database(format!("Transaction commit failed: {}", e))
                })?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        deleted_count += count;
        tracing::debug!(uid, count, "Deleted user votes");

        // 3. The profile document
        self.delete_user(uid).await?;
        deleted_count += 1;

        tracing::info!(uid, deleted_count, "User data deleted");
        Ok(deleted_count)
    }
}
