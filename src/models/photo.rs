//! Photo model and moderation status.

use serde::{Deserialize, Serialize};

/// Moderation state of a submitted photo.
///
/// Wire values keep the Spanish literals already present in the stored data.
/// The only transition is `Pending -> Approved`; rejection deletes the
/// document instead of recording a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aprobado")]
    Approved,
}

/// Photo stored in Firestore, keyed by the client-generated `photo_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub photo_id: String,
    pub title: String,
    pub image_url: String,
    pub user_id: String,
    pub user_name: String,
    pub vote_count: u32,
    pub status: PhotoStatus,
    /// RFC 3339
    pub created_at: String,
}

impl Photo {
    /// New submission, awaiting moderation.
    pub fn new_submission(
        photo_id: String,
        title: String,
        image_url: String,
        user_id: String,
        user_name: String,
        now: String,
    ) -> Self {
        Self {
            photo_id,
            title,
            image_url,
            user_id,
            user_name,
            vote_count: 0,
            status: PhotoStatus::Pending,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&PhotoStatus::Pending).unwrap(),
            "\"pendiente\""
        );
        assert_eq!(
            serde_json::to_string(&PhotoStatus::Approved).unwrap(),
            "\"aprobado\""
        );

        let status: PhotoStatus = serde_json::from_str("\"aprobado\"").unwrap();
        assert_eq!(status, PhotoStatus::Approved);
    }

    #[test]
    fn test_new_submission_starts_pending() {
        let photo = Photo::new_submission(
            "p1".to_string(),
            "Atardecer".to_string(),
            "https://res.cloudinary.com/demo/image/upload/v1/p1.jpg".to_string(),
            "u1".to_string(),
            "Ana".to_string(),
            "2026-01-01T00:00:00+00:00".to_string(),
        );
        assert_eq!(photo.status, PhotoStatus::Pending);
        assert_eq!(photo.vote_count, 0);
    }
}
