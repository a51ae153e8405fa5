//! User profile model and role capabilities.

use serde::{Deserialize, Serialize};

/// Contest role stored on each profile.
///
/// A closed variant rather than a free-form string: every permission check
/// goes through the capability methods below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Administrator,
}

impl Role {
    /// Participants submit photos and cast votes.
    pub fn can_vote(self) -> bool {
        matches!(self, Role::Participant)
    }

    /// Participants submit photos; administrators moderate instead.
    pub fn can_submit(self) -> bool {
        matches!(self, Role::Participant)
    }

    /// Administrators approve/reject photos, edit the rally config and
    /// manage the user dashboard.
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Administrator)
    }
}

/// User profile stored in Firestore, keyed by the auth provider uid.
/// The uid is also stored as a field so listings carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub photos_submitted: u32,
    pub votes_given: u32,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// RFC 3339
    pub created_at: String,
}

impl UserProfile {
    /// Fresh profile created at sign-up.
    pub fn new(uid: String, email: String, name: String, now: String) -> Self {
        Self {
            uid,
            email,
            name,
            role: Role::Participant,
            is_active: true,
            photos_submitted: 0,
            votes_given: 0,
            profile_image_url: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Role::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");

        let role: Role = serde_json::from_str("\"participant\"").unwrap();
        assert_eq!(role, Role::Participant);
    }

    #[test]
    fn test_capabilities() {
        assert!(Role::Participant.can_vote());
        assert!(Role::Participant.can_submit());
        assert!(!Role::Participant.can_moderate());

        assert!(Role::Administrator.can_moderate());
        assert!(!Role::Administrator.can_vote());
        assert!(!Role::Administrator.can_submit());
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new(
            "u1".to_string(),
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "2026-01-01T00:00:00+00:00".to_string(),
        );
        assert_eq!(profile.role, Role::Participant);
        assert!(profile.is_active);
        assert_eq!(profile.photos_submitted, 0);
        assert_eq!(profile.votes_given, 0);
        assert!(profile.profile_image_url.is_none());
    }
}
