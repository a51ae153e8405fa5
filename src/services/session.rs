// SPDX-License-Identifier: MIT

//! Session and role resolution.
//!
//! A verified token only proves who the caller is; what they may do comes
//! from their profile document. Resolution re-reads the profile on every
//! request so role changes and deactivations take effect immediately.

use crate::db::FirestoreDb;
use crate::models::{Role, UserProfile};

/// The resolved caller: principal (if any), profile (if found), role.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub uid: Option<String>,
    pub profile: Option<UserProfile>,
}

impl Session {
    /// No principal.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolve a session from an optional authenticated uid.
    ///
    /// A profile fetch failure degrades to "principal without role" rather
    /// than failing the request, and is always logged.
    pub async fn resolve(db: &FirestoreDb, uid: Option<&str>) -> Self {
        let Some(uid) = uid else {
            return Self::anonymous();
        };

        let profile = match db.get_user(uid).await {
            Ok(profile) => {
                if profile.is_none() {
                    tracing::warn!(uid, "Authenticated principal has no profile document");
                }
                profile
            }
            Err(e) => {
                tracing::warn!(uid, error = %e, "Profile fetch failed, degrading to no role");
                None
            }
        };

        Self {
            uid: Some(uid.to_string()),
            profile,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }
}
