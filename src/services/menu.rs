// SPDX-License-Identifier: MIT

//! Role-gated navigation menu.
//!
//! Every destination in the app is listed once in [`MANIFEST`], tagged with
//! its visibility predicates. Screens pass an allow-list of destinations
//! relevant to them; the filter combines auth state, role, tags and
//! allow-list into the visible subset.

use crate::models::Role;
use crate::services::Session;
use serde::{Deserialize, Serialize};

/// Navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Home,
    Login,
    SignUp,
    Gallery,
    Profile,
    UploadPhoto,
    Ranking,
    EditProfile,
    UserDashboard,
    EditRallyInfo,
}

impl Destination {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Home" => Some(Self::Home),
            "Login" => Some(Self::Login),
            "SignUp" => Some(Self::SignUp),
            "Gallery" => Some(Self::Gallery),
            "Profile" => Some(Self::Profile),
            "UploadPhoto" => Some(Self::UploadPhoto),
            "Ranking" => Some(Self::Ranking),
            "EditProfile" => Some(Self::EditProfile),
            "UserDashboard" => Some(Self::UserDashboard),
            "EditRallyInfo" => Some(Self::EditRallyInfo),
            _ => None,
        }
    }
}

/// Visibility predicates a destination may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Public,
    OnlyIfLoggedOut,
    AdminOnly,
    ParticipantOnly,
}

/// A manifest entry: destination, display label, visibility tags.
#[derive(Debug)]
pub struct MenuEntry {
    pub destination: Destination,
    pub label: &'static str,
    pub tags: &'static [Tag],
}

impl MenuEntry {
    fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// The static manifest of all destinations.
pub const MANIFEST: &[MenuEntry] = &[
    MenuEntry {
        destination: Destination::Home,
        label: "Inicio",
        tags: &[Tag::Public],
    },
    MenuEntry {
        destination: Destination::Login,
        label: "Iniciar sesión",
        tags: &[Tag::OnlyIfLoggedOut],
    },
    MenuEntry {
        destination: Destination::SignUp,
        label: "Registrarse",
        tags: &[Tag::OnlyIfLoggedOut],
    },
    MenuEntry {
        destination: Destination::Gallery,
        label: "Galería",
        tags: &[Tag::Public],
    },
    MenuEntry {
        destination: Destination::Profile,
        label: "Perfil",
        tags: &[],
    },
    MenuEntry {
        destination: Destination::UploadPhoto,
        label: "Subir Foto",
        tags: &[Tag::ParticipantOnly],
    },
    MenuEntry {
        destination: Destination::Ranking,
        label: "Ranking",
        tags: &[Tag::Public],
    },
    MenuEntry {
        destination: Destination::EditProfile,
        label: "Editar perfil",
        tags: &[],
    },
    MenuEntry {
        destination: Destination::UserDashboard,
        label: "Panel de usuarios",
        tags: &[Tag::AdminOnly],
    },
    MenuEntry {
        destination: Destination::EditRallyInfo,
        label: "Editar rally",
        tags: &[Tag::AdminOnly],
    },
];

/// Compute the visible subset of the manifest for a session and a caller
/// allow-list. Rules are evaluated per destination, first match wins:
///
/// 1. No principal: visible iff `Public` or `OnlyIfLoggedOut`.
/// 2. Principal present and `OnlyIfLoggedOut`: hidden.
/// 3. `AdminOnly`: visible iff administrator and allow-listed.
/// 4. `ParticipantOnly`: visible iff participant.
/// 5. Otherwise: visible iff allow-listed.
pub fn visible_destinations<'a>(
    session: &Session,
    allowed: &[Destination],
) -> Vec<&'a MenuEntry> {
    MANIFEST
        .iter()
        .filter(|entry| {
            if !session.is_authenticated() {
                return entry.has(Tag::Public) || entry.has(Tag::OnlyIfLoggedOut);
            }
            if entry.has(Tag::OnlyIfLoggedOut) {
                return false;
            }
            if entry.has(Tag::AdminOnly) {
                return session.role() == Some(Role::Administrator)
                    && allowed.contains(&entry.destination);
            }
            if entry.has(Tag::ParticipantOnly) {
                return session.role() == Some(Role::Participant);
            }
            allowed.contains(&entry.destination)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    fn session_with_role(role: Role) -> Session {
        Session {
            uid: Some("u1".to_string()),
            profile: Some(UserProfile {
                uid: "u1".to_string(),
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                role,
                is_active: true,
                photos_submitted: 0,
                votes_given: 0,
                profile_image_url: None,
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
            }),
        }
    }

    fn names(entries: &[&MenuEntry]) -> Vec<Destination> {
        entries.iter().map(|e| e.destination).collect()
    }

    #[test]
    fn test_anonymous_sees_only_public_and_logged_out() {
        let visible = visible_destinations(&Session::anonymous(), &[Destination::Profile]);
        assert_eq!(
            names(&visible),
            vec![
                Destination::Home,
                Destination::Login,
                Destination::SignUp,
                Destination::Gallery,
                Destination::Ranking,
            ]
        );
    }

    #[test]
    fn test_logged_out_entries_never_shown_to_principals() {
        for role in [Role::Participant, Role::Administrator] {
            let visible = visible_destinations(
                &session_with_role(role),
                &[Destination::Login, Destination::SignUp],
            );
            assert!(!names(&visible).contains(&Destination::Login));
            assert!(!names(&visible).contains(&Destination::SignUp));
        }
    }

    #[test]
    fn test_participant_sees_upload_without_allow_list() {
        let visible = visible_destinations(&session_with_role(Role::Participant), &[]);
        assert!(names(&visible).contains(&Destination::UploadPhoto));
        assert!(!names(&visible).contains(&Destination::UserDashboard));
    }

    #[test]
    fn test_admin_entries_require_allow_list() {
        let session = session_with_role(Role::Administrator);

        let without = visible_destinations(&session, &[]);
        assert!(!names(&without).contains(&Destination::UserDashboard));

        let with = visible_destinations(&session, &[Destination::UserDashboard]);
        assert!(names(&with).contains(&Destination::UserDashboard));
        assert!(!names(&with).contains(&Destination::EditRallyInfo));
    }

    #[test]
    fn test_admin_never_sees_participant_only() {
        let visible = visible_destinations(
            &session_with_role(Role::Administrator),
            &[Destination::UploadPhoto],
        );
        assert!(!names(&visible).contains(&Destination::UploadPhoto));
    }

    #[test]
    fn test_untagged_entries_follow_allow_list() {
        let session = session_with_role(Role::Participant);

        let without = visible_destinations(&session, &[]);
        assert!(!names(&without).contains(&Destination::Profile));

        let with = visible_destinations(&session, &[Destination::Profile]);
        assert!(names(&with).contains(&Destination::Profile));
    }

    #[test]
    fn test_principal_without_profile_gets_allow_list_only() {
        // Degraded session: token is valid but the profile fetch failed.
        let session = Session {
            uid: Some("u1".to_string()),
            profile: None,
        };
        let visible = visible_destinations(&session, &[Destination::Home, Destination::Gallery]);
        assert_eq!(
            names(&visible),
            vec![Destination::Home, Destination::Gallery]
        );
    }

    #[test]
    fn test_destination_names_round_trip() {
        assert_eq!(Destination::from_name("Gallery"), Some(Destination::Gallery));
        assert_eq!(Destination::from_name("Nope"), None);
    }
}
