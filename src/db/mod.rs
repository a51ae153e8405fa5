//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, VoteToggle};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PHOTOS: &str = "photos";
    pub const VOTES: &str = "votes";
    pub const RALLY_CONFIG: &str = "rally_config";
}

/// Document id of the rally configuration singleton.
pub const RALLY_DOC_ID: &str = "current";
