//! Vote model.

use serde::{Deserialize, Serialize};

/// A single vote, at most one per `(photo_id, user_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub photo_id: String,
    pub user_id: String,
    /// RFC 3339
    pub created_at: String,
}

impl Vote {
    /// Deterministic document id for a `(photo, user)` pair.
    ///
    /// Using this as the primary key makes vote creation idempotent: a rapid
    /// double-tap overwrites the same document instead of producing a
    /// duplicate record.
    pub fn doc_id(photo_id: &str, user_id: &str) -> String {
        format!("{}_{}", photo_id, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_deterministic() {
        assert_eq!(Vote::doc_id("p1", "u1"), "p1_u1");
        assert_eq!(Vote::doc_id("p1", "u1"), Vote::doc_id("p1", "u1"));
        assert_ne!(Vote::doc_id("p1", "u2"), Vote::doc_id("p1", "u1"));
    }
}
