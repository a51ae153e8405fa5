//! Rally configuration singleton.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contest configuration, stored as the single document
/// `rally_config/current`. Read by almost every endpoint; written only by
/// administrators.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RallyConfig {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub is_active: bool,
    #[validate(range(min = 1, message = "Must allow at least 1 photo per user"))]
    pub max_photos_per_user: u32,
    #[validate(range(min = 1, message = "Must allow at least 1 vote per user"))]
    pub max_votes_per_user: u32,
    /// RFC 3339 contest windows
    pub registration_start: String,
    pub registration_end: String,
    pub submission_start: String,
    pub submission_end: String,
    pub voting_start: String,
    pub voting_end: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RallyConfig {
        RallyConfig {
            title: "Rally de Primavera".to_string(),
            description: "Concurso fotográfico".to_string(),
            is_active: true,
            max_photos_per_user: 5,
            max_votes_per_user: 10,
            registration_start: "2026-03-01T00:00:00+00:00".to_string(),
            registration_end: "2026-03-15T00:00:00+00:00".to_string(),
            submission_start: "2026-03-10T00:00:00+00:00".to_string(),
            submission_end: "2026-04-01T00:00:00+00:00".to_string(),
            voting_start: "2026-04-01T00:00:00+00:00".to_string(),
            voting_end: "2026-04-15T00:00:00+00:00".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_zero_max_photos_rejected() {
        let mut config = sample();
        config.max_photos_per_user = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_votes_rejected() {
        let mut config = sample();
        config.max_votes_per_user = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut config = sample();
        config.title.clear();
        assert!(config.validate().is_err());
    }
}
