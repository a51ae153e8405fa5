//! Application configuration loaded from environment variables.
//!
//! All backend credentials are required at startup; a missing variable
//! aborts the process before any listener is bound.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Firebase web API key (Identity Toolkit)
    pub firebase_api_key: String,
    /// Cloudinary cloud name
    pub cloudinary_cloud_name: String,
    /// Cloudinary unsigned upload preset
    pub cloudinary_upload_preset: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?,
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            cloudinary_upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_UPLOAD_PRESET"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:19006".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_upload_preset: "rally_photos_preset".to_string(),
            frontend_url: "http://localhost:19006".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GCP_PROJECT_ID", "rally-project");
        env::set_var("FIREBASE_API_KEY", "key");
        env::set_var("CLOUDINARY_CLOUD_NAME", "cloud");
        env::set_var("CLOUDINARY_UPLOAD_PRESET", "preset");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.gcp_project_id, "rally-project");
        assert_eq!(config.cloudinary_cloud_name, "cloud");
        assert_eq!(config.port, 8080);
    }
}
