// SPDX-License-Identifier: MIT

//! Account directory client (Firebase Identity Toolkit REST API).
//!
//! Handles:
//! - Account creation at sign-up
//! - Credential verification at login
//! - Display name updates
//!
//! Provider error codes are mapped to a small fixed set of user-facing
//! errors; the raw code is logged but never returned to the client.

use crate::error::AppError;
use serde::Deserialize;

/// Account directory client.
#[derive(Clone)]
pub struct AccountDirectory {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// A directory principal: stable uid plus the provider session token.
#[derive(Debug, Clone)]
pub struct DirectoryAccount {
    pub uid: String,
    pub email: String,
    pub id_token: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: String,
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AccountDirectory {
    /// Create a new directory client with the project's web API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            api_key,
        }
    }

    /// Create a directory client against a custom endpoint (tests/emulator).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create a new account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<DirectoryAccount, AppError> {
        self.credential_call("accounts:signUp", email, password)
            .await
    }

    /// Verify credentials and open a provider session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<DirectoryAccount, AppError> {
        self.credential_call("accounts:signInWithPassword", email, password)
            .await
    }

    /// Update the display name on the directory record.
    pub async fn update_display_name(&self, id_token: &str, name: &str) -> Result<(), AppError> {
        let url = format!("{}/accounts:update?key={}", self.base_url, self.api_key);

        let body = serde_json::json!({
            "idToken": id_token,
            "displayName": name,
            "returnSecureToken": false,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let code = Self::error_code(response).await;
            tracing::warn!(code = %code, "Display name update failed");
            return Err(AppError::AuthProvider(code));
        }

        Ok(())
    }

    async fn credential_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<DirectoryAccount, AppError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let code = Self::error_code(response).await;
            return Err(Self::map_error_code(&code));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Malformed auth response: {}", e)))?;

        Ok(DirectoryAccount {
            uid: auth.local_id,
            email: auth.email,
            id_token: auth.id_token,
        })
    }

    async fn error_code(response: reqwest::Response) -> String {
        match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => "UNKNOWN".to_string(),
        }
    }

    /// Map a provider error code to one of the fixed user-facing errors.
    fn map_error_code(code: &str) -> AppError {
        // Codes may carry a suffix, e.g. "WEAK_PASSWORD : Password should be...".
        let base = code.split(':').next().unwrap_or(code).trim();
        match base {
            "EMAIL_EXISTS" => AppError::Validation("Email is already registered".to_string()),
            "INVALID_EMAIL" => AppError::Validation("Invalid email address".to_string()),
            "WEAK_PASSWORD" => {
                AppError::Validation("Password must be at least 6 characters".to_string())
            }
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => AppError::InvalidCredentials,
            other => {
                tracing::warn!(code = %other, "Unmapped auth provider error");
                AppError::AuthProvider(other.to_string())
            }
        }
    }
}
