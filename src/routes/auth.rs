// SPDX-License-Identifier: MIT

//! Sign-up, login and logout.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{Role, UserProfile};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

fn session_cookie(jwt: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, jwt))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build()
}

fn validation_error(e: validator::ValidationErrors) -> AppError {
    // Surface the first field message; the full structure stays server-side.
    let msg = e
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .filter_map(|err| err.message.as_ref())
        .next()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid input".to_string());
    AppError::Validation(msg)
}

/// Create an account, its profile document, and a session.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignUpRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate().map_err(validation_error)?;

    let account = state.accounts.sign_up(&req.email, &req.password).await?;

    // Display name lives on the directory record too; a failure there is
    // logged but does not abort sign-up, the profile document is the source
    // the app reads.
    if let Err(e) = state
        .accounts
        .update_display_name(&account.id_token, &req.name)
        .await
    {
        tracing::warn!(uid = %account.uid, error = %e, "Display name sync failed");
    }

    let profile = UserProfile::new(
        account.uid.clone(),
        account.email.clone(),
        req.name.clone(),
        chrono::Utc::now().to_rfc3339(),
    );
    state.db.upsert_user(&profile).await?;

    tracing::info!(uid = %account.uid, "User signed up");

    let jwt = create_jwt(&account.uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok((
        jar.add(session_cookie(jwt)),
        Json(SessionResponse {
            uid: account.uid,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        }),
    ))
}

/// Verify credentials, mark the profile active, open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate().map_err(validation_error)?;

    let account = state.accounts.sign_in(&req.email, &req.password).await?;

    let mut profile = state
        .db
        .get_user(&account.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for {} not found", account.uid)))?;

    profile.is_active = true;
    state.db.upsert_user(&profile).await?;

    tracing::info!(uid = %account.uid, "User logged in");

    let jwt = create_jwt(&account.uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok((
        jar.add(session_cookie(jwt)),
        Json(SessionResponse {
            uid: account.uid,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        }),
    ))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Close the session.
///
/// The `is_active` flag is written while the session is still valid, then
/// the cookie is expired. The ordering matters: after the cookie is gone the
/// caller can no longer write to its own profile. The flag write is
/// best-effort; a failure is logged and logout proceeds.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(uid) = crate::middleware::auth::uid_from_token(
            cookie.value(),
            &state.config.jwt_signing_key,
        ) {
            if let Err(e) = state.db.set_user_active(&uid, false).await {
                tracing::warn!(uid = %uid, error = %e, "Failed to clear is_active on logout");
            } else {
                tracing::info!(uid = %uid, "User logged out");
            }
        }
    }

    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.remove(removal), Json(LogoutResponse { success: true })))
}
