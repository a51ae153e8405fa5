// SPDX-License-Identifier: MIT

//! JWT session middleware.
//!
//! The session token is carried in the `rally_token` cookie, with a bearer
//! header fallback for non-browser clients.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "rally_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth provider uid)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated principal extracted from a verified JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

fn token_from_request(jar: &CookieJar, request: &Request) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth_header.strip_prefix("Bearer ").map(|t| t.to_string())
}

fn verify_token(token: &str, signing_key: &[u8]) -> Option<AuthUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &key, &validation).ok()?;
    Some(AuthUser {
        uid: token_data.claims.sub,
    })
}

/// Verify a raw token and return its subject uid.
pub fn uid_from_token(token: &str, signing_key: &[u8]) -> Option<String> {
    verify_token(token, signing_key).map(|u| u.uid)
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = token_from_request(&jar, &request).ok_or(StatusCode::UNAUTHORIZED)?;

    let auth_user = verify_token(&token, &state.config.jwt_signing_key)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Middleware for routes that work with or without a session (menu, photo
/// detail). A valid token inserts the principal; a missing or invalid token
/// leaves the request anonymous rather than failing it.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = token_from_request(&jar, &request) {
        if let Some(auth_user) = verify_token(&token, &state.config.jwt_signing_key) {
            request.extensions_mut().insert(auth_user);
        }
    }
    next.run(request).await
}

/// Create a JWT for a user session.
pub fn create_jwt(uid: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: uid.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let key = b"test_jwt_key_32_bytes_minimum!!";
        let token = create_jwt("user-123", key).unwrap();
        let user = verify_token(&token, key).expect("token should verify");
        assert_eq!(user.uid, "user-123");
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_jwt("user-123", b"test_jwt_key_32_bytes_minimum!!").unwrap();
        assert!(verify_token(&token, b"another_key_32_bytes_minimum!!!").is_none());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.jwt", b"test_jwt_key_32_bytes_minimum!!").is_none());
    }
}
