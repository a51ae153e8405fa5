// SPDX-License-Identifier: MIT

//! Navigation menu endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::{menu, Destination, Session};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/menu", get(get_menu))
}

#[derive(Deserialize)]
struct MenuQuery {
    /// Comma-separated allow-list of destination names for the current
    /// screen. Unknown names are ignored.
    #[serde(default)]
    allow: String,
}

#[derive(Serialize)]
pub struct MenuItem {
    pub destination: Destination,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct MenuResponse {
    pub items: Vec<MenuItem>,
    pub user_name: Option<String>,
}

/// Visible destinations for the caller's session and screen allow-list.
async fn get_menu(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthUser>>,
    Query(params): Query<MenuQuery>,
) -> Result<Json<MenuResponse>> {
    let uid = user.as_ref().map(|Extension(u)| u.uid.as_str());
    let session = Session::resolve(&state.db, uid).await;

    let allowed: Vec<Destination> = params
        .allow
        .split(',')
        .filter_map(|name| Destination::from_name(name.trim()))
        .collect();

    let items = menu::visible_destinations(&session, &allowed)
        .into_iter()
        .map(|entry| MenuItem {
            destination: entry.destination,
            label: entry.label,
        })
        .collect();

    // Header shows the display name, falling back to the email like the
    // menu component always has.
    let user_name = session
        .profile
        .as_ref()
        .map(|p| if p.name.is_empty() { p.email.clone() } else { p.name.clone() });

    Ok(Json(MenuResponse { items, user_name }))
}
