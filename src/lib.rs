// SPDX-License-Identifier: MIT

//! PhotoRally: backend API for a photo-contest rally.
//!
//! This crate provides the server side of the rally application: session
//! handling, the role-gated navigation menu, photo submission and voting,
//! and administrator moderation, all backed by Firestore and Cloudinary.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{AccountDirectory, CloudinaryClient, ContestService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub accounts: AccountDirectory,
    pub images: CloudinaryClient,
    pub contest: ContestService,
}
