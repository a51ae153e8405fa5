// SPDX-License-Identifier: MIT

//! PhotoRally API Server
//!
//! Serves the rally contest application: sessions, the role-gated menu,
//! photo submission and voting, and administrator moderation.

use photo_rally::{
    config::Config,
    db::FirestoreDb,
    services::{AccountDirectory, CloudinaryClient, ContestService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment; all credentials are required
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting PhotoRally API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Account directory (Identity Toolkit)
    let accounts = AccountDirectory::new(config.firebase_api_key.clone());
    tracing::info!("Account directory client initialized");

    // Image host (Cloudinary)
    let images = CloudinaryClient::new(
        &config.cloudinary_cloud_name,
        config.cloudinary_upload_preset.clone(),
    );
    tracing::info!(cloud = %config.cloudinary_cloud_name, "Image host client initialized");

    // Contest workflow service
    let contest = ContestService::new(db.clone(), images.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        accounts,
        images,
        contest,
    });

    // Build router
    let app = photo_rally::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("photo_rally=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
