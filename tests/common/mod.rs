// SPDX-License-Identifier: MIT

use photo_rally::config::Config;
use photo_rally::db::FirestoreDb;
use photo_rally::routes::create_router;
use photo_rally::services::{AccountDirectory, CloudinaryClient, ContestService};
use photo_rally::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let accounts = AccountDirectory::new(config.firebase_api_key.clone());
    let images = CloudinaryClient::new(
        &config.cloudinary_cloud_name,
        config.cloudinary_upload_preset.clone(),
    );
    let contest = ContestService::new(db.clone(), images.clone());

    let state = Arc::new(AppState {
        config,
        db,
        accounts,
        images,
        contest,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT for a uid.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, signing_key: &[u8]) -> String {
    photo_rally::middleware::auth::create_jwt(uid, signing_key).expect("JWT creation failed")
}
