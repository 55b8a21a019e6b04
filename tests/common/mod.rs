// SPDX-License-Identifier: MIT

use std::sync::Arc;
use studytrack::config::Config;
use studytrack::db::FirestoreDb;
use studytrack::models::User;
use studytrack::routes::create_router;
use studytrack::services::AggregationPipeline;
use studytrack::AppState;

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

/// Create a test app with an offline mock database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let pipeline = AggregationPipeline::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        pipeline,
    });

    (create_router(state.clone()), state)
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

/// Basic test user with configurable goal hours.
#[allow(dead_code)]
pub fn test_user(user_id: u64, daily_goal_hours: f64, weekly_goal_hours: f64) -> User {
    User {
        user_id,
        email: Some("test@example.com".to_string()),
        display_name: "Test User".to_string(),
        daily_goal_hours,
        weekly_goal_hours,
        created_at: chrono::Utc::now().to_rfc3339(),
        last_active: chrono::Utc::now().to_rfc3339(),
    }
}
