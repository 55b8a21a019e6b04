//! User model for storage and API.
//!
//! Profile creation and authentication live in the external auth service;
//! the aggregation pipeline only reads the goal settings from here.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub user_id: u64,
    /// Email address
    pub email: Option<String>,
    /// Display name
    pub display_name: String,
    /// Daily study goal in hours
    pub daily_goal_hours: f64,
    /// Weekly study goal in hours
    pub weekly_goal_hours: f64,
    /// When the user registered (ISO 8601)
    pub created_at: String,
    /// Last activity timestamp (ISO 8601)
    pub last_active: String,
}
