//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const SESSIONS: &str = "work_sessions";
    pub const DAILY_GOALS: &str = "daily_goals";
    pub const WEEKLY_GOALS: &str = "weekly_goals";
    /// Streak singletons (keyed by user_id)
    pub const STREAKS: &str = "streaks";
}
