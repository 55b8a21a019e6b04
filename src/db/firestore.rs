// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, read-only source of goal settings)
//! - Work sessions (one document per user per date)
//! - Daily/weekly goal rollups and streak records (owned by the pipeline)
//!
//! The three aggregate documents for one pipeline run are committed in a
//! single Firestore transaction so they land together or not at all.
//! Serialization of concurrent runs for the same user is the pipeline's
//! job (per-user lock), not this layer's.

use chrono::NaiveDate;

use crate::db::collections;
use crate::dates::format_utc_rfc3339;
use crate::error::AppError;
use crate::models::{DailyGoal, StreakRecord, User, WeeklyGoal, WorkSession};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Result of one transactional aggregate pass for a (user, date).
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub daily: DailyGoal,
    pub weekly: WeeklyGoal,
    pub streak: StreakRecord,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    ///
    /// Profile ownership belongs to the auth service; this exists for tests
    /// and for refreshing `last_active`.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.user_id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Get the session for a specific date, if any.
    pub async fn get_session(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<WorkSession>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SESSIONS)
            .obj()
            .one(&WorkSession::doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get sessions for a user, optionally bounded to a date range, newest first.
    pub async fn get_sessions_for_user(
        &self,
        user_id: u64,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<WorkSession>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SESSIONS);

        let query = if let Some((start, end)) = range {
            let (start, end) = (start.to_string(), end.to_string());
            query.filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("date").greater_than_or_equal(start.clone()),
                    q.field("date").less_than_or_equal(end.clone()),
                ])
            })
        } else {
            query.filter(move |q| q.field("user_id").eq(user_id))
        };

        query
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite the session for (user, date).
    pub async fn upsert_session(&self, session: &WorkSession) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SESSIONS)
            .document_id(WorkSession::doc_id(session.user_id, session.date))
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the session for (user, date). Deleting a missing document is a no-op.
    pub async fn delete_session(&self, user_id: u64, date: NaiveDate) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SESSIONS)
            .document_id(WorkSession::doc_id(user_id, date))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Sum session minutes over [start, end] inclusive.
    ///
    /// A full re-read of the range, not an incremental counter: correct after
    /// any edit or delete at the cost of a range scan per call.
    pub async fn sum_duration_minutes(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, AppError> {
        let sessions = self.get_sessions_for_user(user_id, Some((start, end))).await?;
        Ok(sessions.iter().map(|s| s.duration_minutes).sum())
    }

    // ─── Goal Rollup Reads ───────────────────────────────────────

    /// Get the daily goal row for a date, if any.
    pub async fn get_daily_goal(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<DailyGoal>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_GOALS)
            .obj()
            .one(&DailyGoal::doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get daily goal rows in [start, end], newest first.
    pub async fn get_daily_goals(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyGoal>, AppError> {
        let (start, end) = (start.to_string(), end.to_string());
        self.get_client()?
            .fluent()
            .select()
            .from(collections::DAILY_GOALS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("date").greater_than_or_equal(start.clone()),
                    q.field("date").less_than_or_equal(end.clone()),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the weekly goal row for a week start, if any.
    pub async fn get_weekly_goal(
        &self,
        user_id: u64,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyGoal>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WEEKLY_GOALS)
            .obj()
            .one(&WeeklyGoal::doc_id(user_id, week_start))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get weekly goal rows whose week_start is in [start, end], newest first.
    pub async fn get_weekly_goals(
        &self,
        user_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeeklyGoal>, AppError> {
        let (start, end) = (start.to_string(), end.to_string());
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WEEKLY_GOALS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("week_start").greater_than_or_equal(start.clone()),
                    q.field("week_start").less_than_or_equal(end.clone()),
                ])
            })
            .order_by([("week_start", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Streak Operations ───────────────────────────────────────

    /// Get the streak singleton for a user, if any.
    ///
    /// Callers treat a missing record as zero state, never an error.
    pub async fn get_streak(&self, user_id: u64) -> Result<Option<StreakRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::STREAKS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Transactional Aggregate Update ──────────────────────────

    /// Apply one aggregate pass for (user, date) atomically.
    ///
    /// Reads the current DailyGoal, WeeklyGoal and StreakRecord, applies the
    /// pure recompute rules, and commits all three writes in one Firestore
    /// transaction: they land together or the run fails with a store error.
    /// The reads are plain selects, not bound to the transaction, so this
    /// does not detect a concurrent writer by itself; callers must hold the
    /// per-user pipeline lock across the call.
    ///
    /// `minutes` is the resolved duration for `date` (0 for a delete);
    /// `week_minutes` is the caller's full re-sum over the containing week.
    pub async fn apply_aggregates_atomic(
        &self,
        user_id: u64,
        date: NaiveDate,
        minutes: i64,
        week_minutes: i64,
        daily_goal_hours: f64,
        weekly_goal_hours: f64,
    ) -> Result<AggregateOutcome, AppError> {
        let now = format_utc_rfc3339(chrono::Utc::now());
        let (week_start, _) = crate::dates::week_bounds(date);

        // Begin a transaction
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Read the current state of the three aggregate documents.
        let current_daily = self.get_daily_goal(user_id, date).await?;
        let current_weekly = self.get_weekly_goal(user_id, week_start).await?;
        let current_streak = self.get_streak(user_id).await?;

        // Daily → Weekly → Streak, in that order. The streak transition must
        // consume the goal_met flag the daily step just computed.
        let daily = DailyGoal::upsert(current_daily, user_id, date, minutes, daily_goal_hours, &now);
        let weekly = WeeklyGoal::upsert(
            current_weekly,
            user_id,
            date,
            week_minutes,
            weekly_goal_hours,
            &now,
        );
        let mut streak = current_streak.unwrap_or_else(|| StreakRecord::zero(user_id, &now));
        streak.apply(date, daily.goal_met, &now);

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_GOALS)
            .document_id(DailyGoal::doc_id(user_id, date))
            .object(&daily)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add daily goal to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::WEEKLY_GOALS)
            .document_id(WeeklyGoal::doc_id(user_id, week_start))
            .object(&weekly)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add weekly goal to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::STREAKS)
            .document_id(user_id.to_string())
            .object(&streak)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add streak to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id,
            date = %date,
            minutes,
            daily_goal_met = daily.goal_met,
            current_streak = streak.current_streak,
            "Aggregates updated atomically"
        );

        Ok(AggregateOutcome {
            daily,
            weekly,
            streak,
        })
    }
}
