// SPDX-License-Identifier: MIT

//! Aggregation pipeline over session edits.
//!
//! Every create, overwrite or delete of a work session triggers exactly one
//! pass for that session's date: Daily → Weekly → Streak, in that order.
//! The weekly step re-sums the whole Monday..Sunday window from the session
//! store; the streak step consumes the daily goal_met flag just computed.
//!
//! Two runs for the same user are serialized through a per-user async lock,
//! and the three aggregate writes commit in one Firestore transaction (see
//! `FirestoreDb::apply_aggregates_atomic`). Runs for different users share
//! no state and proceed in parallel.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::dates::week_bounds;
use crate::db::firestore::AggregateOutcome;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};

/// Orchestrates the daily/weekly/streak recompute for session edits.
pub struct AggregationPipeline {
    db: FirestoreDb,
    /// Per-user locks serializing pipeline runs within this instance
    user_locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl AggregationPipeline {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            user_locks: DashMap::new(),
        }
    }

    /// Run the pipeline after a session was created or overwritten.
    ///
    /// `minutes` is the already-resolved duration stored on the session.
    pub async fn on_session_write(
        &self,
        user_id: u64,
        date: NaiveDate,
        minutes: i64,
    ) -> Result<AggregateOutcome> {
        self.run(user_id, date, minutes).await
    }

    /// Run the pipeline after a session was deleted.
    ///
    /// A deletion is modeled as "this date had zero studied minutes". If the
    /// deleted date was the one anchoring the streak, the streak drops to
    /// zero even when later dates are still goal-met in the store; the
    /// pipeline deliberately never rescans later dates.
    pub async fn on_session_delete(&self, user_id: u64, date: NaiveDate) -> Result<AggregateOutcome> {
        self.run(user_id, date, 0).await
    }

    async fn run(&self, user_id: u64, date: NaiveDate, minutes: i64) -> Result<AggregateOutcome> {
        let lock = self
            .user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        // Full re-sum of the containing week from source. The session write
        // or delete has already landed, so the scan sees it.
        let (week_start, week_end) = week_bounds(date);
        let week_minutes = self
            .db
            .sum_duration_minutes(user_id, week_start, week_end)
            .await?;

        tracing::debug!(
            user_id,
            date = %date,
            minutes,
            week_minutes,
            "Running aggregation pipeline"
        );

        self.db
            .apply_aggregates_atomic(
                user_id,
                date,
                minutes,
                week_minutes,
                user.daily_goal_hours,
                user.weekly_goal_hours,
            )
            .await
    }
}
