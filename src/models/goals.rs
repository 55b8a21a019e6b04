// SPDX-License-Identifier: MIT

//! Daily and weekly goal rollups derived from work sessions.
//!
//! These records are owned by the aggregation pipeline: one `DailyGoal` per
//! (user, date) and one `WeeklyGoal` per (user, week_start), recomputed on
//! every session write or delete for that date. Rows are never deleted, even
//! after their underlying session is removed; `actual_hours` just drops back
//! toward zero.
//!
//! `goal_hours` on both records is a snapshot taken when the row is first
//! created and is never refreshed on later writes, so it intentionally goes
//! stale if the user changes their goal setting afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::week_bounds;

/// Per-day goal status, keyed by (user_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub user_id: u64,
    pub date: NaiveDate,
    /// Goal in hours, snapshotted at row creation
    pub goal_hours: f64,
    /// Logged hours for the date
    pub actual_hours: f64,
    pub goal_met: bool,
    /// Last recompute timestamp (ISO 8601)
    pub updated_at: String,
}

impl DailyGoal {
    /// Document ID for the (user, date) key.
    pub fn doc_id(user_id: u64, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Recompute the daily rollup for `date` from a resolved minute count.
    ///
    /// If a row already exists, only `actual_hours` and `goal_met` change;
    /// its `goal_hours` snapshot stays, even when `goal_hours` differs from
    /// the value passed in. A zero or negative goal is not validated here
    /// and always reads as met.
    pub fn upsert(
        existing: Option<DailyGoal>,
        user_id: u64,
        date: NaiveDate,
        minutes: i64,
        goal_hours: f64,
        now: &str,
    ) -> DailyGoal {
        let actual_hours = minutes as f64 / 60.0;
        let effective_goal = existing.as_ref().map(|g| g.goal_hours).unwrap_or(goal_hours);
        DailyGoal {
            user_id,
            date,
            goal_hours: effective_goal,
            actual_hours,
            goal_met: actual_hours >= effective_goal,
            updated_at: now.to_string(),
        }
    }
}

/// Per-week goal status, keyed by (user_id, week_start).
///
/// Always recomputed in full from the week's sessions, never incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub user_id: u64,
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    /// Sunday of the same week
    pub week_end: NaiveDate,
    /// Goal in hours, snapshotted at row creation
    pub goal_hours: f64,
    /// Total logged hours across the week
    pub actual_hours: f64,
    pub goal_met: bool,
    /// Last recompute timestamp (ISO 8601)
    pub updated_at: String,
}

impl WeeklyGoal {
    /// Document ID for the (user, week_start) key.
    pub fn doc_id(user_id: u64, week_start: NaiveDate) -> String {
        format!("{}_{}", user_id, week_start)
    }

    /// Recompute the weekly rollup for the week containing `date` from the
    /// full re-summed minute total. Same snapshot asymmetry as `DailyGoal`.
    pub fn upsert(
        existing: Option<WeeklyGoal>,
        user_id: u64,
        date: NaiveDate,
        total_minutes: i64,
        goal_hours: f64,
        now: &str,
    ) -> WeeklyGoal {
        let (week_start, week_end) = week_bounds(date);
        let actual_hours = total_minutes as f64 / 60.0;
        let effective_goal = existing.as_ref().map(|g| g.goal_hours).unwrap_or(goal_hours);
        WeeklyGoal {
            user_id,
            week_start,
            week_end,
            goal_hours: effective_goal,
            actual_hours,
            goal_met: actual_hours >= effective_goal,
            updated_at: now.to_string(),
        }
    }
}
