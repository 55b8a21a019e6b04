// SPDX-License-Identifier: MIT

//! Streak and goal read routes.
//!
//! Plain projections of stored state; no derivation happens here.

use crate::dates::format_utc_rfc3339;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DailyGoal, StreakRecord, WeeklyGoal};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Streak routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/streak", get(get_streak))
        .route("/api/streak/daily-goals", get(get_daily_goals))
        .route("/api/streak/weekly-goals", get(get_weekly_goals))
        .route("/api/streak/stats", get(get_stats))
}

/// Get the user's streak record (zero state if none exists yet).
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakRecord>> {
    let streak = state.db.get_streak(user.user_id).await?.unwrap_or_else(|| {
        StreakRecord::zero(user.user_id, &format_utc_rfc3339(chrono::Utc::now()))
    });
    Ok(Json(streak))
}

// ─── Goal Projections ────────────────────────────────────────

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Get daily goal rows for a date range, newest first.
async fn get_daily_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<DailyGoal>>> {
    let goals = state
        .db
        .get_daily_goals(user.user_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(goals))
}

/// Get weekly goal rows whose week start falls in a date range, newest first.
async fn get_weekly_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<WeeklyGoal>>> {
    let goals = state
        .db
        .get_weekly_goals(user.user_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(goals))
}

// ─── Statistics ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub last_goal_met_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct PeriodSummary {
    pub days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
pub struct DailySummary {
    pub total_days: usize,
    pub days_goal_met: usize,
    pub success_rate: f64,
    pub total_hours: f64,
    pub average_hours_per_day: f64,
}

#[derive(Serialize)]
pub struct WeeklySummary {
    pub total_weeks: usize,
    pub weeks_goal_met: usize,
    pub success_rate: f64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub streak: StreakSummary,
    pub period: PeriodSummary,
    pub daily: DailySummary,
    pub weekly: WeeklySummary,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Widest trailing window the stats endpoint will compute (ten years).
const MAX_STATS_DAYS: i64 = 3650;

/// Success-rate statistics over the trailing N days (default 30).
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    // Clamp both ends: huge values would overflow the date math below.
    let days = query.days.unwrap_or(30).clamp(1, MAX_STATS_DAYS);
    let end_date = chrono::Utc::now().date_naive();
    let start_date = end_date - Duration::days(days);

    let streak = state
        .db
        .get_streak(user.user_id)
        .await?
        .unwrap_or_else(|| {
            StreakRecord::zero(user.user_id, &format_utc_rfc3339(chrono::Utc::now()))
        });

    let daily_goals = state
        .db
        .get_daily_goals(user.user_id, start_date, end_date)
        .await?;
    let weekly_goals = state
        .db
        .get_weekly_goals(user.user_id, start_date, end_date)
        .await?;

    let total_days = daily_goals.len();
    let days_goal_met = daily_goals.iter().filter(|g| g.goal_met).count();
    let total_hours: f64 = daily_goals.iter().map(|g| g.actual_hours).sum();

    let total_weeks = weekly_goals.len();
    let weeks_goal_met = weekly_goals.iter().filter(|g| g.goal_met).count();

    Ok(Json(StatsResponse {
        streak: StreakSummary {
            current: streak.current_streak,
            longest: streak.longest_streak,
            last_goal_met_date: streak.last_goal_met_date,
        },
        period: PeriodSummary {
            days,
            start_date,
            end_date,
        },
        daily: DailySummary {
            total_days,
            days_goal_met,
            success_rate: if total_days > 0 {
                round2(days_goal_met as f64 / total_days as f64 * 100.0)
            } else {
                0.0
            },
            total_hours: round2(total_hours),
            average_hours_per_day: if total_days > 0 {
                round2(total_hours / total_days as f64)
            } else {
                0.0
            },
        },
        weekly: WeeklySummary {
            total_weeks,
            weeks_goal_met,
            success_rate: if total_weeks > 0 {
                round2(weeks_goal_met as f64 / total_weeks as f64 * 100.0)
            } else {
                0.0
            },
        },
    }))
}
