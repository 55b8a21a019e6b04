// SPDX-License-Identifier: MIT

//! Session routes: list, fetch, upsert and delete work sessions.
//!
//! Every successful session mutation triggers exactly one aggregation
//! pipeline pass for that session's date.

use crate::dates::format_utc_rfc3339;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StreakRecord, WorkSession};
use crate::services::resolve_minutes;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(save_session))
        .route(
            "/api/sessions/{date}",
            get(get_session_by_date).delete(delete_session),
        )
}

// ─── Listing ─────────────────────────────────────────────────

/// Optional date range for listing; both bounds or neither.
#[derive(Deserialize)]
pub struct ListSessionsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Get all sessions for the user, newest first.
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<WorkSession>>> {
    let range = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "start_date and end_date must be given together".to_string(),
            ))
        }
    };

    let sessions = state.db.get_sessions_for_user(user.user_id, range).await?;
    Ok(Json(sessions))
}

/// Get the session for a specific date.
async fn get_session_by_date(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<WorkSession>> {
    let session = state
        .db
        .get_session(user.user_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session found for {}", date)))?;
    Ok(Json(session))
}

// ─── Upsert ──────────────────────────────────────────────────

/// Create-or-overwrite request for a session.
#[derive(Deserialize)]
pub struct SaveSessionRequest {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct SaveSessionResponse {
    pub message: String,
    pub session: WorkSession,
    pub streak: StreakRecord,
}

/// Create or overwrite the session for a date, then run the pipeline.
///
/// Input validation happens before any store write: an unresolvable or
/// non-positive duration (end time before start time) is rejected with no
/// partial state change.
async fn save_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SaveSessionRequest>,
) -> Result<Json<SaveSessionResponse>> {
    let minutes = resolve_minutes(req.duration_minutes, req.start_time, req.end_time)
        .ok_or_else(|| {
            AppError::BadRequest(
                "duration_minutes or a start/end time pair is required".to_string(),
            )
        })?;
    if minutes <= 0 {
        return Err(AppError::BadRequest(
            "session duration must be positive (is the end time before the start?)".to_string(),
        ));
    }

    let now = format_utc_rfc3339(chrono::Utc::now());

    // Preserve created_at across overwrites of the same date.
    let existing = state.db.get_session(user.user_id, req.date).await?;
    let session = WorkSession {
        user_id: user.user_id,
        date: req.date,
        start_time: req.start_time,
        end_time: req.end_time,
        duration_minutes: minutes,
        description: req.description,
        category: req.category.unwrap_or_else(|| "study".to_string()),
        created_at: existing.map(|s| s.created_at).unwrap_or_else(|| now.clone()),
        updated_at: now,
    };

    state.db.upsert_session(&session).await?;

    let outcome = state
        .pipeline
        .on_session_write(user.user_id, session.date, session.duration_minutes)
        .await?;

    Ok(Json(SaveSessionResponse {
        message: "Session saved successfully".to_string(),
        session,
        streak: outcome.streak,
    }))
}

// ─── Delete ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteSessionResponse {
    pub message: String,
    pub streak: StreakRecord,
}

/// Delete the session for a date, then run the pipeline with zero minutes.
///
/// The daily and weekly rollups for the date survive the delete with their
/// actual hours dropped toward zero.
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DeleteSessionResponse>> {
    if state.db.get_session(user.user_id, date).await?.is_none() {
        return Err(AppError::NotFound(format!("No session found for {}", date)));
    }

    state.db.delete_session(user.user_id, date).await?;

    let outcome = state.pipeline.on_session_delete(user.user_id, date).await?;

    Ok(Json(DeleteSessionResponse {
        message: "Session deleted successfully".to_string(),
        streak: outcome.streak,
    }))
}
