// SPDX-License-Identifier: MIT

//! Work session model for storage and API.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A logged study session, at most one per user per calendar date.
///
/// Writing a second session for an already-used date overwrites the first
/// (upsert semantics, not an error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSession {
    /// Owning user ID (part of the document ID)
    pub user_id: u64,
    /// Calendar date, unique per user (part of the document ID)
    pub date: NaiveDate,
    /// Optional start time of day
    pub start_time: Option<NaiveTime>,
    /// Optional end time of day
    pub end_time: Option<NaiveTime>,
    /// Resolved duration in minutes
    pub duration_minutes: i64,
    /// Free-form note
    pub description: Option<String>,
    /// Session category (defaults to "study")
    pub category: String,
    /// When this session was first created (ISO 8601)
    pub created_at: String,
    /// When this session was last overwritten (ISO 8601)
    pub updated_at: String,
}

impl WorkSession {
    /// Document ID for the (user, date) key.
    pub fn doc_id(user_id: u64, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date)
    }
}
