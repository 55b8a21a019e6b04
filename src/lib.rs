// SPDX-License-Identifier: MIT

//! Studytrack: study-session goal and streak tracking.
//!
//! This crate provides the backend API for logging daily work sessions and
//! deriving per-day goal status, per-week goal status and consecutive-day
//! streaks from the resulting edit stream.

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::AggregationPipeline;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub pipeline: AggregationPipeline,
}
