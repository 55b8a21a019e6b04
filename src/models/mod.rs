// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod goals;
pub mod session;
pub mod streak;
pub mod user;

pub use goals::{DailyGoal, WeeklyGoal};
pub use session::WorkSession;
pub use streak::StreakRecord;
pub use user::User;
