// SPDX-License-Identifier: MIT

//! Consecutive-day streak record, one per user.
//!
//! The streak is advanced forward-only: every transition compares the
//! freshly-written date against whatever `last_goal_met_date` is currently
//! stored, never a rescan of daily history. Editing or deleting a date
//! earlier than `last_goal_met_date` therefore does not retroactively repair
//! a streak derived from later dates. That limitation is deliberate and
//! load-bearing for callers; do not "fix" it here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Singleton streak state per user, keyed by user_id.
///
/// Invariant: `longest_streak >= current_streak` after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub user_id: u64,
    /// Consecutive goal-met days ending at `last_goal_met_date`
    pub current_streak: u32,
    /// Historical maximum of `current_streak`
    pub longest_streak: u32,
    /// Most recent date whose daily goal was met
    pub last_goal_met_date: Option<NaiveDate>,
    /// Last transition timestamp (ISO 8601)
    pub updated_at: String,
}

impl StreakRecord {
    /// Zero state for a user with no streak history yet.
    pub fn zero(user_id: u64, now: &str) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_goal_met_date: None,
            updated_at: now.to_string(),
        }
    }

    /// Apply one day's goal-met outcome.
    ///
    /// Transition is driven by the signed gap in calendar days between `date`
    /// and `last_goal_met_date`:
    /// - not met: reset `current_streak` to 0, keep `last_goal_met_date`;
    /// - met, no previous date: start a streak of 1;
    /// - met, gap 1: extend the streak;
    /// - met, gap 0: same-day rewrite, no change;
    /// - met, any other gap (including negative, i.e. a past-date edit):
    ///   restart at 1 anchored to `date`.
    pub fn apply(&mut self, date: NaiveDate, goal_met: bool, now: &str) {
        if goal_met {
            match self.last_goal_met_date {
                None => {
                    self.current_streak = 1;
                    self.last_goal_met_date = Some(date);
                }
                Some(last) => {
                    let gap_days = (date - last).num_days();
                    match gap_days {
                        0 => {} // same-day rewrite
                        1 => {
                            self.current_streak += 1;
                            self.last_goal_met_date = Some(date);
                        }
                        _ => {
                            self.current_streak = 1;
                            self.last_goal_met_date = Some(date);
                        }
                    }
                }
            }
        } else {
            self.current_streak = 0;
        }

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.updated_at = now.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_goal_met_starts_streak() {
        let mut streak = StreakRecord::zero(1, "now");
        streak.apply(d("2024-01-01"), true, "now");

        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
        assert_eq!(streak.last_goal_met_date, Some(d("2024-01-01")));
    }

    #[test]
    fn test_consecutive_days_extend_then_miss_resets() {
        let mut streak = StreakRecord::zero(1, "now");

        streak.apply(d("2024-01-01"), true, "now");
        assert_eq!(streak.current_streak, 1);

        streak.apply(d("2024-01-02"), true, "now");
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 2);

        streak.apply(d("2024-01-03"), false, "now");
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.longest_streak, 2);
        // A miss does not move the anchor
        assert_eq!(streak.last_goal_met_date, Some(d("2024-01-02")));

        // Day 5: gap from the stored anchor (day 2) is 3, so restart at 1
        streak.apply(d("2024-01-05"), true, "now");
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_goal_met_date, Some(d("2024-01-05")));
    }

    #[test]
    fn test_same_day_rewrite_is_a_no_op() {
        let mut streak = StreakRecord::zero(1, "now");
        streak.apply(d("2024-01-01"), true, "now");
        streak.apply(d("2024-01-02"), true, "now");

        streak.apply(d("2024-01-02"), true, "later");
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.last_goal_met_date, Some(d("2024-01-02")));

        streak.apply(d("2024-01-02"), true, "even later");
        assert_eq!(streak.current_streak, 2);
    }

    #[test]
    fn test_past_date_edit_restarts_at_one() {
        let mut streak = StreakRecord::zero(1, "now");
        streak.apply(d("2024-01-03"), true, "now");
        streak.apply(d("2024-01-04"), true, "now");
        assert_eq!(streak.current_streak, 2);

        // Backfilling Jan 1st: gap is negative, streak restarts anchored there
        streak.apply(d("2024-01-01"), true, "now");
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_goal_met_date, Some(d("2024-01-01")));
    }

    #[test]
    fn test_miss_on_anchor_date_zeroes_regardless_of_neighbors() {
        // Documents the forward-only model: un-meeting the anchor date kills
        // the whole streak even though earlier days were goal-met.
        let mut streak = StreakRecord::zero(1, "now");
        streak.apply(d("2024-01-01"), true, "now");
        streak.apply(d("2024-01-02"), true, "now");
        streak.apply(d("2024-01-03"), true, "now");
        assert_eq!(streak.current_streak, 3);

        streak.apply(d("2024-01-03"), false, "now");
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.longest_streak, 3);
    }

    #[test]
    fn test_longest_streak_never_below_current() {
        let mut streak = StreakRecord::zero(1, "now");
        for day in 1..=9 {
            streak.apply(d(&format!("2024-01-0{}", day)), true, "now");
            assert!(streak.longest_streak >= streak.current_streak);
        }
        assert_eq!(streak.current_streak, 9);
        assert_eq!(streak.longest_streak, 9);
    }
}
