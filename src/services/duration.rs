// SPDX-License-Identifier: MIT

//! Duration resolution for session inputs.

use chrono::NaiveTime;

/// Resolve a session's raw fields into a minute count.
///
/// An explicit positive minute count wins outright; start/end times are
/// ignored even when they disagree with it. Otherwise, when both times are
/// present, the time-of-day difference is rounded to whole minutes. Only the
/// time-of-day difference matters, so an end time numerically earlier than
/// the start yields a zero or negative result that callers must reject, not
/// clamp. `None` means "no data".
pub fn resolve_minutes(
    explicit_minutes: Option<i64>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Option<i64> {
    match explicit_minutes {
        Some(minutes) if minutes > 0 => Some(minutes),
        _ => match (start_time, end_time) {
            (Some(start), Some(end)) => {
                let seconds = (end - start).num_seconds();
                Some((seconds as f64 / 60.0).round() as i64)
            }
            _ => None,
        },
    }
}
