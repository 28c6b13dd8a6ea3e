use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::models::InteractionRecord;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyStreak {
    /// Consecutive active days ending at `today`; 0 when today has no
    /// activity.
    pub current_streak: u32,
    /// Longest run of consecutive active days anywhere in the history.
    pub max_streak: u32,
    pub total_days_active: u32,
}

/// Collapse interaction timestamps to distinct local calendar days and
/// measure the consecutive-day runs among them. `today` is a parameter so
/// the computation is deterministic under test; [`crate::ProgressTracker`]
/// passes the current local date.
pub fn study_streak(interactions: &[InteractionRecord], today: NaiveDate) -> StudyStreak {
    let dates: BTreeSet<NaiveDate> = interactions
        .iter()
        .map(|record| record.timestamp.with_timezone(&Local).date_naive())
        .collect();
    streak_over_dates(&dates, today)
}

fn streak_over_dates(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> StudyStreak {
    // Newest first; a run extends only while each date is exactly one day
    // older than its predecessor.
    let sorted: Vec<NaiveDate> = dates.iter().rev().copied().collect();

    let mut current_streak = 0;
    let mut max_streak = 0;
    let mut i = 0;
    while i < sorted.len() {
        let head = sorted[i];
        let mut length = 1u32;
        while i + 1 < sorted.len() && (sorted[i] - sorted[i + 1]).num_days() == 1 {
            i += 1;
            length += 1;
        }

        if head == today {
            current_streak = length;
        }
        max_streak = max_streak.max(length);
        i += 1;
    }

    StudyStreak {
        current_streak,
        max_streak,
        total_days_active: dates.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset_from_today: i64) -> NaiveDate {
        today() - chrono::Duration::days(offset_from_today)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn streak(offsets: &[i64]) -> StudyStreak {
        let dates: BTreeSet<NaiveDate> = offsets.iter().map(|o| day(*o)).collect();
        streak_over_dates(&dates, today())
    }

    #[test]
    fn today_and_yesterday_is_a_two_day_streak() {
        let result = streak(&[0, 1]);
        assert_eq!(result.current_streak, 2);
        assert_eq!(result.max_streak, 2);
        assert_eq!(result.total_days_active, 2);
    }

    #[test]
    fn a_gap_resets_the_run() {
        // Activity today and 3 days ago with nothing between.
        let result = streak(&[0, 3]);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.max_streak, 1);
        assert_eq!(result.total_days_active, 2);
    }

    #[test]
    fn no_activity_today_means_no_current_streak() {
        let result = streak(&[1, 2, 3]);
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.max_streak, 3);
    }

    #[test]
    fn max_streak_can_live_in_the_past() {
        let result = streak(&[0, 5, 6, 7, 8]);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.max_streak, 4);
        assert_eq!(result.total_days_active, 5);
    }

    #[test]
    fn empty_history_is_all_zeros() {
        let result = streak(&[]);
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.max_streak, 0);
        assert_eq!(result.total_days_active, 0);
    }

    #[test]
    fn timestamps_collapse_to_local_days() {
        use crate::models::{payload, InteractionKind};
        use chrono::{TimeZone, Utc};
        use serde_json::json;

        // Two interactions on the same local day, one the day before.
        let noon = Local.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).single().unwrap();
        let interactions: Vec<InteractionRecord> = [
            noon,
            noon + chrono::Duration::hours(3),
            noon - chrono::Duration::days(1),
        ]
        .into_iter()
        .map(|at| InteractionRecord {
            kind: InteractionKind::ModuleStart,
            data: payload(json!({})),
            timestamp: at.with_timezone(&Utc),
        })
        .collect();

        let result = study_streak(&interactions, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(result.total_days_active, 2);
        assert_eq!(result.current_streak, 2);
    }
}
