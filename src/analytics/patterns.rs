use std::collections::HashMap;

use chrono::{Datelike, Local, Timelike};
use serde::Serialize;

use crate::models::InteractionRecord;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningPatterns {
    /// Hour-of-day bucket (0-23, local time) with the most interactions.
    pub most_active_hour: u32,
    /// Day-of-week bucket (0 = Sunday .. 6 = Saturday) with the most
    /// interactions.
    pub most_active_day: u32,
    pub hour_histogram: [u64; 24],
    pub day_histogram: [u64; 7],
    pub module_access_frequency: HashMap<u32, u64>,
    pub total_interactions: usize,
}

/// Classify every interaction timestamp into fixed hour-of-day and
/// day-of-week histograms, and tally how often each module was touched.
/// Argmax ties resolve to the lowest bucket index.
pub fn learning_patterns(interactions: &[InteractionRecord]) -> LearningPatterns {
    let mut hour_histogram = [0u64; 24];
    let mut day_histogram = [0u64; 7];
    let mut module_access_frequency: HashMap<u32, u64> = HashMap::new();

    for record in interactions {
        let local = record.timestamp.with_timezone(&Local);
        hour_histogram[local.hour() as usize] += 1;
        day_histogram[local.weekday().num_days_from_sunday() as usize] += 1;

        if let Some(module_id) = record.module_id() {
            *module_access_frequency.entry(module_id).or_insert(0) += 1;
        }
    }

    LearningPatterns {
        most_active_hour: argmax(&hour_histogram),
        most_active_day: argmax(&day_histogram),
        hour_histogram,
        day_histogram,
        module_access_frequency,
        total_interactions: interactions.len(),
    }
}

fn argmax(buckets: &[u64]) -> u32 {
    let mut best_index = 0;
    let mut best_count = 0;
    for (index, count) in buckets.iter().enumerate() {
        if *count > best_count {
            best_count = *count;
            best_index = index;
        }
    }
    best_index as u32
}
