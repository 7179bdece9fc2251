// Module for summarizing workout data
use crate::model::{PLACEHOLDER, WorkoutEntry};
use serde::{Deserialize, Serialize};

/// Summary statistics about the visible workouts.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    /// Mean duration with missing durations counted as zero.
    pub avg_duration: Option<f64>,
    /// Mean mood change over entries where both moods were recorded.
    pub avg_mood_delta: Option<f64>,
}

impl Summary {
    pub fn count_text(&self) -> String {
        if self.count == 0 {
            PLACEHOLDER.to_string()
        } else {
            self.count.to_string()
        }
    }

    pub fn duration_text(&self) -> String {
        match self.avg_duration {
            Some(avg) => format!("{} min", avg.round()),
            None => PLACEHOLDER.to_string(),
        }
    }

    pub fn mood_text(&self) -> String {
        match self.avg_mood_delta {
            Some(avg) => {
                let sign = if avg > 0.0 { "+" } else { "" };
                format!("{sign}{avg:.1}")
            }
            None => PLACEHOLDER.to_string(),
        }
    }
}

/// Compute summary statistics for a list of workouts.
///
/// An empty list yields an empty [`Summary`], which renders as placeholders
/// for every metric.
pub fn compute_summary<'a, I>(entries: I) -> Summary
where
    I: IntoIterator<Item = &'a WorkoutEntry>,
{
    let mut count = 0usize;
    let mut total_duration = 0.0;
    let mut total_delta = 0i64;
    let mut deltas = 0usize;

    for e in entries {
        count += 1;
        total_duration += e.minute_duration.unwrap_or(0.0);
        if let Some(d) = e.mood_delta() {
            total_delta += i64::from(d);
            deltas += 1;
        }
    }

    if count == 0 {
        return Summary::default();
    }

    Summary {
        count,
        avg_duration: Some(total_duration / count as f64),
        avg_mood_delta: (deltas > 0).then(|| total_delta as f64 / deltas as f64),
    }
}

/// Format a user facing message after successfully loading the workout list.
pub fn format_load_message(entries: usize, source: &str) -> String {
    format!("Loaded {} workouts from {}", entries, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(duration: Option<f64>, before: Option<i32>, after: Option<i32>) -> WorkoutEntry {
        WorkoutEntry {
            minute_duration: duration,
            mood_before: before,
            mood_after: after,
            ..Default::default()
        }
    }

    #[test]
    fn empty_list_shows_placeholders() {
        let none: Vec<WorkoutEntry> = Vec::new();
        let summary = compute_summary(&none);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.count_text(), PLACEHOLDER);
        assert_eq!(summary.duration_text(), PLACEHOLDER);
        assert_eq!(summary.mood_text(), PLACEHOLDER);
    }

    #[test]
    fn two_entry_scenario() {
        let entries = vec![
            entry(Some(30.0), Some(4), Some(7)),
            entry(Some(20.0), Some(6), Some(6)),
        ];
        let summary = compute_summary(&entries);
        assert_eq!(summary.count_text(), "2");
        assert_eq!(summary.duration_text(), "25 min");
        assert_eq!(summary.mood_text(), "+1.5");
    }

    #[test]
    fn missing_duration_counts_as_zero() {
        let entries = vec![entry(Some(45.0), None, None), entry(None, None, None)];
        let summary = compute_summary(&entries);
        assert_eq!(summary.duration_text(), "23 min");
        assert_eq!(summary.mood_text(), PLACEHOLDER);
    }

    #[test]
    fn mood_average_skips_incomplete_entries() {
        let entries = vec![
            entry(None, Some(8), Some(5)),
            entry(None, Some(4), None),
            entry(None, Some(6), Some(6)),
        ];
        let summary = compute_summary(&entries);
        assert_eq!(summary.avg_mood_delta, Some(-1.5));
        assert_eq!(summary.mood_text(), "-1.5");
    }

    #[test]
    fn zero_average_has_no_sign() {
        let entries = vec![entry(Some(10.0), Some(5), Some(5))];
        assert_eq!(compute_summary(&entries).mood_text(), "0.0");
    }

    #[test]
    fn load_message_mentions_count() {
        assert_eq!(
            format_load_message(3, "http://localhost:3000"),
            "Loaded 3 workouts from http://localhost:3000"
        );
    }
}
