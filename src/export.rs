use crate::analysis::Summary;
use crate::model::{ExerciseResult, WorkoutEntry, serialize_number};
use crate::render::{CardView, ExerciseDetail, render_report};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value).map_err(std::io::Error::other)
}

#[derive(Serialize)]
struct Row<'a> {
    id: String,
    date: &'a str,
    workout_name: &'a str,
    workout_type: &'a str,
    #[serde(serialize_with = "serialize_number")]
    minute_duration: Option<f64>,
    #[serde(serialize_with = "serialize_number")]
    sets: Option<f64>,
    #[serde(serialize_with = "serialize_number")]
    reps: Option<f64>,
    mood_before: Option<i32>,
    mood_after: Option<i32>,
    personal_record: bool,
    notes: &'a str,
}

impl<'a> From<&'a WorkoutEntry> for Row<'a> {
    fn from(e: &'a WorkoutEntry) -> Self {
        Row {
            id: e.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            date: e.date.as_deref().unwrap_or_default(),
            workout_name: &e.workout_name,
            workout_type: &e.workout_type,
            minute_duration: e.minute_duration,
            sets: e.sets,
            reps: e.reps,
            mood_before: e.mood_before,
            mood_after: e.mood_after,
            personal_record: e.personal_record,
            notes: e.notes.as_deref().unwrap_or_default(),
        }
    }
}

/// One CSV row per entry with fixed columns. Extra fields are not exported.
pub fn write_entries_csv(writer: impl Write, entries: &[&WorkoutEntry]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for e in entries {
        wtr.serialize(Row::from(*e))?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_entries_csv<P: AsRef<Path>>(path: P, entries: &[&WorkoutEntry]) -> csv::Result<()> {
    write_entries_csv(std::fs::File::create(path)?, entries)
}

pub fn save_entries_json<P: AsRef<Path>>(path: P, entries: &[&WorkoutEntry]) -> std::io::Result<()> {
    write_json(entries, path)
}

pub fn save_html_report<P: AsRef<Path>>(
    path: P,
    summary: &Summary,
    cards: &[CardView],
    store_empty: bool,
    results: &[ExerciseResult],
    exercise: Option<&ExerciseDetail>,
) -> std::io::Result<()> {
    let markup = render_report(summary, cards, store_empty, results, exercise);
    std::fs::write(path, markup.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_summary;
    use crate::model::EntryId;

    fn entries() -> Vec<WorkoutEntry> {
        vec![
            WorkoutEntry {
                id: Some(EntryId::Number(1)),
                workout_name: "Run, easy".into(),
                workout_type: "Cardio".into(),
                minute_duration: Some(30.0),
                mood_before: Some(4),
                mood_after: Some(7),
                date: Some("2024-03-05T00:00:00.000Z".into()),
                ..Default::default()
            },
            WorkoutEntry {
                workout_name: "Squat".into(),
                sets: Some(5.0),
                reps: Some(5.0),
                notes: Some("<b>heavy</b>".into()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn csv_has_header_and_rows() {
        let data = entries();
        let refs: Vec<&WorkoutEntry> = data.iter().collect();
        let mut buf = Vec::new();
        write_entries_csv(&mut buf, &refs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,workout_name,workout_type,minute_duration,sets,reps,mood_before,mood_after,personal_record,notes"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,2024-03-05T00:00:00.000Z,\"Run, easy\",Cardio,30,,,4,7,false,"
        );
        assert_eq!(lines.next().unwrap(), ",,Squat,,,5,5,,,false,<b>heavy</b>");
    }

    #[test]
    fn json_export_writes_array() {
        let data = entries();
        let refs: Vec<&WorkoutEntry> = data.iter().collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        save_entries_json(&path, &refs).unwrap();
        let loaded: Vec<WorkoutEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn html_report_contains_summary_and_cards() {
        let data = entries();
        let cards: Vec<CardView> = data.iter().map(CardView::from_entry).collect();
        let summary = compute_summary(&data);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        save_html_report(&path, &summary, &cards, false, &[], None).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<span id="summaryDuration">15 min</span>"#));
        assert!(html.contains("Run, easy"));
        assert!(html.contains("&lt;b&gt;heavy&lt;/b&gt;"));
        assert!(!html.contains("Exercise search"));
    }

    #[test]
    fn html_report_includes_exercise_explorer() {
        use crate::model::Instructions;
        let result = ExerciseResult {
            name: Some("Plank".into()),
            muscle: Some("abdominals".into()),
            instructions: Some(Instructions::Text("Hold still.".into())),
            ..Default::default()
        };
        let detail = ExerciseDetail::from_result(&result);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        save_html_report(
            &path,
            &Summary::default(),
            &[],
            true,
            std::slice::from_ref(&result),
            Some(&detail),
        )
        .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("No workouts recorded yet."));
        assert!(html.contains("<li>Hold still.</li>"));
        assert!(html.contains("abdominals"));
    }
}
