//! Records exchanged with the workout backend and the exercise lookup API.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder shown wherever a value is missing.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Backend generated identifier. Stores may hand out numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A blank form id or an explicit `null` both mean "not saved yet".
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<EntryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<EntryId>::deserialize(deserializer)?;
    Ok(match id {
        Some(EntryId::Text(s)) if s.trim().is_empty() => None,
        other => other,
    })
}

/// Whole numbers go out as integers, so `5` stays `5` on the wire.
pub(crate) fn serialize_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => serializer.serialize_some(&(*n as i64)),
        Some(n) => serializer.serialize_some(n),
        None => serializer.serialize_none(),
    }
}

/// `null` reads as an empty string.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` reads as unset.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<EntryId>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub workout_name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub workout_type: String,
    #[serde(default, serialize_with = "serialize_number")]
    pub minute_duration: Option<f64>,
    #[serde(default, serialize_with = "serialize_number")]
    pub sets: Option<f64>,
    #[serde(default, serialize_with = "serialize_number")]
    pub reps: Option<f64>,
    #[serde(default)]
    pub mood_before: Option<i32>,
    #[serde(default)]
    pub mood_after: Option<i32>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub personal_record: bool,
    /// Fields this client does not know about, kept so they survive an edit.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkoutEntry {
    /// Difference between the mood after and before the workout.
    pub fn mood_delta(&self) -> Option<i32> {
        match (self.mood_before, self.mood_after) {
            (Some(before), Some(after)) => Some(after - before),
            _ => None,
        }
    }

    /// Parsed timestamp of the workout, if the stored date is usable.
    ///
    /// Accepts full RFC 3339 timestamps as well as bare `YYYY-MM-DD` dates.
    pub fn timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&chrono::Utc));
        }
        chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Sort newest first. Entries without a usable date go last, keeping their
/// relative order.
pub fn sort_newest_first(entries: &mut [WorkoutEntry]) {
    entries.sort_by_key(|e| std::cmp::Reverse(e.timestamp()));
}

/// Format a number the way a form field shows it: `30`, not `30.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Step-by-step instructions as returned by the exercise API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instructions {
    Steps(Vec<String>),
    Text(String),
}

impl Instructions {
    /// Split into numbered steps. A sentence string is broken on `.` and each
    /// step keeps its trailing period; an array is used as given.
    pub fn steps(&self) -> Vec<String> {
        match self {
            Instructions::Text(text) => text
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| format!("{s}."))
                .collect(),
            Instructions::Steps(steps) => steps.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseResult {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub muscle: Option<String>,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<Instructions>,
}

impl ExerciseResult {
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or("Unknown exercise")
    }

    /// `type · muscle` tag shown next to a search result.
    pub fn tag_line(&self) -> String {
        [self.kind.as_deref(), self.muscle.as_deref()]
            .into_iter()
            .filter_map(non_empty)
            .collect::<Vec<_>>()
            .join(" \u{b7} ")
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_backend_entry() {
        let entry: WorkoutEntry = serde_json::from_value(json!({
            "id": 7,
            "workoutName": "Leg day",
            "workoutType": "Strength",
            "minuteDuration": 45,
            "sets": 4,
            "reps": 10,
            "moodBefore": 3,
            "moodAfter": 8,
            "date": "2024-03-05T00:00:00.000Z",
            "notes": null,
            "personalRecord": true,
            "location": "gym"
        }))
        .unwrap();

        assert_eq!(entry.id, Some(EntryId::Number(7)));
        assert_eq!(entry.minute_duration, Some(45.0));
        assert_eq!(entry.mood_delta(), Some(5));
        assert!(entry.personal_record);
        assert_eq!(entry.notes, None);
        assert_eq!(entry.extra.get("location"), Some(&json!("gym")));
    }

    #[test]
    fn tolerates_nulls_and_fractional_counts() {
        let entry: WorkoutEntry = serde_json::from_value(json!({
            "id": 2,
            "workoutName": null,
            "workoutType": null,
            "sets": 2.5,
            "reps": 10,
            "personalRecord": null
        }))
        .unwrap();
        assert_eq!(entry.workout_name, "");
        assert_eq!(entry.workout_type, "");
        assert_eq!(entry.sets, Some(2.5));
        assert!(!entry.personal_record);

        let body = serde_json::to_value(&entry).unwrap();
        assert_eq!(body["reps"], json!(10));
        assert_eq!(body["sets"], json!(2.5));
    }

    #[test]
    fn blank_id_means_unsaved() {
        let entry: WorkoutEntry =
            serde_json::from_value(json!({"id": "", "workoutName": "Run"})).unwrap();
        assert_eq!(entry.id, None);

        let body = serde_json::to_value(&entry).unwrap();
        assert!(body.get("id").is_none());
    }

    #[test]
    fn string_ids_are_kept() {
        let entry: WorkoutEntry =
            serde_json::from_value(json!({"id": "65f1c0ffee"})).unwrap();
        assert_eq!(entry.id, Some(EntryId::Text("65f1c0ffee".into())));
        assert_eq!(entry.id.unwrap().to_string(), "65f1c0ffee");
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let dated = |name: &str, date: Option<&str>| WorkoutEntry {
            workout_name: name.into(),
            date: date.map(String::from),
            ..Default::default()
        };
        let mut entries = vec![
            dated("old", Some("2024-01-01T00:00:00.000Z")),
            dated("none", None),
            dated("new", Some("2024-06-01")),
            dated("mid", Some("2024-03-01T10:00:00Z")),
        ];
        sort_newest_first(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.workout_name.as_str()).collect();
        assert_eq!(names, ["new", "mid", "old", "none"]);
    }

    #[test]
    fn formats_whole_numbers_without_fraction() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-4.0), "-4");
    }

    #[test]
    fn instructions_split_on_sentences() {
        let text = Instructions::Text("Stand tall. Lower the bar.  Press up. ".into());
        assert_eq!(
            text.steps(),
            vec!["Stand tall.", "Lower the bar.", "Press up."]
        );

        let steps = Instructions::Steps(vec!["One".into(), "Two".into()]);
        assert_eq!(steps.steps(), vec!["One", "Two"]);
    }

    #[test]
    fn exercise_result_reads_api_shape() {
        let result: ExerciseResult = serde_json::from_value(json!({
            "name": "Incline Hammer Curls",
            "type": "strength",
            "muscle": "biceps",
            "difficulty": "beginner",
            "instructions": "Seat yourself. Curl."
        }))
        .unwrap();
        assert_eq!(result.display_name(), "Incline Hammer Curls");
        assert_eq!(result.tag_line(), "strength \u{b7} biceps");
        assert_eq!(
            result.instructions.unwrap().steps(),
            vec!["Seat yourself.", "Curl."]
        );
    }
}
