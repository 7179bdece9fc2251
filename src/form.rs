//! Conversion between the log-entry form and [`WorkoutEntry`] records.
use crate::model::{WorkoutEntry, format_number};
use serde_json::{Map, Number, Value};
use std::fmt;

/// How a field is edited, which also decides how its value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Select,
    Hidden,
    Number,
    /// Whole, non-negative number such as a set count.
    Count,
    /// Slider with inclusive bounds.
    Range { min: i32, max: i32 },
    Date,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
    default: String,
}

impl FormField {
    pub fn new(name: &str, label: &str, kind: InputKind) -> Self {
        let default = match kind {
            InputKind::Range { min, max } => (min + (max - min) / 2).to_string(),
            _ => String::new(),
        };
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: default.clone(),
            checked: false,
            default,
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.checked = false;
    }

    /// Position of a range slider. A blank or unparsable value sits at the
    /// field's default, clamped to the bounds.
    pub fn slider_value(&self) -> i32 {
        let InputKind::Range { min, max } = self.kind else {
            return 0;
        };
        self.value
            .trim()
            .parse::<i32>()
            .or_else(|_| self.default.parse())
            .unwrap_or(min)
            .clamp(min, max)
    }
}

/// Heading state of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

impl FormMode {
    pub fn heading(self) -> &'static str {
        match self {
            FormMode::Create => "Log a Workout",
            FormMode::Edit => "Edit Workout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Form {
    pub fields: Vec<FormField>,
}

impl Form {
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Set a plain value, ignoring unknown names.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(name) {
            field.value = value.into();
        }
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
    }
}

/// Workout types offered by the type selector.
pub const WORKOUT_TYPES: [&str; 6] = ["Strength", "Cardio", "HIIT", "Flexibility", "Sports", "Other"];

/// The log-entry form.
pub fn workout_form() -> Form {
    let mood = InputKind::Range { min: 1, max: 10 };
    Form {
        fields: vec![
            FormField::new("id", "", InputKind::Hidden),
            FormField::new("workoutName", "Workout name", InputKind::Text),
            FormField::new("workoutType", "Type", InputKind::Select),
            FormField::new("minuteDuration", "Duration (min)", InputKind::Number),
            FormField::new("sets", "Sets", InputKind::Count),
            FormField::new("reps", "Reps", InputKind::Count),
            FormField::new("moodBefore", "Mood before", mood),
            FormField::new("moodAfter", "Mood after", mood),
            FormField::new("date", "Date", InputKind::Date),
            FormField::new("notes", "Notes", InputKind::TextArea),
            FormField::new("personalRecord", "Personal record", InputKind::Checkbox),
        ],
    }
}

#[derive(Debug)]
pub enum FormError {
    InvalidNumber { field: String, value: String },
    InvalidCount { field: String, value: String },
    InvalidDate { field: String, value: String },
    /// The coerced values did not fit the record, e.g. a fractional mood.
    Record(serde_json::Error),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::InvalidNumber { field, value } => {
                write!(f, "{field}: \"{value}\" is not a number")
            }
            FormError::InvalidCount { field, value } => {
                write!(f, "{field}: \"{value}\" is not a whole number")
            }
            FormError::InvalidDate { field, value } => {
                write!(f, "{field}: \"{value}\" is not a date (YYYY-MM-DD)")
            }
            FormError::Record(e) => write!(f, "Invalid workout: {e}"),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormError::Record(e) => Some(e),
            _ => None,
        }
    }
}

fn encode_number(field: &FormField) -> Result<Value, FormError> {
    let raw = field.value.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let invalid = || FormError::InvalidNumber {
        field: field.name.clone(),
        value: field.value.clone(),
    };
    let n: f64 = raw.parse().map_err(|_| invalid())?;
    if !n.is_finite() {
        return Err(invalid());
    }
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Ok(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number).ok_or_else(invalid)
    }
}

fn encode_count(field: &FormField) -> Result<Value, FormError> {
    let value = encode_number(field)?;
    match &value {
        Value::Null => Ok(value),
        Value::Number(n) if n.as_u64().is_some() => Ok(value),
        _ => Err(FormError::InvalidCount {
            field: field.name.clone(),
            value: field.value.clone(),
        }),
    }
}

fn encode_date(field: &FormField) -> Result<Value, FormError> {
    let raw = field.value.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        FormError::InvalidDate {
            field: field.name.clone(),
            value: field.value.clone(),
        }
    })?;
    Ok(Value::String(format!(
        "{}T00:00:00.000Z",
        date.format("%Y-%m-%d")
    )))
}

/// Read every field into a record, coercing by input kind.
pub fn encode(form: &Form) -> Result<WorkoutEntry, FormError> {
    let mut json = Map::new();
    for field in &form.fields {
        let value = match field.kind {
            InputKind::Checkbox => Value::Bool(field.checked),
            InputKind::Number | InputKind::Range { .. } => encode_number(field)?,
            InputKind::Count => encode_count(field)?,
            InputKind::Date => encode_date(field)?,
            InputKind::Text | InputKind::TextArea | InputKind::Select | InputKind::Hidden => {
                Value::String(field.value.clone())
            }
        };
        json.insert(field.name.clone(), value);
    }
    serde_json::from_value(Value::Object(json)).map_err(FormError::Record)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn plain_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_number).unwrap_or_default(),
        },
        other => other.to_string(),
    }
}

/// Populate the form from a record. Keys without a matching field are
/// ignored; fields the record does not mention keep their current value.
pub fn decode(entry: &WorkoutEntry, form: &mut Form) {
    let Ok(Value::Object(json)) = serde_json::to_value(entry) else {
        log::warn!("Could not convert workout entry for editing");
        return;
    };
    for (key, value) in &json {
        let Some(field) = form.field_mut(key) else {
            continue;
        };
        match field.kind {
            InputKind::Checkbox => field.checked = truthy(value),
            InputKind::Date => {
                field.value = value
                    .as_str()
                    .map(|s| s.chars().take(10).collect())
                    .unwrap_or_default();
            }
            _ => field.value = plain_string(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryId;
    use serde_json::json;

    fn filled_form() -> Form {
        let mut form = workout_form();
        form.set_value("workoutName", "Morning run");
        form.set_value("workoutType", "Cardio");
        form.set_value("minuteDuration", "32.5");
        form.set_value("sets", "");
        form.set_value("reps", "12");
        form.set_value("moodBefore", "4");
        form.set_value("moodAfter", "7");
        form.set_value("date", "2024-03-05");
        form.set_value("notes", "Windy");
        form.field_mut("personalRecord").unwrap().checked = true;
        form
    }

    #[test]
    fn encode_coerces_by_kind() {
        let entry = encode(&filled_form()).unwrap();
        assert_eq!(entry.id, None);
        assert_eq!(entry.workout_name, "Morning run");
        assert_eq!(entry.minute_duration, Some(32.5));
        assert_eq!(entry.sets, None);
        assert_eq!(entry.reps, Some(12.0));
        assert_eq!(entry.mood_before, Some(4));
        assert_eq!(entry.date.as_deref(), Some("2024-03-05T00:00:00.000Z"));
        assert!(entry.personal_record);
    }

    #[test]
    fn blank_optional_fields_encode_as_null() {
        let mut form = workout_form();
        form.set_value("workoutName", "Stretch");
        form.set_value("moodBefore", " ");
        let entry = encode(&form).unwrap();
        let body = serde_json::to_value(&entry).unwrap();
        assert_eq!(body["minuteDuration"], Value::Null);
        assert_eq!(body["moodBefore"], Value::Null);
        assert_eq!(body["date"], Value::Null);
        assert_eq!(body["personalRecord"], json!(false));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut form = workout_form();
        form.fields
            .push(FormField::new("location", "Location", InputKind::Text));
        form.set_value("location", "Park");
        let entry = encode(&form).unwrap();
        assert_eq!(entry.extra.get("location"), Some(&json!("Park")));
    }

    #[test]
    fn invalid_number_is_reported() {
        let mut form = workout_form();
        form.set_value("minuteDuration", "half an hour");
        match encode(&form) {
            Err(FormError::InvalidNumber { field, .. }) => assert_eq!(field, "minuteDuration"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_date_is_reported() {
        let mut form = workout_form();
        form.set_value("date", "05/03/2024");
        assert!(matches!(encode(&form), Err(FormError::InvalidDate { .. })));
    }

    #[test]
    fn fractional_sets_are_rejected() {
        let mut form = workout_form();
        form.set_value("sets", "2.5");
        assert!(matches!(encode(&form), Err(FormError::InvalidCount { .. })));
        form.set_value("sets", "-3");
        assert!(matches!(encode(&form), Err(FormError::InvalidCount { .. })));
        form.set_value("sets", "3");
        assert_eq!(encode(&form).unwrap().sets, Some(3.0));
    }

    #[test]
    fn missing_mood_keeps_slider_at_midpoint() {
        let mut form = workout_form();
        let entry = WorkoutEntry {
            workout_name: "Walk".into(),
            mood_after: Some(9),
            ..Default::default()
        };
        decode(&entry, &mut form);

        let before = form.field("moodBefore").unwrap();
        assert_eq!(before.value, "");
        assert_eq!(before.slider_value(), 5);
        assert_eq!(form.field("moodAfter").unwrap().slider_value(), 9);

        form.set_value("moodAfter", "42");
        assert_eq!(form.field("moodAfter").unwrap().slider_value(), 10);
    }

    #[test]
    fn round_trip_reproduces_fields() {
        let original = filled_form();
        let entry = encode(&original).unwrap();
        let mut fresh = workout_form();
        decode(&entry, &mut fresh);
        for field in &original.fields {
            let copy = fresh.field(&field.name).unwrap();
            assert_eq!(copy.value, field.value, "value of {}", field.name);
            assert_eq!(copy.checked, field.checked, "checked of {}", field.name);
        }
    }

    #[test]
    fn decode_sets_id_and_truncates_dates() {
        let entry: WorkoutEntry = serde_json::from_value(json!({
            "id": 12,
            "workoutName": "Swim",
            "date": "2023-11-30T18:45:00.000Z",
            "minuteDuration": 40,
            "personalRecord": false,
            "notes": null,
            "unknownKey": "ignored"
        }))
        .unwrap();
        assert_eq!(entry.id, Some(EntryId::Number(12)));

        let mut form = workout_form();
        form.set_value("notes", "stale");
        decode(&entry, &mut form);
        assert_eq!(form.field("id").unwrap().value, "12");
        assert_eq!(form.field("date").unwrap().value, "2023-11-30");
        assert_eq!(form.field("minuteDuration").unwrap().value, "40");
        assert_eq!(form.field("notes").unwrap().value, "");
        assert!(form.field("unknownKey").is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = filled_form();
        form.reset();
        assert_eq!(form.field("workoutName").unwrap().value, "");
        assert_eq!(form.field("moodBefore").unwrap().value, "5");
        assert!(!form.field("personalRecord").unwrap().checked);
    }

    #[test]
    fn headings_follow_mode() {
        assert_eq!(FormMode::Create.heading(), "Log a Workout");
        assert_eq!(FormMode::Edit.heading(), "Edit Workout");
    }
}
