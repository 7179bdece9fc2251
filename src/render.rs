use crate::analysis::Summary;
use crate::filter::MoodDelta;
use crate::model::{EntryId, ExerciseResult, PLACEHOLDER, WorkoutEntry, format_number, non_empty};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, html};

/// Day, month and year shown on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePill {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DatePill {
    pub fn from_entry(entry: &WorkoutEntry) -> Option<Self> {
        let date = entry.timestamp()?.date_naive();
        Some(Self {
            day: format!("{:02}", date.day()),
            month: date.format("%b").to_string(),
            year: format!("{:04}", date.year()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipTone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodChip {
    pub text: String,
    pub tone: ChipTone,
}

impl MoodChip {
    pub fn from_entry(entry: &WorkoutEntry) -> Option<Self> {
        let delta = entry.mood_delta()?;
        Some(match MoodDelta::of(entry)? {
            MoodDelta::Improved => MoodChip {
                text: format!("Mood improved by +{delta}"),
                tone: ChipTone::Positive,
            },
            MoodDelta::Decreased => MoodChip {
                text: format!("Mood decreased by {delta}"),
                tone: ChipTone::Negative,
            },
            MoodDelta::Unchanged => MoodChip {
                text: "Mood stayed the same".to_string(),
                tone: ChipTone::Neutral,
            },
        })
    }
}

/// Everything a workout card displays, derived from one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: Option<EntryId>,
    pub title: String,
    pub kind: String,
    pub duration: String,
    pub sets_reps: String,
    pub mood: String,
    pub mood_chip: Option<MoodChip>,
    pub date: Option<DatePill>,
    pub notes: Option<String>,
    pub personal_record: bool,
}

/// `sets × reps`, or whichever half was recorded. Zero counts as missing.
fn sets_reps_text(sets: Option<f64>, reps: Option<f64>) -> String {
    let sets = sets.filter(|&s| s > 0.0).map(format_number);
    let reps = reps.filter(|&r| r > 0.0).map(format_number);
    match (sets, reps) {
        (Some(s), Some(r)) => format!("{s} \u{d7} {r}"),
        (None, None) => PLACEHOLDER.to_string(),
        (s, r) => [s.map(|s| format!("{s} sets")), r.map(|r| format!("{r} reps"))]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn mood_value(mood: Option<i32>) -> String {
    mood.map(|m| m.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

impl CardView {
    pub fn from_entry(entry: &WorkoutEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: non_empty(Some(entry.workout_name.as_str()))
                .unwrap_or("Untitled workout")
                .to_string(),
            kind: non_empty(Some(entry.workout_type.as_str()))
                .unwrap_or("Uncategorized")
                .to_string(),
            duration: entry
                .minute_duration
                .map(|d| format!("{} min", format_number(d)))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            sets_reps: sets_reps_text(entry.sets, entry.reps),
            mood: format!(
                "{} \u{2192} {}",
                mood_value(entry.mood_before),
                mood_value(entry.mood_after)
            ),
            mood_chip: MoodChip::from_entry(entry),
            date: DatePill::from_entry(entry),
            notes: entry.notes.clone().filter(|n| !n.is_empty()),
            personal_record: entry.personal_record,
        }
    }

    pub fn subline(&self) -> String {
        let mut line = format!("Duration \u{b7} {}", self.duration);
        if self.sets_reps != PLACEHOLDER {
            line.push_str(&format!(" \u{b7} Sets \u{d7} Reps \u{b7} {}", self.sets_reps));
        }
        line
    }

    /// Only saved entries can be deleted.
    pub fn can_delete(&self) -> bool {
        self.id.is_some()
    }
}

fn tone_class(tone: ChipTone) -> &'static str {
    match tone {
        ChipTone::Positive => "chip mood-delta positive",
        ChipTone::Negative => "chip mood-delta negative",
        ChipTone::Neutral => "chip mood-delta neutral",
    }
}

fn hidden(visible: bool) -> Option<&'static str> {
    (!visible).then_some("display:none;")
}

fn actions(card: &CardView, visible: bool) -> Markup {
    html! {
        div class="item-actions" style=[hidden(visible)] {
            button class="edit-btn" { "Edit" }
            @if card.can_delete() {
                button class="delete-btn" { "Delete" }
            }
        }
    }
}

/// HTML fragment for one workout card. All text is escaped by maud.
pub fn render_card(card: &CardView) -> Markup {
    let has_notes = card.notes.is_some();
    html! {
        div class="item-card" data-id=[card.id.as_ref().map(|id| id.to_string())] {
            div class="item-main" {
                div class="item-header" {
                    h3 { (card.title) }
                    span class="workout-type-pill" { (card.kind) }
                    @if card.personal_record {
                        span class="pr-pill" { "PR" }
                    }
                }
                p class="item-subline" { (card.subline()) }
                div class="item-stats-row" {
                    div class="chip" {
                        span class="chip-label" { "Mood" }
                        span class="chip-value" { (card.mood) }
                    }
                    div class="chip" {
                        span class="chip-label" { "Intensity" }
                        span class="chip-value" { (card.sets_reps) }
                    }
                    @if let Some(chip) = &card.mood_chip {
                        div class=(tone_class(chip.tone)) {
                            span class="chip-value" { (chip.text) }
                        }
                    }
                }
            }
            div class="item-meta" {
                @if let Some(date) = &card.date {
                    div class="date-pill" {
                        span class="date-day" { (date.day) }
                        span class="date-month" { (date.month) }
                        span class="date-year" { (date.year) }
                    }
                }
            }
            div class="item-notes" style=[hidden(has_notes)] {
                h4 { "Notes" }
                p { (card.notes.as_deref().unwrap_or_default()) }
                (actions(card, true))
            }
            (actions(card, !has_notes))
        }
    }
}

pub const NO_WORKOUTS: &str = "No workouts recorded yet.";
pub const NO_MATCHES: &str = "No workouts match the current filters.";

/// The content area: every visible card, or the matching empty-state text.
pub fn render_content(cards: &[CardView], store_empty: bool) -> Markup {
    html! {
        @if cards.is_empty() {
            p { i { (if store_empty { NO_WORKOUTS } else { NO_MATCHES }) } }
        } @else {
            @for card in cards {
                (render_card(card))
            }
        }
    }
}

pub fn render_summary(summary: &Summary) -> Markup {
    html! {
        div class="summary" {
            div { span class="summary-label" { "Workouts" } span id="summaryCount" { (summary.count_text()) } }
            div { span class="summary-label" { "Avg duration" } span id="summaryDuration" { (summary.duration_text()) } }
            div { span class="summary-label" { "Avg mood change" } span id="summaryMood" { (summary.mood_text()) } }
        }
    }
}

/// Standalone page with the summary block, the cards and whatever the
/// exercise explorer is showing.
pub fn render_report(
    summary: &Summary,
    cards: &[CardView],
    store_empty: bool,
    results: &[ExerciseResult],
    exercise: Option<&ExerciseDetail>,
) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head { meta charset="utf-8"; title { "Workout Log" } }
            body {
                h1 { "Summary" }
                (render_summary(summary))
                h1 { "Workouts" }
                div id="contentArea" { (render_content(cards, store_empty)) }
                @if !results.is_empty() {
                    h1 { "Exercise search" }
                    (render_exercise_results(results))
                }
                @if let Some(detail) = exercise {
                    h1 { "Exercise" }
                    div id="exerciseDetails" { (render_exercise_details(detail)) }
                }
            }
        }
    }
}

/// Detail pane for one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDetail {
    pub name: String,
    pub kind: String,
    pub muscle: String,
    pub difficulty: String,
    pub steps: Vec<String>,
}

pub const NO_INSTRUCTIONS: &str = "No instructions available.";

impl ExerciseDetail {
    pub fn from_result(ex: &ExerciseResult) -> Self {
        let text = |v: Option<&String>| {
            non_empty(v.map(String::as_str))
                .unwrap_or(PLACEHOLDER)
                .to_string()
        };
        let steps = ex
            .instructions
            .as_ref()
            .map(|i| i.steps())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| vec![NO_INSTRUCTIONS.to_string()]);
        Self {
            name: ex.display_name().to_string(),
            kind: text(ex.kind.as_ref()),
            muscle: text(ex.muscle.as_ref()),
            difficulty: text(ex.difficulty.as_ref()),
            steps,
        }
    }
}

pub fn render_exercise_details(detail: &ExerciseDetail) -> Markup {
    html! {
        h4 { (detail.name) }
        p class="exercise-meta-line" { strong { "Type:" } " " (detail.kind) }
        p class="exercise-meta-line" { strong { "Primary Muscle:" } " " (detail.muscle) }
        p class="exercise-meta-line" { strong { "Difficulty:" } " " (detail.difficulty) }
        h5 { "Instructions" }
        ol {
            @for step in &detail.steps {
                li { (step) }
            }
        }
    }
}

pub fn render_exercise_results(results: &[ExerciseResult]) -> Markup {
    html! {
        ul id="exerciseResultsList" {
            @for ex in results {
                li {
                    span { (ex.display_name()) }
                    " "
                    span class="tag-pill" { (ex.tag_line()) }
                }
            }
        }
    }
}
