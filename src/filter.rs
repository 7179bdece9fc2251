use crate::form::WORKOUT_TYPES;
use crate::model::WorkoutEntry;
use std::collections::BTreeSet;

/// Sign of the mood change over a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodDelta {
    Improved,
    Unchanged,
    Decreased,
}

impl MoodDelta {
    /// `None` unless both moods were recorded.
    pub fn classify(before: Option<i32>, after: Option<i32>) -> Option<Self> {
        let delta = after? - before?;
        Some(match delta.signum() {
            1 => MoodDelta::Improved,
            -1 => MoodDelta::Decreased,
            _ => MoodDelta::Unchanged,
        })
    }

    pub fn of(entry: &WorkoutEntry) -> Option<Self> {
        Self::classify(entry.mood_before, entry.mood_after)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Exact(String),
}

impl TypeFilter {
    pub fn matches(&self, entry: &WorkoutEntry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Exact(kind) => entry.workout_type == *kind,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::All => "All types",
            TypeFilter::Exact(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodFilter {
    #[default]
    All,
    Improved,
    Unchanged,
    Decreased,
}

pub const ALL_MOOD_FILTERS: [MoodFilter; 4] = [
    MoodFilter::All,
    MoodFilter::Improved,
    MoodFilter::Unchanged,
    MoodFilter::Decreased,
];

impl MoodFilter {
    /// Entries missing either mood never match a specific category.
    pub fn matches(self, entry: &WorkoutEntry) -> bool {
        let wanted = match self {
            MoodFilter::All => return true,
            MoodFilter::Improved => MoodDelta::Improved,
            MoodFilter::Unchanged => MoodDelta::Unchanged,
            MoodFilter::Decreased => MoodDelta::Decreased,
        };
        MoodDelta::of(entry) == Some(wanted)
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodFilter::All => "Any mood change",
            MoodFilter::Improved => "Mood improved",
            MoodFilter::Unchanged => "Mood unchanged",
            MoodFilter::Decreased => "Mood decreased",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    pub kind: TypeFilter,
    pub mood: MoodFilter,
}

impl Filters {
    pub fn matches(&self, entry: &WorkoutEntry) -> bool {
        self.kind.matches(entry) && self.mood.matches(entry)
    }

    pub fn apply<'a>(&self, entries: &'a [WorkoutEntry]) -> Vec<&'a WorkoutEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }

    pub fn is_active(&self) -> bool {
        *self != Filters::default()
    }

    pub fn clear(&mut self) {
        *self = Filters::default();
    }
}

/// Choices for the type selector: the built-in types plus anything found
/// in the data.
pub fn type_options(entries: &[WorkoutEntry]) -> Vec<String> {
    let mut set: BTreeSet<String> = WORKOUT_TYPES.iter().map(|s| s.to_string()).collect();
    set.extend(
        entries
            .iter()
            .filter(|e| !e.workout_type.is_empty())
            .map(|e| e.workout_type.clone()),
    );
    set.into_iter().collect()
}
