//! Application state and the transitions user actions and request outcomes
//! drive through it. Nothing here touches the network or the UI toolkit:
//! side effects are returned as [`Request`]s for the worker to run.
use crate::analysis::{Summary, compute_summary, format_load_message};
use crate::exercise_search::{
    NO_RESULTS_MESSAGE, SEARCHING_MESSAGE, SearchError, display_results, found_message,
};
use crate::filter::{Filters, type_options};
use crate::form::{self, Form, FormMode};
use crate::model::{EntryId, ExerciseResult, WorkoutEntry, sort_newest_first};
use crate::persistence::{ClientError, Operation};
use crate::render::{CardView, ExerciseDetail};
use std::collections::VecDeque;

/// Work the UI asks to have done in the background.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    List,
    Save(WorkoutEntry),
    Delete(EntryId),
    Search(String),
}

/// Result of a finished [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<WorkoutEntry>, ClientError>),
    Saved(Result<WorkoutEntry, ClientError>),
    Deleted(Result<serde_json::Value, ClientError>),
    Searched(Result<Vec<ExerciseResult>, SearchError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Loading,
    Ready,
    /// The last list fetch failed; creation and the content area are hidden.
    Unavailable,
}

/// Mirror of the last successful list fetch.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    entries: Vec<WorkoutEntry>,
}

impl WorkoutStore {
    /// Replace the whole list, newest first.
    pub fn replace(&mut self, mut entries: Vec<WorkoutEntry>) {
        sort_newest_first(&mut entries);
        self.entries = entries;
    }

    pub fn entries(&self) -> &[WorkoutEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const DETAILS_PLACEHOLDER: &str = "Search for an exercise to see its details.";
pub const DETAILS_SELECT: &str = "Select an exercise to view details.";
pub const DETAILS_LOADING: &str = "Loading exercise details...";
pub const DETAILS_FAILED: &str = "Could not load exercises.";
pub const DELETE_CONFIRMATION: &str = "Confirm workout deletion?";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    Message(&'static str),
    Exercise(ExerciseDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub status: String,
    pub results: Vec<ExerciseResult>,
    pub detail: DetailPane,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: String::new(),
            results: Vec::new(),
            detail: DetailPane::Message(DETAILS_PLACEHOLDER),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub store: WorkoutStore,
    pub filters: Filters,
    pub form: Form,
    pub form_mode: FormMode,
    pub form_open: bool,
    pub backend: BackendStatus,
    pub search: SearchState,
    /// Entry waiting for the user to confirm its deletion.
    pub pending_delete: Option<EntryId>,
    /// Blocking notifications, oldest first.
    pub alerts: VecDeque<String>,
    pub toast: Option<String>,
    source: String,
}

impl AppState {
    /// `source` names the backend in status messages.
    pub fn new(source: &str) -> Self {
        Self {
            store: WorkoutStore::default(),
            filters: Filters::default(),
            form: form::workout_form(),
            form_mode: FormMode::Create,
            form_open: false,
            backend: BackendStatus::Loading,
            search: SearchState::default(),
            pending_delete: None,
            alerts: VecDeque::new(),
            toast: None,
            source: source.to_string(),
        }
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    pub fn visible(&self) -> Vec<&WorkoutEntry> {
        self.filters.apply(self.store.entries())
    }

    pub fn cards(&self) -> Vec<CardView> {
        self.visible().into_iter().map(CardView::from_entry).collect()
    }

    pub fn summary(&self) -> Summary {
        compute_summary(self.visible())
    }

    pub fn type_options(&self) -> Vec<String> {
        type_options(self.store.entries())
    }

    fn alert(&mut self, message: String) {
        self.alerts.push_back(message);
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn open_create(&mut self) {
        self.form.reset();
        self.form_mode = FormMode::Create;
        self.form_open = true;
    }

    pub fn edit(&mut self, entry: &WorkoutEntry) {
        log::debug!("Editing {:?}", entry.id);
        self.form.reset();
        form::decode(entry, &mut self.form);
        self.form_mode = FormMode::Edit;
        self.form_open = true;
    }

    pub fn cancel_form(&mut self) {
        self.form_open = false;
    }

    /// Encode the form and ask for it to be saved. The form is reset and
    /// closed once the request is handed off.
    pub fn submit(&mut self) -> Option<Request> {
        match form::encode(&self.form) {
            Ok(entry) => {
                self.form.reset();
                self.form_mode = FormMode::Create;
                self.form_open = false;
                Some(Request::Save(entry))
            }
            Err(e) => {
                log::warn!("Rejected form input: {e}");
                self.alert(e.to_string());
                None
            }
        }
    }

    pub fn request_delete(&mut self, id: EntryId) {
        self.pending_delete = Some(id);
    }

    /// Resolve the pending confirmation. Only a confirmed deletion produces
    /// a request.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<Request> {
        let id = self.pending_delete.take()?;
        confirmed.then_some(Request::Delete(id))
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Start an exercise search. A blank query only updates the status.
    pub fn search(&mut self) -> Option<Request> {
        let trimmed = self.search.query.trim();
        if trimmed.is_empty() {
            self.search.status = SearchError::EmptyQuery.status_text();
            return None;
        }
        let query = trimmed.to_string();
        self.search.status = SEARCHING_MESSAGE.to_string();
        self.search.results.clear();
        self.search.detail = DetailPane::Message(DETAILS_LOADING);
        Some(Request::Search(query))
    }

    /// Show a result's details and copy its name into the form.
    pub fn select_result(&mut self, index: usize) {
        let Some(ex) = self.search.results.get(index) else {
            return;
        };
        let name = ex.name.clone().unwrap_or_default();
        self.search.detail = DetailPane::Exercise(ExerciseDetail::from_result(ex));
        self.form.set_value("workoutName", name);
    }

    /// Fold a finished request into the state, returning follow-up work.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Request> {
        match outcome {
            Outcome::Listed(Ok(entries)) => {
                log::info!("Fetched {} workouts", entries.len());
                self.backend = BackendStatus::Ready;
                self.toast = Some(format_load_message(entries.len(), &self.source));
                self.store.replace(entries);
            }
            Outcome::Listed(Err(e)) => {
                log::error!("Error fetching data: {e}");
                self.backend = BackendStatus::Unavailable;
            }
            Outcome::Saved(Ok(saved)) => {
                log::info!("Saved workout {:?}", saved.id);
                return vec![Request::List];
            }
            Outcome::Saved(Err(e)) => {
                log::error!("Save error: {e}");
                self.alert(e.alert(Operation::Save));
            }
            Outcome::Deleted(Ok(body)) => {
                log::info!("Deleted: {body}");
                return vec![Request::List];
            }
            Outcome::Deleted(Err(e)) => {
                log::error!("Delete error: {e}");
                self.alert(e.alert(Operation::Delete));
            }
            Outcome::Searched(Ok(results)) => {
                if results.is_empty() {
                    self.search.status = NO_RESULTS_MESSAGE.to_string();
                    self.search.results.clear();
                } else {
                    self.search.results = display_results(results);
                    self.search.status = found_message(self.search.results.len());
                }
                self.search.detail = DetailPane::Message(DETAILS_SELECT);
            }
            Outcome::Searched(Err(e)) => {
                log::error!("Exercise search error: {e}");
                self.search.status = e.status_text();
                self.search.detail = DetailPane::Message(DETAILS_FAILED);
            }
        }
        Vec::new()
    }
}
