//! Desktop client for a personal workout log stored on a REST backend.

use chrono::{Local, NaiveDate};
use eframe::{App, Frame, NativeOptions, egui};
use egui::{Color32, RichText};
use egui_extras::DatePickerButton;
use log::info;
use rfd::FileDialog;
use std::path::Path;
use std::time::{Duration, Instant};

mod analysis;
mod exercise_search;
mod export;
use export::{save_entries_csv, save_entries_json, save_html_report};
mod filter;
use filter::{ALL_MOOD_FILTERS, TypeFilter};
mod form;
use form::InputKind;
mod model;
use model::{EntryId, WorkoutEntry};
mod persistence;
mod render;
use render::{CardView, ChipTone, NO_MATCHES, NO_WORKOUTS};
mod settings;
use settings::Settings;
mod state;
use state::{AppState, BackendStatus, DELETE_CONFIRMATION, DetailPane, Request};
mod worker;
use worker::{Clients, Worker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

enum CardAction {
    Edit(WorkoutEntry),
    Delete(EntryId),
}

struct WorkoutLogApp {
    state: AppState,
    settings: Settings,
    settings_draft: Settings,
    show_settings: bool,
    worker: Worker,
    toast_start: Option<Instant>,
    toast_message: Option<String>,
}

impl WorkoutLogApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load();
        let mut worker = Worker::new(Clients::from_settings(&settings));
        worker.set_repaint(cc.egui_ctx.clone());
        let app = Self {
            state: AppState::new(&settings.backend_url),
            settings_draft: settings.clone(),
            settings,
            show_settings: false,
            worker,
            toast_start: None,
            toast_message: None,
        };
        app.worker.dispatch(Request::List);
        app
    }

    fn dispatch(&self, request: Option<Request>) {
        if let Some(request) = request {
            self.worker.dispatch(request);
        }
    }

    fn drain_outcomes(&mut self) {
        for outcome in self.worker.poll() {
            for follow_up in self.state.apply(outcome) {
                self.worker.dispatch(follow_up);
            }
        }
        if let Some(message) = self.state.toast.take() {
            self.toast_message = Some(message);
            self.toast_start = Some(Instant::now());
        }
    }

    fn modal_open(&self) -> bool {
        !self.state.alerts.is_empty() || self.state.pending_delete.is_some()
    }

    fn apply_settings(&mut self) {
        self.settings = self.settings_draft.clone();
        self.settings.save();
        self.worker.replace_clients(Clients::from_settings(&self.settings));
        self.state.set_source(&self.settings.backend_url);
        self.state.backend = BackendStatus::Loading;
        self.worker.dispatch(Request::List);
    }

    fn export(&mut self, format: ExportFormat) {
        let mut dialog = FileDialog::new()
            .add_filter(format.extension().to_uppercase(), &[format.extension()])
            .set_file_name(format!("workouts.{}", format.extension()));
        if let Some(dir) = &self.settings.last_export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };
        let (result, count) = {
            let visible = self.state.visible();
            let result = match format {
                ExportFormat::Json => save_entries_json(&path, &visible).map_err(|e| e.to_string()),
                ExportFormat::Csv => save_entries_csv(&path, &visible).map_err(|e| e.to_string()),
                ExportFormat::Html => {
                    let detail = match &self.state.search.detail {
                        DetailPane::Exercise(detail) => Some(detail),
                        DetailPane::Message(_) => None,
                    };
                    save_html_report(
                        &path,
                        &self.state.summary(),
                        &self.state.cards(),
                        self.state.store.is_empty(),
                        &self.state.search.results,
                        detail,
                    )
                    .map_err(|e| e.to_string())
                }
            };
            (result, visible.len())
        };
        match result {
            Ok(()) => {
                info!("Exported {} workouts to {}", count, path.display());
                self.remember_export_dir(&path);
                if format == ExportFormat::Html {
                    if let Err(e) = open::that(&path) {
                        log::warn!("Could not open report: {e}");
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to export workouts: {e}");
                self.state.alerts.push_back(format!("Export failed: {e}"));
            }
        }
    }

    fn remember_export_dir(&mut self, path: &Path) {
        if let Some(dir) = path.parent() {
            self.settings.last_export_dir = Some(dir.to_string_lossy().to_string());
            self.settings_draft.last_export_dir = self.settings.last_export_dir.clone();
            self.settings.save();
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Workout Log");
            ui.separator();
            match self.state.backend {
                BackendStatus::Loading => {
                    ui.label("Loading workouts...");
                }
                BackendStatus::Ready => {
                    ui.label(RichText::new("\u{25CF} Backend ready").color(Color32::GREEN));
                }
                BackendStatus::Unavailable => {
                    ui.label(
                        RichText::new("\u{25CF} Backend not ready")
                            .color(Color32::RED)
                            .strong(),
                    );
                }
            }
            ui.separator();
            if self.state.backend != BackendStatus::Unavailable
                && ui.button("+ Log workout").clicked()
            {
                self.state.open_create();
            }
            if ui.button("Refresh").clicked() {
                self.worker.dispatch(Request::List);
            }
            ui.menu_button("Export", |ui| {
                for (format, label) in [
                    (ExportFormat::Json, "Visible workouts as JSON"),
                    (ExportFormat::Csv, "Visible workouts as CSV"),
                    (ExportFormat::Html, "HTML report"),
                ] {
                    if ui.button(label).clicked() {
                        ui.close_menu();
                        self.export(format);
                    }
                }
            });
            if ui.button("Settings").clicked() {
                self.settings_draft = self.settings.clone();
                self.show_settings = true;
            }
        });
    }

    fn filters_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Filters");
        let types = self.state.type_options();
        let filters = &mut self.state.filters;
        egui::ComboBox::from_id_source("filter_type")
            .selected_text(filters.kind.label().to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filters.kind, TypeFilter::All, TypeFilter::All.label());
                for t in types {
                    ui.selectable_value(&mut filters.kind, TypeFilter::Exact(t.clone()), t);
                }
            });
        egui::ComboBox::from_id_source("filter_mood")
            .selected_text(filters.mood.label())
            .show_ui(ui, |ui| {
                for mood in ALL_MOOD_FILTERS {
                    ui.selectable_value(&mut filters.mood, mood, mood.label());
                }
            });
        if ui
            .add_enabled(filters.is_active(), egui::Button::new("Clear filters"))
            .clicked()
        {
            self.state.clear_filters();
        }
    }

    fn summary_panel(&self, ui: &mut egui::Ui) {
        let summary = self.state.summary();
        ui.heading("Summary");
        egui::Grid::new("summary_grid").num_columns(2).show(ui, |ui| {
            ui.label("Workouts");
            ui.strong(summary.count_text());
            ui.end_row();
            ui.label("Avg duration");
            ui.strong(summary.duration_text());
            ui.end_row();
            ui.label("Avg mood change");
            ui.strong(summary.mood_text());
            ui.end_row();
        });
    }

    fn search_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Exercise explorer");
        let mut submit = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.state.search.query)
                    .hint_text("e.g. bench press"),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            if ui.button("Search").clicked() {
                submit = true;
            }
        });
        if submit {
            let request = self.state.search();
            self.dispatch(request);
        }
        if !self.state.search.status.is_empty() {
            ui.small(&self.state.search.status);
        }

        let mut selected = None;
        for (i, ex) in self.state.search.results.iter().enumerate() {
            ui.horizontal(|ui| {
                if ui.selectable_label(false, ex.display_name()).clicked() {
                    selected = Some(i);
                }
                let tags = ex.tag_line();
                if !tags.is_empty() {
                    ui.small(tags);
                }
            });
        }
        if let Some(i) = selected {
            self.state.select_result(i);
        }

        ui.separator();
        match &self.state.search.detail {
            DetailPane::Message(message) => {
                ui.label(RichText::new(*message).italics());
            }
            DetailPane::Exercise(detail) => {
                ui.strong(&detail.name);
                ui.label(format!("Type: {}", detail.kind));
                ui.label(format!("Primary Muscle: {}", detail.muscle));
                ui.label(format!("Difficulty: {}", detail.difficulty));
                ui.label(RichText::new("Instructions").strong());
                for (n, step) in detail.steps.iter().enumerate() {
                    ui.label(format!("{}. {step}", n + 1));
                }
            }
        }
    }

    fn card(ui: &mut egui::Ui, entry: &WorkoutEntry, actions: &mut Vec<CardAction>) {
        let card = CardView::from_entry(entry);
        let buttons = |ui: &mut egui::Ui, actions: &mut Vec<CardAction>| {
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    actions.push(CardAction::Edit(entry.clone()));
                }
                if let Some(id) = &card.id {
                    if ui.button("Delete").clicked() {
                        actions.push(CardAction::Delete(id.clone()));
                    }
                }
            });
        };
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.heading(&card.title);
                ui.label(RichText::new(&card.kind).background_color(Color32::from_gray(60)));
                if card.personal_record {
                    ui.label(RichText::new("PR").strong().color(Color32::GOLD));
                }
                if let Some(date) = &card.date {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{} {} {}", date.day, date.month, date.year));
                    });
                }
            });
            ui.label(card.subline());
            ui.horizontal(|ui| {
                ui.label(format!("Mood {}", card.mood));
                ui.separator();
                ui.label(format!("Intensity {}", card.sets_reps));
                if let Some(chip) = &card.mood_chip {
                    ui.separator();
                    let color = match chip.tone {
                        ChipTone::Positive => Color32::GREEN,
                        ChipTone::Negative => Color32::LIGHT_RED,
                        ChipTone::Neutral => Color32::GRAY,
                    };
                    ui.label(RichText::new(&chip.text).color(color));
                }
            });
            match &card.notes {
                Some(notes) => {
                    ui.separator();
                    ui.strong("Notes");
                    ui.label(notes);
                    buttons(ui, actions);
                }
                None => buttons(ui, actions),
            }
        });
    }

    fn content(&mut self, ui: &mut egui::Ui) {
        let visible: Vec<WorkoutEntry> = self.state.visible().into_iter().cloned().collect();
        let mut actions = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if visible.is_empty() {
                let text = if self.state.store.is_empty() {
                    NO_WORKOUTS
                } else {
                    NO_MATCHES
                };
                ui.label(RichText::new(text).italics());
            }
            for entry in &visible {
                Self::card(ui, entry, &mut actions);
                ui.add_space(6.0);
            }
        });
        for action in actions {
            match action {
                CardAction::Edit(entry) => self.state.edit(&entry),
                CardAction::Delete(id) => self.state.request_delete(id),
            }
        }
    }

    fn form_field(ui: &mut egui::Ui, field: &mut form::FormField, types: &[String]) {
        match field.kind {
            InputKind::Hidden => {}
            InputKind::Text => {
                ui.label(&field.label);
                ui.text_edit_singleline(&mut field.value);
                ui.end_row();
            }
            InputKind::TextArea => {
                ui.label(&field.label);
                ui.text_edit_multiline(&mut field.value);
                ui.end_row();
            }
            InputKind::Number | InputKind::Count => {
                ui.label(&field.label);
                ui.add(egui::TextEdit::singleline(&mut field.value).desired_width(80.0));
                ui.end_row();
            }
            InputKind::Select => {
                ui.label(&field.label);
                let selected = if field.value.is_empty() {
                    "Choose a type".to_string()
                } else {
                    field.value.clone()
                };
                egui::ComboBox::from_id_source(field.name.clone())
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for t in types {
                            ui.selectable_value(&mut field.value, t.clone(), t);
                        }
                    });
                ui.end_row();
            }
            InputKind::Range { min, max } => {
                ui.label(&field.label);
                let mut value = field.slider_value();
                if ui.add(egui::Slider::new(&mut value, min..=max)).changed()
                    || field.value.trim().is_empty()
                {
                    field.value = value.to_string();
                }
                ui.end_row();
            }
            InputKind::Date => {
                ui.label(&field.label);
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut field.value)
                            .hint_text("YYYY-MM-DD")
                            .desired_width(100.0),
                    );
                    let mut date = NaiveDate::parse_from_str(field.value.trim(), "%Y-%m-%d")
                        .unwrap_or_else(|_| Local::now().date_naive());
                    if ui
                        .add(DatePickerButton::new(&mut date).id_source("form_date"))
                        .changed()
                    {
                        field.value = date.format("%Y-%m-%d").to_string();
                    }
                });
                ui.end_row();
            }
            InputKind::Checkbox => {
                ui.label("");
                ui.checkbox(&mut field.checked, &field.label);
                ui.end_row();
            }
        }
    }

    fn form_window(&mut self, ctx: &egui::Context) {
        if !self.state.form_open {
            return;
        }
        let types = self.state.type_options();
        let mut submit = false;
        let mut cancel = false;
        let mut reset = false;
        egui::Window::new(self.state.form_mode.heading())
            .id(egui::Id::new("workout_form"))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("form_grid").num_columns(2).show(ui, |ui| {
                    for field in &mut self.state.form.fields {
                        Self::form_field(ui, field, &types);
                    }
                });
                ui.separator();
                ui.horizontal(|ui| {
                    submit = ui.button("Save").clicked();
                    reset = ui.button("Reset").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
        if submit {
            let request = self.state.submit();
            self.dispatch(request);
        } else if reset {
            self.state.form.reset();
            self.state.form_mode = form::FormMode::Create;
        } else if cancel {
            self.state.cancel_form();
        }
    }

    fn modals(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.state.alerts.front().cloned() {
            let mut dismissed = false;
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    dismissed = ui.button("OK").clicked();
                });
            if dismissed {
                self.state.dismiss_alert();
            }
            return;
        }
        if self.state.pending_delete.is_some() {
            let mut answer = None;
            egui::Window::new("Delete workout")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(DELETE_CONFIRMATION);
                    ui.horizontal(|ui| {
                        if ui.button("Delete").clicked() {
                            answer = Some(true);
                        }
                        if ui.button("Cancel").clicked() {
                            answer = Some(false);
                        }
                    });
                });
            if let Some(confirmed) = answer {
                let request = self.state.confirm_delete(confirmed);
                self.dispatch(request);
            }
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut apply = false;
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                let draft = &mut self.settings_draft;
                egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Backend URL");
                    ui.text_edit_singleline(&mut draft.backend_url);
                    ui.end_row();
                    ui.label("Exercise API URL");
                    ui.text_edit_singleline(&mut draft.exercise_api_url);
                    ui.end_row();
                    ui.label("Exercise API host");
                    ui.text_edit_singleline(&mut draft.exercise_api_host);
                    ui.end_row();
                    ui.label("Exercise API key");
                    let key = draft.exercise_api_key.get_or_insert_with(String::new);
                    ui.add(egui::TextEdit::singleline(key).password(true));
                    ui.end_row();
                });
                if std::env::var_os("EXERCISE_API_KEY").is_some() {
                    ui.small("EXERCISE_API_KEY is set and overrides the key above.");
                }
                apply = ui.button("Apply").clicked();
            });
        if apply {
            if self
                .settings_draft
                .exercise_api_key
                .as_deref()
                .is_some_and(|k| k.trim().is_empty())
            {
                self.settings_draft.exercise_api_key = None;
            }
            self.apply_settings();
            open = false;
        }
        self.show_settings = open;
    }

    fn toast(&mut self, ctx: &egui::Context) {
        if let Some(start) = self.toast_start {
            if start.elapsed() < Duration::from_secs(3) {
                if let Some(ref msg) = self.toast_message {
                    egui::Area::new(egui::Id::new("load_toast"))
                        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
                        .show(ctx, |ui| {
                            ui.label(msg);
                        });
                }
                ctx.request_repaint_after(Duration::from_millis(250));
            } else {
                self.toast_start = None;
                self.toast_message = None;
            }
        }
    }
}

impl App for WorkoutLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_outcomes();
        let enabled = !self.modal_open();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.top_bar(ui));
        });

        egui::SidePanel::left("side_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.filters_panel(ui);
                        ui.separator();
                        self.summary_panel(ui);
                        ui.separator();
                        self.search_panel(ui);
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.backend {
                BackendStatus::Unavailable => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new("The workout backend is not ready. Check the backend URL in Settings, then Refresh.")
                                .color(Color32::LIGHT_RED),
                        );
                    });
                }
                _ => {
                    ui.add_enabled_ui(enabled, |ui| self.content(ui));
                }
            }
        });

        if enabled {
            self.form_window(ctx);
            self.settings_window(ctx);
        }
        self.modals(ctx);
        self.toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "Workout Log",
        options,
        Box::new(|cc| Box::new(WorkoutLogApp::new(cc))),
    )
}
