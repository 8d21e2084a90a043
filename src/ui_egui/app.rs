//! Application shell.
//!
//! Owns the snapshot, the view window, and the edit engine; translates
//! keyboard/toolbar input into engine calls and runs fetch/commit work on
//! background threads so the grid stays interactive.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::{Local, NaiveDate};
use egui::Key;

use crate::grid::engine::{EditEngine, GridEvent};
use crate::grid::slots::{CreationHandoff, SlotDispatcher, SlotSelection};
use crate::grid::window::ViewWindow;
use crate::grid::Snapshot;
use crate::models::booking::Booking;
use crate::models::pending::PendingChange;
use crate::models::table::DiningTable;
use crate::services::api::{apply_changes, BookingApi, CommitReport, HttpBookingApi};
use crate::services::config::AppConfig;
use crate::ui_egui::theme::GridTheme;
use crate::ui_egui::views::grid_view;
use crate::utils::time::parse_hhmm;

type FetchResult = Result<(Vec<DiningTable>, Vec<Booking>), String>;

pub struct BookingApp {
    config: AppConfig,
    api: Option<HttpBookingApi>,
    snapshot: Snapshot,
    window: ViewWindow,
    engine: EditEngine,
    dispatcher: SlotDispatcher,
    theme: GridTheme,
    loading: bool,
    applying: bool,
    status: Option<String>,
    fetch_rx: Option<Receiver<FetchResult>>,
    commit_rx: Option<Receiver<CommitReport>>,
    /// Manual "jump to time" entry; reverts on invalid input
    jump_input: String,
    last_handoff: Option<CreationHandoff>,
}

impl eframe::App for BookingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers();
        self.advance_live_clock(ctx);
        self.handle_escape(ctx);
        self.draw_toolbar(ctx);
        self.draw_status_bar(ctx);
        self.draw_grid(ctx);
    }
}

impl BookingApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let theme = GridTheme::by_name(&config.theme);
        let api = match HttpBookingApi::new(&config.api_base_url) {
            Ok(api) => Some(api),
            Err(err) => {
                log::error!("Failed to build API client: {err:#}");
                None
            }
        };

        let now = Local::now().naive_local();
        let window = if config.live_tracking {
            ViewWindow::live(now)
        } else {
            ViewWindow::fixed(now)
        };

        let mut app = Self {
            config,
            api,
            snapshot: Snapshot::default(),
            window,
            engine: EditEngine::new(),
            dispatcher: SlotDispatcher::new(),
            theme,
            loading: false,
            applying: false,
            status: None,
            fetch_rx: None,
            commit_rx: None,
            jump_input: String::new(),
            last_handoff: None,
        };
        app.spawn_refresh(&cc.egui_ctx);
        app
    }

    /// The grid shows bookings for the window's anchor date.
    fn selected_date(&self) -> NaiveDate {
        self.window.anchor().date()
    }

    fn poll_workers(&mut self) {
        if let Some(rx) = self.fetch_rx.take() {
            match rx.try_recv() {
                Ok(Ok((tables, bookings))) => {
                    log::info!(
                        "Fetched {} tables and {} bookings",
                        tables.len(),
                        bookings.len()
                    );
                    self.snapshot.replace(bookings, tables);
                    self.loading = false;
                }
                Ok(Err(err)) => {
                    log::error!("Fetch failed: {err}");
                    self.status = Some(format!("Fetch failed: {err}"));
                    self.loading = false;
                }
                Err(TryRecvError::Empty) => self.fetch_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.loading = false,
            }
        }

        if let Some(rx) = self.commit_rx.take() {
            match rx.try_recv() {
                Ok(report) => {
                    self.applying = false;
                    self.engine.finish_commit(&report);
                    if report.all_applied() {
                        self.status = Some(format!("Applied {} change(s)", report.applied.len()));
                        // Replace the snapshot wholesale rather than
                        // patching the moved bookings in place.
                        self.spawn_refresh_from_status();
                    } else {
                        self.status = Some(format!(
                            "Applied {}, {} failed - still staged, apply to retry",
                            report.applied.len(),
                            report.failed.len()
                        ));
                    }
                }
                Err(TryRecvError::Empty) => self.commit_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.applying = false,
            }
        }
    }

    fn advance_live_clock(&mut self, ctx: &egui::Context) {
        if self.window.is_live() {
            self.window.tick(Local::now().naive_local());
            // One repaint per minute keeps the anchor moving while idle
            ctx.request_repaint_after(std::time::Duration::from_secs(60));
        }
    }

    fn handle_escape(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.engine
                .dispatch(GridEvent::EscapePressed, &self.snapshot, &self.window);
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("◀ Day").clicked() {
                    self.window.shift_days(-1);
                }
                let mut date = self.window.anchor().date();
                if ui
                    .add(egui_extras::DatePickerButton::new(&mut date).id_source("grid_date"))
                    .changed()
                {
                    let anchor = date.and_time(self.window.anchor().time());
                    self.window = ViewWindow::fixed(anchor);
                }
                if ui.button("Day ▶").clicked() {
                    self.window.shift_days(1);
                }
                ui.separator();

                if ui.button("◀").clicked() {
                    self.window.shift_hours(-1);
                }
                if ui.button("▶").clicked() {
                    self.window.shift_hours(1);
                }

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.jump_input)
                        .desired_width(52.0)
                        .hint_text("HH:MM"),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    match parse_hhmm(&self.jump_input) {
                        Some(time) => {
                            let anchor = self.window.anchor().date().and_time(time);
                            self.window = ViewWindow::fixed(anchor);
                            self.jump_input.clear();
                        }
                        None => {
                            // Reject locally; no backend call, revert input
                            log::warn!("Rejected time input {:?}", self.jump_input);
                            self.status = Some("Enter a time as HH:MM".to_string());
                            self.jump_input.clear();
                        }
                    }
                }

                let mut live = self.window.is_live();
                if ui.checkbox(&mut live, "Live").changed() {
                    self.window.set_live(live, Local::now().naive_local());
                }
                ui.separator();

                let mut edit_mode = self.engine.edit_mode();
                if ui.toggle_value(&mut edit_mode, "✏ Edit").changed() {
                    self.engine.set_edit_mode(edit_mode);
                }
                if self.engine.edit_mode() {
                    let staged = self.engine.pending().len();
                    if ui
                        .add_enabled(
                            staged > 0 && !self.applying && self.engine.is_idle(),
                            egui::Button::new(format!("Apply ({staged})")),
                        )
                        .clicked()
                    {
                        self.spawn_apply(ctx);
                    }
                    if ui.button("Cancel").clicked() {
                        self.engine.cancel_all();
                        self.status = Some("Changes discarded".to_string());
                    }
                }
                ui.separator();

                if ui
                    .add_enabled(!self.loading, egui::Button::new("⟳ Refresh"))
                    .clicked()
                {
                    self.spawn_refresh(ctx);
                }
            });
        });
    }

    fn draw_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.applying {
                    ui.spinner();
                    ui.label("Applying changes…");
                } else if self.loading {
                    ui.spinner();
                    ui.label("Loading…");
                } else if let Some(status) = &self.status {
                    ui.label(status);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("snapshot v{}", self.snapshot.version))
                            .size(10.0)
                            .color(self.theme.text_secondary),
                    );
                    if let Some(handoff) = &self.last_handoff {
                        ui.label(
                            egui::RichText::new(format!(
                                "draft: table {} {} {}",
                                handoff.table, handoff.date, handoff.time
                            ))
                            .size(10.0)
                            .color(self.theme.text_secondary),
                        );
                    }
                });
            });
        });
    }

    fn draw_grid(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::default().fill(self.theme.app_background);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            if self.snapshot.is_empty() {
                ui.centered_and_justified(|ui| {
                    if self.loading {
                        ui.label("Loading tables and bookings…");
                    } else {
                        ui.label("No tables configured. Check the backend connection.");
                    }
                });
                return;
            }

            let selected_date = self.selected_date();
            egui::ScrollArea::vertical().show(ui, |ui| {
                let response = grid_view::render_grid(
                    ui,
                    &self.snapshot,
                    selected_date,
                    &self.window,
                    &mut self.engine,
                    &self.theme,
                );

                if response.staged_count > 0 {
                    self.status = Some(format!("{} change(s) staged", self.engine.pending().len()));
                }
                if let Some(selection) = response.slot_clicked {
                    self.handle_slot_click(selection);
                }
            });
        });
    }

    fn handle_slot_click(&mut self, selection: SlotSelection) {
        if let Some(handoff) = self.dispatcher.dispatch(selection) {
            log::info!(
                "Creation handoff: table {} on {} at {} ({}min default)",
                handoff.table,
                handoff.date,
                handoff.time,
                self.config.default_duration_minutes
            );
            self.status = Some(format!(
                "New booking: table {} on {} at {}",
                handoff.table, handoff.date, handoff.time
            ));
            self.last_handoff = Some(handoff);
        }
    }

    fn spawn_refresh(&mut self, ctx: &egui::Context) {
        let Some(api) = self.api.clone() else {
            self.status = Some("No backend configured".to_string());
            return;
        };
        let restaurant = self.config.restaurant_id;
        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);
        self.loading = true;

        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = api
                .list_tables(restaurant)
                .and_then(|tables| api.list_bookings().map(|bookings| (tables, bookings)))
                .map_err(|err| err.to_string());
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Refetch triggered from a worker result, where no fresh Context
    /// reference is in scope.
    fn spawn_refresh_from_status(&mut self) {
        let Some(api) = self.api.clone() else {
            return;
        };
        let restaurant = self.config.restaurant_id;
        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);
        self.loading = true;

        thread::spawn(move || {
            let result = api
                .list_tables(restaurant)
                .and_then(|tables| api.list_bookings().map(|bookings| (tables, bookings)))
                .map_err(|err| err.to_string());
            let _ = tx.send(result);
        });
    }

    fn spawn_apply(&mut self, ctx: &egui::Context) {
        if self.applying || !self.engine.is_idle() || !self.engine.has_pending() {
            return;
        }
        let Some(api) = self.api.clone() else {
            self.status = Some("No backend configured".to_string());
            return;
        };

        let changes: Vec<PendingChange> = self.engine.pending().values().cloned().collect();
        let (tx, rx) = mpsc::channel();
        self.commit_rx = Some(rx);
        self.applying = true;

        let ctx = ctx.clone();
        thread::spawn(move || {
            let report = apply_changes(&api, &changes);
            let _ = tx.send(report);
            ctx.request_repaint();
        });
    }
}
