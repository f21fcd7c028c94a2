// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the labeling session and the canvas and
//! turns toolbar, canvas and prompt results into session operations.

use crate::config::Config;
use crate::io::dialogs::{Dialogs, MessageKind};
use crate::models::session::{AnnotationSession, CommitOutcome, Rejection};
use crate::ui::canvas::{Canvas, CanvasAction, LoadOutcome};
use crate::ui::prompt::{PromptResult, TextPrompt};
use crate::ui::{properties, toolbar};
use std::time::{Duration, Instant};

/// A status bar message, optionally disappearing after a while.
struct StatusMessage {
    text: String,
    kind: MessageKind,
    expires: Option<Instant>,
}

/// The end-of-session message, naming any trailing images that could not be read.
fn finished_message(skipped: &[String]) -> String {
    let mut text = String::from("All images have been processed.");
    if !skipped.is_empty() {
        text.push_str(&format!("\n\nSkipped unreadable images: {}", skipped.join(", ")));
    }
    text
}

/// Main application state.
pub struct LabelerApp {
    /// Boxes, classes, cursor and store
    session: AnnotationSession,

    /// Image display and box widgets
    canvas: Canvas,

    /// Blocking native dialogs
    dialogs: Box<dyn Dialogs>,

    /// Current status bar message
    status: Option<StatusMessage>,

    /// How long transient status messages stay up
    status_duration: Duration,

    /// Open "Add Class" prompt
    prompt: Option<TextPrompt>,

    /// The image under the session cursor still has to be shown
    needs_load: bool,
}

impl LabelerApp {
    /// Create the app for an already opened session.
    pub fn new(session: AnnotationSession, config: &Config, dialogs: Box<dyn Dialogs>) -> Self {
        Self {
            session,
            canvas: Canvas::new(config.zoom(), config.handle_tolerance),
            dialogs,
            status: None,
            status_duration: Duration::from_secs_f32(config.status_seconds.max(0.0)),
            prompt: None,
            needs_load: true,
        }
    }

    fn set_status(&mut self, kind: MessageKind, text: impl Into<String>, transient: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            expires: transient.then(|| Instant::now() + self.status_duration),
        });
    }

    /// Show the image under the cursor, or finish when none is left.
    fn load_current(&mut self, ctx: &egui::Context) {
        match self.canvas.load_current(ctx, &mut self.session) {
            LoadOutcome::Loaded { skipped } => {
                if !skipped.is_empty() {
                    self.set_status(
                        MessageKind::Warning,
                        format!("Skipped unreadable images: {}", skipped.join(", ")),
                        true,
                    );
                }
            }
            LoadOutcome::Finished { skipped } => {
                log::info!(
                    "All {} images have been processed ({} records in {})",
                    self.session.cursor(),
                    self.session.store().len(),
                    self.session.store().path().display()
                );
                self.dialogs
                    .show_message(MessageKind::Info, "End", &finished_message(&skipped));
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// Tell the user why an add or commit was refused.
    fn report_rejection(&mut self, rejection: Rejection) {
        log::info!("Rejected: {}", rejection);
        match rejection {
            Rejection::ZeroAreaCandidate => {
                self.dialogs
                    .show_message(MessageKind::Warning, "Warning", &rejection.to_string());
            }
            _ => self.set_status(MessageKind::Warning, rejection.to_string(), true),
        }
    }

    fn commit(&mut self, ctx: &egui::Context) {
        match self.session.commit() {
            Ok(CommitOutcome::Committed { image, boxes }) => {
                self.set_status(
                    MessageKind::Info,
                    format!("Saved {} boxes for {}", boxes, image),
                    true,
                );
                self.canvas.reset_view();
                self.load_current(ctx);
            }
            Ok(CommitOutcome::Rejected(Rejection::Finished)) => self.load_current(ctx),
            Ok(CommitOutcome::Rejected(rejection)) => self.report_rejection(rejection),
            Err(e) => {
                log::error!("Failed to save annotations: {:#}", e);
                self.dialogs.show_message(
                    MessageKind::Error,
                    "Save failed",
                    &format!("{:#}\n\nNothing was lost; fix the problem and save again.", e),
                );
            }
        }
    }

    fn handle_toolbar(&mut self, ctx: &egui::Context, action: toolbar::ToolbarAction) {
        use toolbar::ToolbarAction;

        match action {
            ToolbarAction::SelectClass(name) => {
                self.session.classes_mut().select(&name);
            }
            ToolbarAction::AddClass => {
                self.prompt = Some(TextPrompt::new("Add Class", "Enter new class name:"));
            }
            ToolbarAction::RemoveClass => {
                if let Some(name) = self.session.classes_mut().remove_selected() {
                    log::info!("Removed class {}", name);
                    self.set_status(MessageKind::Info, format!("Removed class {}", name), true);
                }
            }
            ToolbarAction::AddBox => {
                if let Err(rejection) = self.session.add() {
                    self.report_rejection(rejection);
                }
            }
            ToolbarAction::Reset => {
                self.session.reset();
                self.canvas.reset_view();
            }
            ToolbarAction::Commit => self.commit(ctx),
            ToolbarAction::ZoomIn => self.canvas.zoom_in(),
            ToolbarAction::ZoomOut => self.canvas.zoom_out(),
            ToolbarAction::Finish => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            ToolbarAction::None => {}
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match prompt.show(ctx) {
            PromptResult::Pending => {}
            PromptResult::Submitted(name) => {
                self.prompt = None;
                if self.session.classes_mut().add(name.clone()) {
                    log::info!("Added class {}", name);
                } else {
                    self.set_status(
                        MessageKind::Warning,
                        format!("Class {} already exists", name),
                        true,
                    );
                }
            }
            PromptResult::Cancelled => self.prompt = None,
        }
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.needs_load {
            self.needs_load = false;
            self.load_current(ctx);
        }

        if let Some(expires) = self.status.as_ref().and_then(|s| s.expires) {
            let now = Instant::now();
            if now >= expires {
                self.status = None;
            } else {
                ctx.request_repaint_after(expires - now);
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.canvas.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.canvas.zoom_out();
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.canvas.reset_view();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session))
            .inner;

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(self.session.counter_label()).strong());
                ui.separator();
                ui.label(format!("Zoom {:.0}%", self.canvas.zoom_factor() * 100.0));
                if let Some(status) = &self.status {
                    ui.separator();
                    let color = match status.kind {
                        MessageKind::Info => ui.visuals().text_color(),
                        MessageKind::Warning => egui::Color32::from_rgb(230, 160, 40),
                        MessageKind::Error => egui::Color32::from_rgb(220, 60, 60),
                    };
                    ui.colored_label(color, &status.text);
                }
            });
        });

        // Box list and guided controls
        egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &mut self.session));

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| self.canvas.show(ui, &self.session))
            .inner;

        if let CanvasAction::UpdateBox(id, rect) = canvas_action {
            self.session.update_box(id, rect);
        }

        self.handle_toolbar(ctx, toolbar_action);
        self.show_prompt(ctx);
    }
}
