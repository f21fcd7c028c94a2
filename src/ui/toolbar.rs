// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with class selection and labeling actions.

use crate::models::session::{AnnotationSession, InteractionMode};

/// Button pressed in the toolbar this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    SelectClass(String),
    AddClass,
    RemoveClass,
    AddBox,
    Reset,
    Commit,
    ZoomIn,
    ZoomOut,
    Finish,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &AnnotationSession) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let classes = session.classes();
    let (add_text, reset_text, commit_text) = match session.mode() {
        InteractionMode::FreeForm => ("Add Bounding Box", "Reset All Bounding Boxes", "Save and Next"),
        InteractionMode::Guided => ("Add Label", "Reset", "Save"),
    };

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(egui::RichText::new("Options").strong());
        ui.separator();

        egui::ComboBox::from_id_source("class_selection")
            .selected_text(classes.selected().unwrap_or("(no classes)"))
            .show_ui(ui, |ui| {
                for name in classes.names() {
                    let selected = classes.selected() == Some(name.as_str());
                    if ui.selectable_label(selected, name).clicked() {
                        action = ToolbarAction::SelectClass(name.clone());
                    }
                }
            });

        if ui.button("Add Class").clicked() {
            action = ToolbarAction::AddClass;
        }
        if ui
            .add_enabled(!classes.is_empty(), egui::Button::new("Remove Class"))
            .clicked()
        {
            action = ToolbarAction::RemoveClass;
        }

        ui.separator();

        let can_label = !classes.is_empty() && !session.is_finished();
        if ui.add_enabled(can_label, egui::Button::new(add_text)).clicked() {
            action = ToolbarAction::AddBox;
        }
        if ui.button(reset_text).clicked() {
            action = ToolbarAction::Reset;
        }
        if ui
            .add_enabled(!session.is_finished(), egui::Button::new(commit_text))
            .clicked()
        {
            action = ToolbarAction::Commit;
        }

        ui.separator();

        if ui.button("Zoom In").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("Zoom Out").clicked() {
            action = ToolbarAction::ZoomOut;
        }

        ui.separator();

        if ui.button("Finish").clicked() {
            action = ToolbarAction::Finish;
        }
    });

    action
}
