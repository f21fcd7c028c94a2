// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side panel listing the working boxes of the current image.
//!
//! In guided mode the panel also carries the low/high range controls that
//! define the candidate box.

use crate::models::session::{AnnotationSession, InteractionMode, RangePair};

/// Display the panel. Slider edits go straight to the session's candidate.
pub fn show(ui: &mut egui::Ui, session: &mut AnnotationSession) {
    ui.heading("Boxes");
    ui.label(session.counter_label());
    ui.separator();

    if session.mode() == InteractionMode::Guided && !session.is_finished() {
        ui.label(egui::RichText::new("Candidate").strong());
        let candidate = session.candidate_mut();
        range_controls(ui, "x", &mut candidate.x);
        range_controls(ui, "y", &mut candidate.y);
        let rect = candidate.rect();
        ui.label(
            egui::RichText::new(format!(
                "{:.0} x {:.0} at ({:.0}, {:.0})",
                rect.width, rect.height, rect.x, rect.y
            ))
            .weak(),
        );
        ui.separator();
    }

    if session.boxes().is_empty() {
        ui.label(egui::RichText::new("No boxes yet").italics().weak());
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for b in session.boxes() {
            let r = b.rect.normalized();
            ui.horizontal(|ui| {
                ui.colored_label(b.color, "■");
                ui.label(&b.class_label);
                ui.label(
                    egui::RichText::new(format!(
                        "[{:.0}, {:.0}, {:.0}, {:.0}]",
                        r.x, r.y, r.width, r.height
                    ))
                    .monospace()
                    .weak(),
                );
            });
        }
    });
}

/// Two sliders for one axis, kept ordered by [`RangePair`].
fn range_controls(ui: &mut egui::Ui, axis: &str, pair: &mut RangePair) {
    let limit = pair.limit();

    let mut low = pair.low();
    if ui
        .add(egui::Slider::new(&mut low, 0.0..=limit).step_by(1.0).text(format!("{axis} min")))
        .changed()
    {
        pair.set_low(low);
    }

    let mut high = pair.high();
    if ui
        .add(egui::Slider::new(&mut high, 0.0..=limit).step_by(1.0).text(format!("{axis} max")))
        .changed()
    {
        pair.set_high(high);
    }
}
