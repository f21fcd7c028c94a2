// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal text prompt.

/// What the prompt produced this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    Pending,
    Submitted(String),
    Cancelled,
}

/// A small window asking for one line of text.
pub struct TextPrompt {
    title: String,
    label: String,
    text: String,
}

impl TextPrompt {
    pub fn new(title: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            text: String::new(),
        }
    }

    /// Blank input counts as a cancel.
    fn finish(&self) -> PromptResult {
        let text = self.text.trim();
        if text.is_empty() {
            PromptResult::Cancelled
        } else {
            PromptResult::Submitted(text.to_string())
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PromptResult {
        let mut result = PromptResult::Pending;
        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(self.label.as_str());
                let edit = ui.text_edit_singleline(&mut self.text);
                edit.request_focus();
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        result = self.finish();
                    }
                    if ui.button("Cancel").clicked() {
                        result = PromptResult::Cancelled;
                    }
                });
            });
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            result = PromptResult::Cancelled;
        }
        result
    }
}
