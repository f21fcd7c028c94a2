// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native dialogs used by the labeling workflow.
//!
//! The session logic only sees the [`Dialogs`] trait, so it can run
//! against a scripted implementation in tests.

use std::path::PathBuf;

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Blocking dialogs provided by the platform.
pub trait Dialogs {
    /// Ask for an image folder. `None` when the user cancels.
    fn pick_folder(&self) -> Option<PathBuf>;

    /// Show a message and wait for the user to dismiss it.
    fn show_message(&self, kind: MessageKind, title: &str, text: &str);
}

/// [`Dialogs`] backed by rfd native dialogs.
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn pick_folder(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Image Folder")
            .pick_folder()
    }

    fn show_message(&self, kind: MessageKind, title: &str, text: &str) {
        let level = match kind {
            MessageKind::Info => rfd::MessageLevel::Info,
            MessageKind::Warning => rfd::MessageLevel::Warning,
            MessageKind::Error => rfd::MessageLevel::Error,
        };
        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(text)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
