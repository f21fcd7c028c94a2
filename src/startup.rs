// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session startup: pick the image folder, list it, load existing labels.
//!
//! Every failure here is fatal. The user is told what went wrong and the
//! error is passed back so the process can exit before any window opens.

use crate::config::Config;
use crate::io::dialogs::{Dialogs, MessageKind};
use crate::io::media;
use crate::io::serialization::AnnotationStore;
use crate::models::annotation::Palette;
use crate::models::classes::ClassRegistry;
use crate::models::session::{AnnotationSession, SessionSetup};
use crate::util::geometry::Rect;
use anyhow::{anyhow, Result};

/// Build a session for the folder the user picks.
pub fn open_session(config: &Config, dialogs: &dyn Dialogs) -> Result<AnnotationSession> {
    let Some(folder) = dialogs.pick_folder() else {
        let text = "No image folder selected.";
        dialogs.show_message(MessageKind::Error, "Error", text);
        return Err(anyhow!(text));
    };

    let images = match media::list_images(&folder, config.sort_images) {
        Ok(images) => images,
        Err(e) => {
            dialogs.show_message(MessageKind::Error, "Error", &format!("{e:#}"));
            return Err(e);
        }
    };
    if images.is_empty() {
        let text = "Folder does not contain PNG/JPG/JPEG files.";
        dialogs.show_message(MessageKind::Error, "Error", text);
        return Err(anyhow!("{} ({})", text, folder.display()));
    }
    log::info!(
        "Found {} images in {} ({})",
        images.len(),
        folder.display(),
        if config.sort_images { "sorted by name" } else { "directory order" }
    );

    let store = match AnnotationStore::open(&config.annotation_file) {
        Ok(store) => store,
        Err(e) => {
            dialogs.show_message(MessageKind::Error, "Error", &format!("{e:#}"));
            return Err(e);
        }
    };
    if store.is_empty() {
        log::info!("Starting {}", store.path().display());
    } else {
        // Records are only ever appended, so a re-run labels these again.
        let labeled = images
            .iter()
            .filter(|name| store.records().iter().any(|r| &r.image == *name))
            .count();
        if labeled > 0 {
            log::warn!(
                "{} of {} images already have records in {}",
                labeled,
                images.len(),
                store.path().display()
            );
        }
    }

    Ok(AnnotationSession::new(SessionSetup {
        folder,
        images,
        store,
        classes: ClassRegistry::new(config.classes()),
        palette: Palette::new(config.palette()?),
        mode: config.mode,
        new_box: Rect::from_bbox(config.new_box),
    }))
}
