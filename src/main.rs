// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! bbox-labeler - bounding box labeling for object detection datasets
//!
//! A desktop tool that walks through a folder of images, lets the user
//! draw class-tagged bounding boxes on each one and appends the result to
//! a single `annotations.json` file.

mod app;
mod config;
mod io;
mod models;
mod startup;
mod ui;
mod util;

use anyhow::Result;
use app::LabelerApp;
use config::Config;
use io::dialogs::NativeDialogs;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    // Folder pick, listing and store load all happen before any window opens
    let session = startup::open_session(&config, &NativeDialogs)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Image Labeling Application"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "bbox-labeler",
        options,
        Box::new(move |_cc| Ok(Box::new(LabelerApp::new(session, &config, Box::new(NativeDialogs))))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
