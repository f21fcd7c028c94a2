// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from a YAML file (`bbox-labeler.yaml` in the working
//! directory, or the path in `BBOX_LABELER_CONFIG`). Every field is
//! optional; a missing file means all defaults.

use crate::models::session::InteractionMode;
use crate::ui::viewport::{ZoomConfig, ZoomPolicy};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BBOX_LABELER_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bbox-labeler.yaml";

const VEHICLE_CLASSES: [&str; 5] = ["passenger", "SUV/off-road", "delivery", "special", "truck"];
const GUIDED_CLASSES: [&str; 2] = ["car", "none"];

const FREE_FORM_PALETTE: [&str; 8] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#000000", "#FFFFFF",
];
const GUIDED_PALETTE: [&str; 8] = [
    "#00FF99", "#FF6600", "#3366FF", "#FF0066", "#33FFCC", "#9900FF", "#CCCC00", "#FFCCFF",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where committed records are written.
    pub annotation_file: PathBuf,
    pub mode: InteractionMode,
    /// Initial class list. Defaults depend on `mode`.
    pub classes: Option<Vec<String>>,
    /// `#RRGGBB` box colors, handed out round-robin. Defaults depend on `mode`.
    pub palette: Option<Vec<String>>,
    /// Zoom limits and stepping. Defaults depend on `mode`.
    pub zoom: Option<ZoomConfig>,
    /// Grab distance for resize handles, in screen pixels.
    pub handle_tolerance: f32,
    /// Sort image names instead of using directory-listing order.
    pub sort_images: bool,
    /// `[x, y, width, height]` of a freshly added free-form box.
    pub new_box: [f64; 4],
    /// How long transient status messages stay visible.
    pub status_seconds: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annotation_file: PathBuf::from("annotations.json"),
            mode: InteractionMode::FreeForm,
            classes: None,
            palette: None,
            zoom: None,
            handle_tolerance: 5.0,
            sort_images: false,
            new_box: [50.0, 50.0, 100.0, 100.0],
            status_seconds: 3.0,
        }
    }
}

impl Config {
    /// Load from `BBOX_LABELER_CONFIG` or the default file name.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_path(&path)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let zoom = self.zoom();
        if !(zoom.min > 0.0 && zoom.min <= 1.0 && zoom.max >= 1.0) {
            return Err(anyhow!(
                "zoom limits must satisfy 0 < min <= 1 <= max (got {} .. {})",
                zoom.min,
                zoom.max
            ));
        }
        match zoom.policy {
            ZoomPolicy::Additive { step } if !(step > 0.0) => {
                return Err(anyhow!("additive zoom step must be positive (got {})", step));
            }
            ZoomPolicy::Multiplicative { zoom_in, zoom_out }
                if !(zoom_in > 1.0 && zoom_out > 0.0 && zoom_out < 1.0) =>
            {
                return Err(anyhow!(
                    "multiplicative zoom must satisfy zoom_in > 1 and 0 < zoom_out < 1 (got {} / {})",
                    zoom_in,
                    zoom_out
                ));
            }
            _ => {}
        }
        if self.handle_tolerance <= 0.0 {
            return Err(anyhow!("handle_tolerance must be positive"));
        }
        self.palette()?;
        Ok(())
    }

    pub fn classes(&self) -> Vec<String> {
        match &self.classes {
            Some(classes) => classes.clone(),
            None => {
                let defaults: &[&str] = match self.mode {
                    InteractionMode::FreeForm => &VEHICLE_CLASSES,
                    InteractionMode::Guided => &GUIDED_CLASSES,
                };
                defaults.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    pub fn palette(&self) -> Result<Vec<egui::Color32>> {
        match &self.palette {
            Some(colors) => colors.iter().map(|c| parse_hex_color(c)).collect(),
            None => {
                let defaults: &[&str] = match self.mode {
                    InteractionMode::FreeForm => &FREE_FORM_PALETTE,
                    InteractionMode::Guided => &GUIDED_PALETTE,
                };
                defaults.iter().map(|c| parse_hex_color(c)).collect()
            }
        }
    }

    pub fn zoom(&self) -> ZoomConfig {
        self.zoom.clone().unwrap_or_else(|| match self.mode {
            InteractionMode::FreeForm => ZoomConfig {
                policy: ZoomPolicy::Additive { step: 0.1 },
                min: 0.2,
                max: 2.0,
            },
            InteractionMode::Guided => ZoomConfig {
                policy: ZoomPolicy::Multiplicative {
                    zoom_in: 1.2,
                    zoom_out: 0.8,
                },
                min: 0.5,
                max: 2.0,
            },
        })
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(text: &str) -> Result<egui::Color32> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(anyhow!("Invalid color {:?}, expected #RRGGBB", text));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .with_context(|| format!("Invalid color {:?}, expected #RRGGBB", text))
    };
    Ok(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
