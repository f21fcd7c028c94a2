// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image folder listing and image decoding.
//!
//! Decoded images come back as RGBA8 pixels ready to be turned into an
//! egui texture.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;

/// File extensions accepted as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A decoded image.
///
/// `width` and `height` are the original image dimensions, which all box
/// coordinates refer to. `pixels` holds `texture_size` RGBA8 pixels and
/// is smaller than the original when the decode had to be downscaled.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub texture_size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Check if a file name has a supported image extension.
pub fn is_supported_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List image file names in `dir`.
///
/// Names come back in directory-listing order unless `sort` is set.
pub fn list_images(dir: &Path, sort: bool) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read folder {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        // Follows symlinks, so linked images are listed too.
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        match file_name.to_str() {
            Some(name) if is_supported_image(name) => names.push(name.to_string()),
            Some(_) => {}
            None => log::warn!("Ignoring non UTF-8 file name {:?}", file_name),
        }
    }

    if sort {
        names.sort();
    }
    Ok(names)
}

/// Decode an image file into RGBA8 pixels.
///
/// Images with a side longer than `max_side` are downscaled to fit,
/// keeping the aspect ratio.
pub fn load_image(path: &Path, max_side: u32) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Cannot load image {}", path.display()))?;
    let (width, height) = (img.width(), img.height());
    log::debug!("Decoded {} ({}x{})", path.display(), width, height);

    let max_side = max_side.max(1);
    let img = if width > max_side || height > max_side {
        let scaled = img.resize(max_side, max_side, FilterType::Triangle);
        log::info!(
            "Downscaled {} from {}x{} to {}x{} for display",
            path.display(),
            width,
            height,
            scaled.width(),
            scaled.height()
        );
        scaled
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(LoadedImage {
        width,
        height,
        texture_size: [rgba.width() as usize, rgba.height() as usize],
        pixels: rgba.into_raw(),
    })
}
