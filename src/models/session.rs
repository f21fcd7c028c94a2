// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image labeling session.
//!
//! The session owns the working boxes of the image under the cursor, the
//! class registry and the annotation store. Committing flattens the boxes
//! into an [`ImageRecord`], persists the store and moves to the next image.
//!
//! Two ways of building boxes are supported:
//! - [`InteractionMode::FreeForm`]: any number of boxes placed at a default
//!   position, then moved and resized on the canvas.
//! - [`InteractionMode::Guided`]: one candidate box at a time, defined by a
//!   low/high range control per axis, snapshotted into the box list on add.

use super::annotation::{BoundingBox, BoxId, ImageRecord, Palette};
use super::classes::ClassRegistry;
use crate::io::serialization::AnnotationStore;
use crate::util::geometry::Rect;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How boxes are created for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    FreeForm,
    Guided,
}

/// A low/high pair of range controls for one axis.
///
/// `low <= high <= limit` holds after every change: moving the low handle
/// past the high one drags the high one along, and the high handle cannot
/// go below the low one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePair {
    low: f64,
    high: f64,
    limit: f64,
}

impl RangePair {
    pub fn new(limit: f64) -> Self {
        Self {
            low: 0.0,
            high: 0.0,
            limit: limit.max(0.0),
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn extent(&self) -> f64 {
        self.high - self.low
    }

    pub fn set_low(&mut self, value: f64) {
        self.low = value.clamp(0.0, self.limit);
        if self.low > self.high {
            self.high = self.low;
        }
    }

    pub fn set_high(&mut self, value: f64) {
        self.high = value.clamp(self.low, self.limit);
    }

    /// Change the upper bound, pulling both handles inside it.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.low = self.low.min(self.limit);
        self.high = self.high.min(self.limit);
    }

    pub fn reset(&mut self) {
        self.low = 0.0;
        self.high = 0.0;
    }

    fn is_untouched(&self) -> bool {
        self.low == 0.0 && self.high == 0.0
    }
}

/// The single live box of guided mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidedCandidate {
    pub x: RangePair,
    pub y: RangePair,
}

impl GuidedCandidate {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: RangePair::new(width),
            y: RangePair::new(height),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x.low(), self.y.low(), self.x.extent(), self.y.extent())
    }

    /// All handles still at zero, i.e. nothing pending.
    pub fn is_untouched(&self) -> bool {
        self.x.is_untouched() && self.y.is_untouched()
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

/// Why an add or commit was refused. Nothing is changed when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoBoxes,
    ZeroAreaCandidate,
    NoClassSelected,
    Finished,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoBoxes => write!(f, "Please add at least one bounding box!"),
            Rejection::ZeroAreaCandidate => write!(f, "Cannot add a label with zero dimensions."),
            Rejection::NoClassSelected => write!(f, "Add a class before labeling."),
            Rejection::Finished => write!(f, "All images have been processed."),
        }
    }
}

/// Result of [`AnnotationSession::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { image: String, boxes: usize },
    Rejected(Rejection),
}

/// Everything a session starts from.
pub struct SessionSetup {
    pub folder: PathBuf,
    pub images: Vec<String>,
    pub store: AnnotationStore,
    pub classes: ClassRegistry,
    pub palette: Palette,
    pub mode: InteractionMode,
    /// Where free-form boxes appear when added.
    pub new_box: Rect,
}

pub struct AnnotationSession {
    folder: PathBuf,
    images: Vec<String>,
    cursor: usize,
    store: AnnotationStore,
    classes: ClassRegistry,
    palette: Palette,
    mode: InteractionMode,
    new_box: Rect,
    boxes: Vec<BoundingBox>,
    next_box_id: BoxId,
    candidate: GuidedCandidate,
}

impl AnnotationSession {
    pub fn new(setup: SessionSetup) -> Self {
        Self {
            folder: setup.folder,
            images: setup.images,
            cursor: 0,
            store: setup.store,
            classes: setup.classes,
            palette: setup.palette,
            mode: setup.mode,
            new_box: setup.new_box,
            boxes: Vec::new(),
            next_box_id: 1,
            candidate: GuidedCandidate::new(0.0, 0.0),
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Index of the image being labeled; equals the image count when done.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.images.len()
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.cursor).map(String::as_str)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_image().map(|name| self.folder.join(name))
    }

    /// `Image: M / N`, one-based.
    pub fn counter_label(&self) -> String {
        if self.is_finished() {
            "All images processed".to_string()
        } else {
            format!("Image: {} / {}", self.cursor + 1, self.images.len())
        }
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Working boxes of the current image, in creation order.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn candidate(&self) -> &GuidedCandidate {
        &self.candidate
    }

    pub fn candidate_mut(&mut self) -> &mut GuidedCandidate {
        &mut self.candidate
    }

    /// Color the next added box will get.
    pub fn next_color(&self) -> egui::Color32 {
        self.palette.peek()
    }

    /// Bound the guided controls by the loaded image size.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.candidate.x.set_limit(width as f64);
        self.candidate.y.set_limit(height as f64);
    }

    /// Add a box for the current image.
    ///
    /// Free-form mode places a new box at the default position; guided mode
    /// snapshots the candidate and zeroes the controls.
    pub fn add(&mut self) -> Result<BoxId, Rejection> {
        if self.is_finished() {
            return Err(Rejection::Finished);
        }
        let rect = match self.mode {
            InteractionMode::FreeForm => self.new_box,
            InteractionMode::Guided => {
                let rect = self.candidate.rect();
                if rect.is_empty() {
                    return Err(Rejection::ZeroAreaCandidate);
                }
                rect
            }
        };
        let class_label = self
            .classes
            .selected()
            .ok_or(Rejection::NoClassSelected)?
            .to_string();

        let id = self.next_box_id;
        self.next_box_id += 1;
        log::info!("Added {} box {} at {:?}", class_label, id, rect.to_bbox());
        self.boxes.push(BoundingBox {
            id,
            class_label,
            rect,
            color: self.palette.next_color(),
        });
        if self.mode == InteractionMode::Guided {
            self.candidate.reset();
        }
        Ok(id)
    }

    /// Replace the geometry of box `id` after an on-canvas edit.
    pub fn update_box(&mut self, id: BoxId, rect: Rect) -> bool {
        match self.boxes.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                log::debug!("Box {} -> {:?}", id, rect.to_bbox());
                b.rect = rect;
                true
            }
            None => {
                log::warn!("Update for unknown box {}", id);
                false
            }
        }
    }

    /// Discard every working box and the guided candidate.
    pub fn reset(&mut self) {
        if !self.boxes.is_empty() {
            log::info!("Discarded {} boxes", self.boxes.len());
        }
        self.boxes.clear();
        self.candidate.reset();
    }

    /// Persist the current image's boxes and advance.
    ///
    /// Returns `Err` only when writing the annotation file fails; the
    /// session is then left exactly as it was so the commit can be retried.
    pub fn commit(&mut self) -> Result<CommitOutcome> {
        let Some(image) = self.current_image().map(str::to_string) else {
            return Ok(CommitOutcome::Rejected(Rejection::Finished));
        };

        let mut boxes = self.boxes.clone();
        let mut took_candidate = false;
        match self.mode {
            InteractionMode::FreeForm => {
                if boxes.is_empty() {
                    return Ok(CommitOutcome::Rejected(Rejection::NoBoxes));
                }
            }
            InteractionMode::Guided => {
                if !self.candidate.is_untouched() {
                    let rect = self.candidate.rect();
                    if rect.is_empty() {
                        return Ok(CommitOutcome::Rejected(Rejection::ZeroAreaCandidate));
                    }
                    let Some(class_label) = self.classes.selected() else {
                        return Ok(CommitOutcome::Rejected(Rejection::NoClassSelected));
                    };
                    boxes.push(BoundingBox {
                        id: self.next_box_id,
                        class_label: class_label.to_string(),
                        rect,
                        color: self.palette.peek(),
                    });
                    took_candidate = true;
                }
                if boxes.is_empty() {
                    return Ok(CommitOutcome::Rejected(Rejection::ZeroAreaCandidate));
                }
            }
        }

        self.store.append(ImageRecord::from_boxes(image.as_str(), &boxes))?;

        if took_candidate {
            self.next_box_id += 1;
            self.palette.next_color();
        }
        log::info!(
            "Committed {} boxes for {} ({} records total)",
            boxes.len(),
            image,
            self.store.len()
        );
        self.boxes.clear();
        self.candidate.reset();
        self.cursor += 1;
        Ok(CommitOutcome::Committed {
            image,
            boxes: boxes.len(),
        })
    }

    /// Move past the current image without recording anything.
    pub fn skip_current(&mut self) {
        if let Some(image) = self.current_image() {
            log::warn!("Skipping {}", image);
            self.boxes.clear();
            self.candidate.reset();
            self.cursor += 1;
        }
    }
}
