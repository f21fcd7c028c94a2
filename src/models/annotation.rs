// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the working bounding boxes of the image being
//! labeled and the flattened records that end up in `annotations.json`.

use crate::util::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Identifier of a working box, unique within a session.
pub type BoxId = u64;

/// A class-tagged rectangle on the image currently being labeled.
///
/// The color is display-only and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub id: BoxId,
    pub class_label: String,
    pub rect: Rect,
    pub color: egui::Color32,
}

/// One persisted label: `{"class": ..., "bbox": [x, y, w, h]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    #[serde(rename = "class")]
    pub class_label: String,
    pub bbox: [f64; 4],
}

/// All labels committed for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image: String,
    pub annotations: Vec<AnnotationEntry>,
}

impl ImageRecord {
    /// Flatten working boxes into a record, keeping their order.
    pub fn from_boxes(image: impl Into<String>, boxes: &[BoundingBox]) -> Self {
        Self {
            image: image.into(),
            annotations: boxes
                .iter()
                .map(|b| AnnotationEntry {
                    class_label: b.class_label.clone(),
                    bbox: b.rect.normalized().to_bbox(),
                })
                .collect(),
        }
    }
}

/// Round-robin box colors.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<egui::Color32>,
    next: usize,
}

impl Palette {
    /// An empty color list falls back to a single red entry.
    pub fn new(colors: Vec<egui::Color32>) -> Self {
        let colors = if colors.is_empty() {
            vec![egui::Color32::RED]
        } else {
            colors
        };
        Self { colors, next: 0 }
    }

    /// Color the next box will receive, without consuming it.
    pub fn peek(&self) -> egui::Color32 {
        self.colors[self.next]
    }

    /// Hand out the next color and advance.
    pub fn next_color(&mut self) -> egui::Color32 {
        let color = self.colors[self.next];
        self.next = (self.next + 1) % self.colors.len();
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_layout() {
        let boxes = vec![BoundingBox {
            id: 1,
            class_label: "car".to_string(),
            rect: Rect::new(10.0, 10.0, 50.0, 30.0),
            color: egui::Color32::RED,
        }];
        let record = ImageRecord::from_boxes("a.png", &boxes);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "image": "a.png",
                "annotations": [{"class": "car", "bbox": [10.0, 10.0, 50.0, 30.0]}]
            })
        );
    }

    #[test]
    fn test_record_flattens_inverted_boxes() {
        let boxes = vec![BoundingBox {
            id: 7,
            class_label: "truck".to_string(),
            rect: Rect::new(60.0, 40.0, -50.0, -30.0),
            color: egui::Color32::RED,
        }];
        let record = ImageRecord::from_boxes("b.jpg", &boxes);
        assert_eq!(record.annotations[0].bbox, [10.0, 10.0, 50.0, 30.0]);
    }

    #[test]
    fn test_palette_wraps_around() {
        let mut palette = Palette::new(vec![egui::Color32::RED, egui::Color32::GREEN]);
        assert_eq!(palette.next_color(), egui::Color32::RED);
        assert_eq!(palette.next_color(), egui::Color32::GREEN);
        assert_eq!(palette.peek(), egui::Color32::RED);
        assert_eq!(palette.next_color(), egui::Color32::RED);
    }

    #[test]
    fn test_empty_palette_still_colors() {
        let mut palette = Palette::new(Vec::new());
        assert_eq!(palette.next_color(), egui::Color32::RED);
        assert_eq!(palette.next_color(), egui::Color32::RED);
    }
}
