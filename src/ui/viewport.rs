// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Zoom and pan for the image canvas.
//!
//! The image is fitted into the canvas area, then scaled by the zoom
//! factor and shifted by the pan offset. [`Viewport`] converts between
//! screen positions and image-pixel coordinates for that transform.

use crate::util::geometry::Point;
use serde::{Deserialize, Serialize};

/// How each zoom event changes the factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoomPolicy {
    /// Add or subtract a fixed step.
    Additive { step: f64 },
    /// Multiply by `zoom_in` or `zoom_out`.
    Multiplicative { zoom_in: f64, zoom_out: f64 },
}

/// Zoom stepping plus the allowed factor range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub policy: ZoomPolicy,
    pub min: f64,
    pub max: f64,
}

/// Zoom factor bounded to `[min, max]`.
///
/// Additive zoom is tracked as a whole number of steps away from 1.0, so
/// any run of zoom-ins undone by the same number of zoom-outs lands back
/// on exactly the starting factor.
#[derive(Debug, Clone)]
pub struct Zoom {
    config: ZoomConfig,
    steps: i32,
    factor: f64,
}

impl Zoom {
    pub fn new(config: ZoomConfig) -> Self {
        let mut zoom = Self {
            config,
            steps: 0,
            factor: 1.0,
        };
        zoom.reset();
        zoom
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn reset(&mut self) {
        self.steps = 0;
        self.factor = 1.0_f64.clamp(self.config.min, self.config.max);
    }

    pub fn zoom_in(&mut self) {
        match self.config.policy {
            ZoomPolicy::Additive { step } => {
                if 1.0 + f64::from(self.steps + 1) * step <= self.config.max + 1e-9 {
                    self.steps += 1;
                }
                self.factor = self.additive_factor(step);
            }
            ZoomPolicy::Multiplicative { zoom_in, .. } => {
                self.factor = (self.factor * zoom_in).clamp(self.config.min, self.config.max);
            }
        }
    }

    pub fn zoom_out(&mut self) {
        match self.config.policy {
            ZoomPolicy::Additive { step } => {
                if 1.0 + f64::from(self.steps - 1) * step >= self.config.min - 1e-9 {
                    self.steps -= 1;
                }
                self.factor = self.additive_factor(step);
            }
            ZoomPolicy::Multiplicative { zoom_out, .. } => {
                self.factor = (self.factor * zoom_out).clamp(self.config.min, self.config.max);
            }
        }
    }

    fn additive_factor(&self, step: f64) -> f64 {
        (1.0 + f64::from(self.steps) * step).clamp(self.config.min, self.config.max)
    }
}

/// Screen placement of the current image.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub zoom: Zoom,
    pan: egui::Vec2,
    area: egui::Rect,
    image_size: egui::Vec2,
}

impl Viewport {
    pub fn new(zoom: ZoomConfig) -> Self {
        Self {
            zoom: Zoom::new(zoom),
            pan: egui::Vec2::ZERO,
            area: egui::Rect::NOTHING,
            image_size: egui::Vec2::ZERO,
        }
    }

    /// Start over for a freshly loaded image: refit, no zoom, no pan.
    pub fn reset(&mut self, image_width: u32, image_height: u32) {
        self.image_size = egui::vec2(image_width as f32, image_height as f32);
        self.refit();
    }

    /// Drop zoom and pan, keeping the current image.
    pub fn refit(&mut self) {
        self.zoom.reset();
        self.pan = egui::Vec2::ZERO;
    }

    /// Record the screen area available to the canvas this frame.
    pub fn set_area(&mut self, area: egui::Rect) {
        self.area = area;
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.pan += delta;
    }

    /// Scale that fits the whole image into the area, preserving aspect ratio.
    fn fit_scale(&self) -> f32 {
        if self.image_size.x <= 0.0 || self.image_size.y <= 0.0 || !self.area.is_positive() {
            return 1.0;
        }
        (self.area.width() / self.image_size.x).min(self.area.height() / self.image_size.y)
    }

    /// Screen pixels per image pixel.
    pub fn scale(&self) -> f32 {
        self.fit_scale() * self.zoom.factor() as f32
    }

    /// Where the image is drawn on screen.
    pub fn image_rect(&self) -> egui::Rect {
        let size = self.image_size * self.scale();
        egui::Rect::from_center_size(self.area.center() + self.pan, size)
    }

    pub fn screen_to_image(&self, pos: egui::Pos2) -> Point {
        let rel = (pos - self.image_rect().min) / self.scale();
        Point::new(rel.x as f64, rel.y as f64)
    }

    pub fn image_to_screen(&self, p: Point) -> egui::Pos2 {
        self.image_rect().min + egui::vec2(p.x as f32, p.y as f32) * self.scale()
    }

    /// Convert a screen-space distance into image pixels.
    pub fn screen_to_image_len(&self, len: f32) -> f64 {
        (len / self.scale()) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn additive() -> ZoomConfig {
        ZoomConfig {
            policy: ZoomPolicy::Additive { step: 0.1 },
            min: 0.2,
            max: 2.0,
        }
    }

    fn multiplicative() -> ZoomConfig {
        ZoomConfig {
            policy: ZoomPolicy::Multiplicative {
                zoom_in: 1.2,
                zoom_out: 0.8,
            },
            min: 0.5,
            max: 2.0,
        }
    }

    #[test]
    fn test_additive_zoom_returns_to_start() {
        let mut zoom = Zoom::new(additive());
        for _ in 0..7 {
            zoom.zoom_in();
        }
        for _ in 0..7 {
            zoom.zoom_out();
        }
        assert!((zoom.factor() - 1.0).abs() < 1e-9);

        for _ in 0..5 {
            zoom.zoom_out();
        }
        for _ in 0..5 {
            zoom.zoom_in();
        }
        assert!((zoom.factor() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_additive_zoom_stays_in_bounds() {
        let mut zoom = Zoom::new(additive());
        for _ in 0..100 {
            zoom.zoom_in();
            assert!(zoom.factor() <= 2.0);
        }
        assert!((zoom.factor() - 2.0).abs() < 1e-9);
        for _ in 0..100 {
            zoom.zoom_out();
            assert!(zoom.factor() >= 0.2);
        }
        assert!((zoom.factor() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_multiplicative_zoom_stays_in_bounds() {
        let mut zoom = Zoom::new(multiplicative());
        let pattern = [true, true, false, true, true, true, true, false, false, true];
        for _ in 0..20 {
            for &zoom_in in &pattern {
                if zoom_in {
                    zoom.zoom_in();
                } else {
                    zoom.zoom_out();
                }
                assert!(zoom.factor() >= 0.5 && zoom.factor() <= 2.0);
            }
        }
        for _ in 0..50 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), 0.5);
    }

    #[test]
    fn test_image_fits_and_centers() {
        let mut viewport = Viewport::new(additive());
        viewport.reset(200, 100);
        viewport.set_area(egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 400.0)));

        assert_eq!(viewport.scale(), 2.0);
        let rect = viewport.image_rect();
        assert_eq!(rect.min, egui::pos2(0.0, 100.0));
        assert_eq!(rect.max, egui::pos2(400.0, 300.0));
    }

    #[test]
    fn test_coordinate_round_trip_with_zoom_and_pan() {
        let mut viewport = Viewport::new(additive());
        viewport.reset(640, 480);
        viewport.set_area(egui::Rect::from_min_size(egui::pos2(10.0, 30.0), egui::vec2(800.0, 600.0)));
        viewport.zoom.zoom_in();
        viewport.zoom.zoom_in();
        viewport.pan_by(egui::vec2(-35.0, 12.0));

        let p = Point::new(123.0, 45.5);
        let back = viewport.screen_to_image(viewport.image_to_screen(p));
        assert!((back.x - p.x).abs() < 1e-3);
        assert!((back.y - p.y).abs() < 1e-3);
    }

    #[test]
    fn test_reset_clears_zoom_and_pan() {
        let mut viewport = Viewport::new(additive());
        viewport.reset(100, 100);
        viewport.set_area(egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0)));
        viewport.zoom.zoom_in();
        viewport.pan_by(egui::vec2(5.0, 5.0));

        viewport.reset(100, 100);
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.image_rect().min, egui::pos2(0.0, 0.0));
    }
}
