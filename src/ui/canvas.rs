// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box editing.
//!
//! The canvas owns the texture of the current image, the zoom/pan
//! viewport and one [`BoxWidget`] per working box. Pointer input is turned
//! into [`PointerEvent`]s in screen space, mapped into image space through
//! the viewport and routed to the widget under the pointer (or to panning
//! when the pointer misses every box).

use crate::io::media::{self, LoadedImage};
use crate::models::annotation::{BoundingBox, BoxId};
use crate::models::session::{AnnotationSession, InteractionMode};
use crate::ui::box_widget::{BoxWidget, WidgetState};
use crate::ui::viewport::{Viewport, ZoomConfig};
use crate::util::geometry::{anchor_point, Anchor, Point, Rect};
use anyhow::Result;
use std::path::Path;

/// Result of canvas interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    /// A gesture on a box finished; the session should store this geometry.
    UpdateBox(BoxId, Rect),
}

/// Pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(egui::Pos2),
    Left,
    Pressed(egui::Pos2),
    Dragged(egui::Pos2),
    Released,
    Scrolled(f32),
}

/// What happened when trying to show the image under the session cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { skipped: Vec<String> },
    Finished { skipped: Vec<String> },
}

/// Decode the image under the cursor, skipping unreadable files.
///
/// Each failure is logged, the file name collected and the cursor moved on,
/// until an image decodes or the list runs out.
pub fn load_next_loadable<F>(
    session: &mut AnnotationSession,
    mut load: F,
) -> (Option<LoadedImage>, Vec<String>)
where
    F: FnMut(&Path) -> Result<LoadedImage>,
{
    let mut skipped = Vec::new();
    while let Some(path) = session.current_path() {
        log::debug!("Loading image: {}", path.display());
        match load(&path) {
            Ok(image) => return (Some(image), skipped),
            Err(e) => {
                log::warn!("{:#}", e);
                if let Some(name) = session.current_image() {
                    skipped.push(name.to_string());
                }
                session.skip_current();
            }
        }
    }
    (None, skipped)
}

fn cursor_for(anchor: Anchor) -> egui::CursorIcon {
    match anchor {
        Anchor::TopLeft | Anchor::BottomRight => egui::CursorIcon::ResizeNwSe,
        Anchor::TopRight | Anchor::BottomLeft => egui::CursorIcon::ResizeNeSw,
        Anchor::Left | Anchor::Right => egui::CursorIcon::ResizeHorizontal,
        Anchor::Top | Anchor::Bottom => egui::CursorIcon::ResizeVertical,
    }
}

pub struct Canvas {
    texture: Option<egui::TextureHandle>,
    viewport: Viewport,
    widgets: Vec<BoxWidget>,
    active: Option<BoxId>,
    panning: Option<egui::Pos2>,
    cursor: egui::CursorIcon,
    /// Handle grab distance in screen pixels.
    tolerance: f32,
}

impl Canvas {
    pub fn new(zoom: ZoomConfig, tolerance: f32) -> Self {
        Self {
            texture: None,
            viewport: Viewport::new(zoom),
            widgets: Vec::new(),
            active: None,
            panning: None,
            cursor: egui::CursorIcon::Default,
            tolerance,
        }
    }

    pub fn zoom_factor(&self) -> f64 {
        self.viewport.zoom.factor()
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom.zoom_in();
        log::debug!("Zoom {:.2}", self.zoom_factor());
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom.zoom_out();
        log::debug!("Zoom {:.2}", self.zoom_factor());
    }

    /// Show the image under the session cursor, skipping unreadable ones.
    pub fn load_current(&mut self, ctx: &egui::Context, session: &mut AnnotationSession) -> LoadOutcome {
        let max_side = ctx.input(|i| i.max_texture_side);
        let max_side = u32::try_from(max_side).unwrap_or(u32::MAX);
        let (image, skipped) = load_next_loadable(session, |path| media::load_image(path, max_side));
        match image {
            Some(image) => {
                self.install(ctx, session, image);
                LoadOutcome::Loaded { skipped }
            }
            None => {
                self.texture = None;
                self.clear_widgets();
                LoadOutcome::Finished { skipped }
            }
        }
    }

    fn install(&mut self, ctx: &egui::Context, session: &mut AnnotationSession, image: LoadedImage) {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(image.texture_size, &image.pixels);
        self.texture = Some(ctx.load_texture("current_image", color_image, egui::TextureOptions::LINEAR));
        self.viewport.reset(image.width, image.height);
        session.set_image_size(image.width, image.height);
        self.clear_widgets();
        log::info!(
            "{} ({}x{}) {}",
            session.current_image().unwrap_or_default(),
            image.width,
            image.height,
            session.counter_label()
        );
    }

    /// Drop every widget and refit the image, keeping the texture.
    pub fn reset_view(&mut self) {
        self.clear_widgets();
        self.viewport.refit();
    }

    fn clear_widgets(&mut self) {
        self.widgets.clear();
        self.active = None;
        self.panning = None;
    }

    /// Match the widget list to the session's boxes, creating widgets for
    /// new boxes and dropping those whose box is gone.
    pub fn sync_widgets(&mut self, boxes: &[BoundingBox]) {
        let mut old = std::mem::take(&mut self.widgets);
        self.widgets = boxes
            .iter()
            .map(|b| match old.iter().position(|w| w.id() == b.id) {
                Some(i) => {
                    let mut widget = old.swap_remove(i);
                    widget.sync(b.rect);
                    widget
                }
                None => BoxWidget::new(b.id, b.rect),
            })
            .collect();
        if let Some(id) = self.active {
            if !self.widgets.iter().any(|w| w.id() == id) {
                self.active = None;
            }
        }
    }

    fn widget_mut(&mut self, id: BoxId) -> Option<&mut BoxWidget> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Feed one pointer event through the widgets and the viewport.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> CanvasAction {
        let tolerance = self.viewport.screen_to_image_len(self.tolerance);
        match event {
            PointerEvent::Moved(pos) => {
                if self.active.is_some() || self.panning.is_some() {
                    return CanvasAction::None;
                }
                let p = self.viewport.screen_to_image(pos);
                self.cursor = egui::CursorIcon::Default;
                let mut claimed = false;
                // Last drawn is on top, so it gets the pointer first.
                for widget in self.widgets.iter_mut().rev() {
                    if !claimed && widget.hit(p, tolerance) {
                        claimed = true;
                        self.cursor = match widget.hover(p, tolerance) {
                            Some(anchor) => cursor_for(anchor),
                            None => egui::CursorIcon::Grab,
                        };
                    } else {
                        widget.leave();
                    }
                }
            }
            PointerEvent::Left => {
                for widget in &mut self.widgets {
                    widget.leave();
                }
            }
            PointerEvent::Pressed(pos) => {
                let p = self.viewport.screen_to_image(pos);
                let grabbed = self
                    .widgets
                    .iter_mut()
                    .rev()
                    .find_map(|w| w.press(p, tolerance).then(|| (w.id(), w.state())));
                match grabbed {
                    Some((id, state)) => {
                        self.active = Some(id);
                        self.cursor = match state {
                            WidgetState::Resizing(anchor) => cursor_for(anchor),
                            _ => egui::CursorIcon::Grabbing,
                        };
                    }
                    None => {
                        self.panning = Some(pos);
                        self.cursor = egui::CursorIcon::Grabbing;
                    }
                }
            }
            PointerEvent::Dragged(pos) => {
                if let Some(id) = self.active {
                    let p = self.viewport.screen_to_image(pos);
                    if let Some(widget) = self.widget_mut(id) {
                        widget.drag(p);
                    }
                } else if let Some(last) = self.panning {
                    self.viewport.pan_by(pos - last);
                    self.panning = Some(pos);
                }
            }
            PointerEvent::Released => {
                self.panning = None;
                self.cursor = egui::CursorIcon::Default;
                if let Some(id) = self.active.take() {
                    if let Some(rect) = self.widget_mut(id).and_then(|w| w.release()) {
                        return CanvasAction::UpdateBox(id, rect);
                    }
                }
            }
            PointerEvent::Scrolled(delta) => {
                if delta > 0.0 {
                    self.zoom_in();
                } else if delta < 0.0 {
                    self.zoom_out();
                }
            }
        }
        CanvasAction::None
    }

    /// Collect this frame's pointer events from the canvas response.
    fn pointer_events(ui: &egui::Ui, response: &egui::Response) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if response.drag_started() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                events.push(PointerEvent::Pressed(origin));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(PointerEvent::Dragged(pos));
            }
        }
        if response.drag_stopped() {
            events.push(PointerEvent::Released);
        } else if let Some(pos) = response.hover_pos() {
            events.push(PointerEvent::Moved(pos));
        } else {
            events.push(PointerEvent::Left);
        }
        if response.hovered() {
            let delta = ui.input(|i| i.raw_scroll_delta.y);
            if delta != 0.0 {
                events.push(PointerEvent::Scrolled(delta));
            }
        }
        events
    }

    /// Display the canvas and handle mouse interaction.
    pub fn show(&mut self, ui: &mut egui::Ui, session: &AnnotationSession) -> CanvasAction {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        self.viewport.set_area(response.rect);
        painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(40));

        let Some(texture) = &self.texture else {
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                "No image loaded",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(180),
            );
            return CanvasAction::None;
        };
        painter.image(
            texture.id(),
            self.viewport.image_rect(),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        match session.mode() {
            InteractionMode::FreeForm => self.sync_widgets(session.boxes()),
            InteractionMode::Guided => self.sync_widgets(&[]),
        }

        let mut action = CanvasAction::None;
        for event in Self::pointer_events(ui, &response) {
            if let CanvasAction::UpdateBox(id, rect) = self.handle_pointer(event) {
                action = CanvasAction::UpdateBox(id, rect);
            }
        }

        let painter = painter.with_clip_rect(response.rect);
        match session.mode() {
            InteractionMode::FreeForm => {
                for widget in &self.widgets {
                    let Some(b) = session.boxes().iter().find(|b| b.id == widget.id()) else {
                        continue;
                    };
                    self.draw_box(&painter, widget.rect(), b.color, &b.class_label, false);
                    if widget.state() != WidgetState::Idle {
                        self.draw_handles(&painter, widget.rect(), b.color);
                    }
                }
            }
            InteractionMode::Guided => {
                for b in session.boxes() {
                    self.draw_box(&painter, b.rect, b.color, &b.class_label, true);
                }
                let candidate = session.candidate().rect();
                if !candidate.is_empty() {
                    let label = session.classes().selected().unwrap_or_default();
                    self.draw_box(&painter, candidate, session.next_color(), label, true);
                }
            }
        }

        if response.hovered() || self.active.is_some() || self.panning.is_some() {
            ui.ctx().set_cursor_icon(self.cursor);
        }
        action
    }

    fn screen_rect(&self, rect: Rect) -> egui::Rect {
        let r = rect.normalized();
        egui::Rect::from_two_pos(
            self.viewport.image_to_screen(Point::new(r.left(), r.top())),
            self.viewport.image_to_screen(Point::new(r.right(), r.bottom())),
        )
    }

    fn draw_box(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        color: egui::Color32,
        label: &str,
        filled: bool,
    ) {
        let screen = self.screen_rect(rect);
        if filled {
            painter.rect_filled(screen, 0.0, color.gamma_multiply(0.3));
        }
        painter.rect_stroke(screen, 0.0, egui::Stroke::new(2.0, color));
        painter.text(
            screen.left_top() - egui::vec2(0.0, 2.0),
            egui::Align2::LEFT_BOTTOM,
            label,
            egui::FontId::proportional(13.0),
            color,
        );
    }

    fn draw_handles(&self, painter: &egui::Painter, rect: Rect, color: egui::Color32) {
        for anchor in Anchor::ALL {
            let pos = self.viewport.image_to_screen(anchor_point(&rect, anchor));
            painter.rect_filled(
                egui::Rect::from_center_size(pos, egui::vec2(6.0, 6.0)),
                0.0,
                egui::Color32::WHITE,
            );
            painter.rect_stroke(
                egui::Rect::from_center_size(pos, egui::vec2(6.0, 6.0)),
                0.0,
                egui::Stroke::new(1.0, color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::serialization::AnnotationStore;
    use crate::models::annotation::Palette;
    use crate::models::classes::ClassRegistry;
    use crate::models::session::SessionSetup;
    use crate::ui::viewport::ZoomPolicy;

    fn zoom() -> ZoomConfig {
        ZoomConfig {
            policy: ZoomPolicy::Additive { step: 0.1 },
            min: 0.2,
            max: 2.0,
        }
    }

    /// A canvas showing a 200x200 image at 1:1 in a 200x200 area.
    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(zoom(), 5.0);
        canvas.viewport.reset(200, 200);
        canvas
            .viewport
            .set_area(egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 200.0)));
        canvas
    }

    fn session(dir: &Path, images: &[&str]) -> AnnotationSession {
        AnnotationSession::new(SessionSetup {
            folder: dir.to_path_buf(),
            images: images.iter().map(|s| s.to_string()).collect(),
            store: AnnotationStore::open(dir.join("annotations.json")).unwrap(),
            classes: ClassRegistry::new(["car"]),
            palette: Palette::new(vec![egui::Color32::RED]),
            mode: InteractionMode::FreeForm,
            new_box: Rect::new(50.0, 50.0, 100.0, 100.0),
        })
    }

    #[test]
    fn test_unreadable_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"garbage").unwrap();
        image::RgbaImage::new(8, 6).save(dir.path().join("b.png")).unwrap();
        let mut session = session(dir.path(), &["a.png", "b.png"]);

        let (image, skipped) = load_next_loadable(&mut session, |p| media::load_image(p, 2048));
        let image = image.unwrap();
        assert_eq!((image.width, image.height), (8, 6));
        assert_eq!(skipped, vec!["a.png".to_string()]);
        assert_eq!(session.current_image(), Some("b.png"));
        assert_eq!(session.counter_label(), "Image: 2 / 2");
    }

    #[test]
    fn test_all_unreadable_finishes_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"garbage").unwrap();
        let mut session = session(dir.path(), &["a.png", "missing.jpg"]);

        let (image, skipped) = load_next_loadable(&mut session, |p| media::load_image(p, 2048));
        assert!(image.is_none());
        assert_eq!(skipped.len(), 2);
        assert!(session.is_finished());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_resize_gesture_updates_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &["a.png"]);
        let id = session.add().unwrap();
        let mut canvas = canvas();
        canvas.sync_widgets(session.boxes());

        canvas.handle_pointer(PointerEvent::Moved(egui::pos2(150.0, 150.0)));
        assert_eq!(canvas.cursor, egui::CursorIcon::ResizeNwSe);
        canvas.handle_pointer(PointerEvent::Pressed(egui::pos2(150.0, 150.0)));
        canvas.handle_pointer(PointerEvent::Dragged(egui::pos2(170.0, 160.0)));
        canvas.handle_pointer(PointerEvent::Dragged(egui::pos2(180.0, 170.0)));
        let action = canvas.handle_pointer(PointerEvent::Released);

        let expected = Rect::new(50.0, 50.0, 130.0, 120.0);
        assert_eq!(action, CanvasAction::UpdateBox(id, expected));
        if let CanvasAction::UpdateBox(id, rect) = action {
            session.update_box(id, rect);
        }
        session.commit().unwrap();
        assert_eq!(session.store().records()[0].annotations[0].bbox, expected.to_bbox());
    }

    #[test]
    fn test_gesture_maps_through_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &["a.png"]);
        let id = session.add().unwrap();
        let mut canvas = canvas();
        canvas.sync_widgets(session.boxes());
        for _ in 0..10 {
            canvas.handle_pointer(PointerEvent::Scrolled(1.0));
        }
        assert!((canvas.zoom_factor() - 2.0).abs() < 1e-9);

        // Image is now 400x400 centered on (100, 100), so screen (100, 100)
        // is image (100, 100) and one screen pixel is half an image pixel.
        canvas.handle_pointer(PointerEvent::Pressed(egui::pos2(100.0, 100.0)));
        canvas.handle_pointer(PointerEvent::Dragged(egui::pos2(120.0, 110.0)));
        let action = canvas.handle_pointer(PointerEvent::Released);
        assert_eq!(action, CanvasAction::UpdateBox(id, Rect::new(60.0, 55.0, 100.0, 100.0)));
    }

    #[test]
    fn test_press_on_empty_space_pans() {
        let mut canvas = canvas();
        canvas.handle_pointer(PointerEvent::Pressed(egui::pos2(10.0, 10.0)));
        canvas.handle_pointer(PointerEvent::Dragged(egui::pos2(30.0, 25.0)));
        let action = canvas.handle_pointer(PointerEvent::Released);

        assert_eq!(action, CanvasAction::None);
        assert_eq!(canvas.viewport.image_rect().min, egui::pos2(20.0, 15.0));

        canvas.reset_view();
        assert_eq!(canvas.viewport.image_rect().min, egui::pos2(0.0, 0.0));
    }

    #[test]
    fn test_topmost_box_takes_the_press() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &["a.png"]);
        session.add().unwrap();
        let top = session.add().unwrap();
        let mut canvas = canvas();
        canvas.sync_widgets(session.boxes());

        canvas.handle_pointer(PointerEvent::Pressed(egui::pos2(100.0, 100.0)));
        assert_eq!(canvas.active, Some(top));
    }

    #[test]
    fn test_widgets_follow_session_boxes() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), &["a.png"]);
        let first = session.add().unwrap();
        let mut canvas = canvas();
        canvas.sync_widgets(session.boxes());
        assert_eq!(canvas.widgets.len(), 1);

        session.update_box(first, Rect::new(1.0, 2.0, 3.0, 4.0));
        session.add().unwrap();
        canvas.sync_widgets(session.boxes());
        assert_eq!(canvas.widgets.len(), 2);
        assert_eq!(canvas.widgets[0].rect(), Rect::new(1.0, 2.0, 3.0, 4.0));

        session.reset();
        canvas.sync_widgets(session.boxes());
        assert!(canvas.widgets.is_empty());
    }

    #[test]
    fn test_release_without_gesture_is_quiet() {
        let mut canvas = canvas();
        assert_eq!(canvas.handle_pointer(PointerEvent::Released), CanvasAction::None);
        assert_eq!(canvas.handle_pointer(PointerEvent::Left), CanvasAction::None);
    }
}
