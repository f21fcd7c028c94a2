// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive overlay for one bounding box.
//!
//! A widget only renders a box and tracks the pointer gesture on it. The
//! session owns the box geometry; the widget reports a finished gesture
//! through the rectangle returned by [`BoxWidget::release`], which the
//! canvas forwards as an update.

use crate::models::annotation::BoxId;
use crate::util::geometry::{hit_test, resize, Anchor, Point, Rect};

/// Gesture state of a box widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetState {
    Idle,
    /// Pointer over a handle; a press here starts a resize.
    Hovering(Anchor),
    /// Handle locked until the pointer is released.
    Resizing(Anchor),
    /// Body grabbed; `last` is the previous pointer position.
    Moving { last: Point },
}

#[derive(Debug, Clone)]
pub struct BoxWidget {
    id: BoxId,
    rect: Rect,
    state: WidgetState,
}

impl BoxWidget {
    pub fn new(id: BoxId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            state: WidgetState::Idle,
        }
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Geometry as currently drawn, possibly mid-gesture.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// A resize or move is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, WidgetState::Resizing(_) | WidgetState::Moving { .. })
    }

    /// Take the session's geometry, unless a gesture owns the rectangle.
    pub fn sync(&mut self, rect: Rect) {
        if !self.is_active() {
            self.rect = rect;
        }
    }

    /// Whether `p` would grab this widget (handle or body).
    pub fn hit(&self, p: Point, tolerance: f64) -> bool {
        self.rect.contains(p, tolerance)
    }

    /// Update hover feedback. Returns the handle under the pointer.
    pub fn hover(&mut self, p: Point, tolerance: f64) -> Option<Anchor> {
        if self.is_active() {
            return None;
        }
        let anchor = hit_test(&self.rect, p, tolerance);
        self.state = match anchor {
            Some(anchor) => WidgetState::Hovering(anchor),
            None => WidgetState::Idle,
        };
        anchor
    }

    /// Clear hover feedback when the pointer is elsewhere.
    pub fn leave(&mut self) {
        if let WidgetState::Hovering(_) = self.state {
            self.state = WidgetState::Idle;
        }
    }

    /// Start a gesture. Near a handle this locks a resize, inside the body
    /// it starts a move. Returns `false` when `p` misses the widget.
    pub fn press(&mut self, p: Point, tolerance: f64) -> bool {
        if let Some(anchor) = hit_test(&self.rect, p, tolerance) {
            self.state = WidgetState::Resizing(anchor);
            true
        } else if self.rect.contains(p, 0.0) {
            self.state = WidgetState::Moving { last: p };
            true
        } else {
            false
        }
    }

    /// Follow the pointer during a gesture.
    pub fn drag(&mut self, p: Point) {
        match self.state {
            WidgetState::Resizing(anchor) => {
                self.rect = resize(&self.rect, anchor, p);
            }
            WidgetState::Moving { last } => {
                self.rect = self.rect.translated(p.x - last.x, p.y - last.y);
                self.state = WidgetState::Moving { last: p };
            }
            WidgetState::Idle | WidgetState::Hovering(_) => {}
        }
    }

    /// End the gesture and return the normalized geometry to store.
    ///
    /// `None` if no gesture was in progress.
    pub fn release(&mut self) -> Option<Rect> {
        if !self.is_active() {
            return None;
        }
        self.state = WidgetState::Idle;
        self.rect = self.rect.normalized();
        Some(self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> BoxWidget {
        BoxWidget::new(1, Rect::new(50.0, 50.0, 100.0, 100.0))
    }

    #[test]
    fn test_hover_sets_pending_anchor() {
        let mut w = widget();
        assert_eq!(w.hover(Point::new(150.0, 150.0), 5.0), Some(Anchor::BottomRight));
        assert_eq!(w.state(), WidgetState::Hovering(Anchor::BottomRight));

        assert_eq!(w.hover(Point::new(100.0, 100.0), 5.0), None);
        assert_eq!(w.state(), WidgetState::Idle);
    }

    #[test]
    fn test_resize_gesture_reports_on_release() {
        let mut w = widget();
        assert!(w.press(Point::new(149.0, 149.0), 5.0));
        assert_eq!(w.state(), WidgetState::Resizing(Anchor::BottomRight));

        w.drag(Point::new(180.0, 120.0));
        w.drag(Point::new(200.0, 130.0));
        assert_eq!(w.rect(), Rect::new(50.0, 50.0, 150.0, 80.0));

        assert_eq!(w.release(), Some(Rect::new(50.0, 50.0, 150.0, 80.0)));
        assert_eq!(w.state(), WidgetState::Idle);
        assert_eq!(w.release(), None);
    }

    #[test]
    fn test_release_normalizes_inverted_box() {
        let mut w = widget();
        w.press(Point::new(50.0, 100.0), 5.0);
        assert_eq!(w.state(), WidgetState::Resizing(Anchor::Left));
        w.drag(Point::new(180.0, 90.0));
        assert!(w.rect().width < 0.0);

        assert_eq!(w.release(), Some(Rect::new(150.0, 50.0, 30.0, 100.0)));
    }

    #[test]
    fn test_body_press_moves() {
        let mut w = widget();
        assert!(w.press(Point::new(100.0, 100.0), 5.0));
        assert!(matches!(w.state(), WidgetState::Moving { .. }));

        w.drag(Point::new(110.0, 95.0));
        w.drag(Point::new(120.0, 90.0));
        assert_eq!(w.release(), Some(Rect::new(70.0, 40.0, 100.0, 100.0)));
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut w = widget();
        assert!(!w.press(Point::new(300.0, 300.0), 5.0));
        assert_eq!(w.state(), WidgetState::Idle);
        w.drag(Point::new(310.0, 310.0));
        assert_eq!(w.rect(), Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_sync_waits_for_gesture_end() {
        let mut w = widget();
        w.press(Point::new(100.0, 100.0), 5.0);
        w.sync(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(w.rect(), Rect::new(50.0, 50.0, 100.0, 100.0));

        w.release();
        w.sync(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(w.rect(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_hover_ignored_while_resizing() {
        let mut w = widget();
        w.press(Point::new(50.0, 50.0), 5.0);
        assert_eq!(w.hover(Point::new(100.0, 100.0), 5.0), None);
        assert_eq!(w.state(), WidgetState::Resizing(Anchor::TopLeft));
        w.leave();
        assert_eq!(w.state(), WidgetState::Resizing(Anchor::TopLeft));
    }
}
