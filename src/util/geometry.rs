// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle geometry for bounding boxes.
//!
//! All values are in image-pixel coordinates. A [`Rect`] is stored as an
//! origin plus a size; during a resize gesture the size may go negative
//! when a handle is dragged past the opposite edge; [`Rect::normalized`]
//! turns it back into a top-left origin with non-negative extent.

/// A 2D point in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: origin `(x, y)` and size `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a normalized rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left origin with non-negative width and height.
    pub fn normalized(&self) -> Self {
        Self::from_corners(
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.bottom()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Whether `p` lies inside the rectangle grown by `margin` on every side.
    pub fn contains(&self, p: Point, margin: f64) -> bool {
        let r = self.normalized();
        p.x >= r.left() - margin
            && p.x <= r.right() + margin
            && p.y >= r.top() - margin
            && p.y <= r.bottom() + margin
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// `[x, y, width, height]`, the persisted bbox layout.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn from_bbox(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }
}

/// One of the eight resize handles on a rectangle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
    ];

    /// The handle that stays fixed while this one is dragged.
    pub fn opposite(self) -> Anchor {
        match self {
            Anchor::TopLeft => Anchor::BottomRight,
            Anchor::TopRight => Anchor::BottomLeft,
            Anchor::BottomLeft => Anchor::TopRight,
            Anchor::BottomRight => Anchor::TopLeft,
            Anchor::Top => Anchor::Bottom,
            Anchor::Bottom => Anchor::Top,
            Anchor::Left => Anchor::Right,
            Anchor::Right => Anchor::Left,
        }
    }
}

/// Position of `anchor` on `rect`. Edge anchors sit at the edge midpoint.
pub fn anchor_point(rect: &Rect, anchor: Anchor) -> Point {
    let mid_x = rect.x + rect.width / 2.0;
    let mid_y = rect.y + rect.height / 2.0;
    match anchor {
        Anchor::TopLeft => Point::new(rect.left(), rect.top()),
        Anchor::TopRight => Point::new(rect.right(), rect.top()),
        Anchor::BottomLeft => Point::new(rect.left(), rect.bottom()),
        Anchor::BottomRight => Point::new(rect.right(), rect.bottom()),
        Anchor::Top => Point::new(mid_x, rect.top()),
        Anchor::Bottom => Point::new(mid_x, rect.bottom()),
        Anchor::Left => Point::new(rect.left(), mid_y),
        Anchor::Right => Point::new(rect.right(), mid_y),
    }
}

/// Classify `p` against the handles of `rect`.
///
/// Corners are checked before edges, so a point near a corner always grabs
/// the corner. Returns `None` for points in the body (a move) or outside the
/// rectangle grown by `tolerance`.
pub fn hit_test(rect: &Rect, p: Point, tolerance: f64) -> Option<Anchor> {
    if !rect.contains(p, tolerance) {
        return None;
    }

    let near = |a: f64, b: f64| (a - b).abs() < tolerance;
    let left = near(p.x, rect.left());
    let right = near(p.x, rect.right());
    let top = near(p.y, rect.top());
    let bottom = near(p.y, rect.bottom());

    if left && top {
        Some(Anchor::TopLeft)
    } else if right && top {
        Some(Anchor::TopRight)
    } else if left && bottom {
        Some(Anchor::BottomLeft)
    } else if right && bottom {
        Some(Anchor::BottomRight)
    } else if left {
        Some(Anchor::Left)
    } else if right {
        Some(Anchor::Right)
    } else if top {
        Some(Anchor::Top)
    } else if bottom {
        Some(Anchor::Bottom)
    } else {
        None
    }
}

/// Move `anchor` of `rect` to `p`, keeping the opposite anchor fixed.
///
/// The result is not normalized.
pub fn resize(rect: &Rect, anchor: Anchor, p: Point) -> Rect {
    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    match anchor {
        Anchor::TopLeft => Rect::new(p.x, p.y, right - p.x, bottom - p.y),
        Anchor::TopRight => Rect::new(left, p.y, p.x - left, bottom - p.y),
        Anchor::BottomLeft => Rect::new(p.x, top, right - p.x, p.y - top),
        Anchor::BottomRight => Rect::new(left, top, p.x - left, p.y - top),
        Anchor::Left => Rect::new(p.x, top, right - p.x, rect.height),
        Anchor::Right => Rect::new(left, top, p.x - left, rect.height),
        Anchor::Top => Rect::new(left, p.y, rect.width, bottom - p.y),
        Anchor::Bottom => Rect::new(left, top, rect.width, p.y - top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_resize_keeps_opposite_anchor_fixed() {
        let rects = [
            Rect::new(50.0, 50.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(12.5, 300.0, 640.0, 20.0),
        ];
        let targets = [
            Point::new(10.0, 10.0),
            Point::new(500.0, 400.0),
            Point::new(75.0, 60.0),
            // Past the opposite edge, which inverts the rectangle.
            Point::new(-40.0, 900.0),
        ];

        for rect in &rects {
            for anchor in Anchor::ALL {
                for target in targets {
                    let fixed = anchor_point(rect, anchor.opposite());
                    let resized = resize(rect, anchor, target);
                    assert!(
                        close(anchor_point(&resized, anchor.opposite()), fixed),
                        "{:?} moved the opposite anchor of {:?}",
                        anchor,
                        rect
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_resize_lands_on_pointer() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        let resized = resize(&rect, Anchor::BottomRight, Point::new(200.0, 120.0));
        assert_eq!(resized, Rect::new(50.0, 50.0, 150.0, 70.0));
    }

    #[test]
    fn test_drag_past_edge_inverts_until_normalized() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        let resized = resize(&rect, Anchor::Left, Point::new(170.0, 80.0));
        assert_eq!(resized.width, -20.0);

        let normalized = resized.normalized();
        assert_eq!(normalized, Rect::new(150.0, 50.0, 20.0, 100.0));
    }

    #[test]
    fn test_hit_test_prefers_corners() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(hit_test(&rect, Point::new(52.0, 53.0), 5.0), Some(Anchor::TopLeft));
        assert_eq!(hit_test(&rect, Point::new(148.0, 149.0), 5.0), Some(Anchor::BottomRight));
        assert_eq!(hit_test(&rect, Point::new(151.0, 52.0), 5.0), Some(Anchor::TopRight));
        assert_eq!(hit_test(&rect, Point::new(49.0, 147.0), 5.0), Some(Anchor::BottomLeft));
    }

    #[test]
    fn test_hit_test_edges_and_body() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(hit_test(&rect, Point::new(100.0, 52.0), 5.0), Some(Anchor::Top));
        assert_eq!(hit_test(&rect, Point::new(100.0, 148.0), 5.0), Some(Anchor::Bottom));
        assert_eq!(hit_test(&rect, Point::new(53.0, 100.0), 5.0), Some(Anchor::Left));
        assert_eq!(hit_test(&rect, Point::new(147.0, 100.0), 5.0), Some(Anchor::Right));
        assert_eq!(hit_test(&rect, Point::new(100.0, 100.0), 5.0), None);
    }

    #[test]
    fn test_hit_test_ignores_points_far_outside() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        // Lined up with the left edge but well below the box.
        assert_eq!(hit_test(&rect, Point::new(50.0, 400.0), 5.0), None);
        assert_eq!(hit_test(&rect, Point::new(44.0, 100.0), 5.0), None);
    }

    #[test]
    fn test_from_corners_normalizes() {
        let rect = Rect::from_corners(Point::new(30.0, 5.0), Point::new(10.0, 25.0));
        assert_eq!(rect, Rect::new(10.0, 5.0, 20.0, 20.0));
        assert_eq!(rect.to_bbox(), [10.0, 5.0, 20.0, 20.0]);
    }
}
