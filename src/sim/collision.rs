//! Overlap tests for boxes and circles
//!
//! Everything in the arena is an axis-aligned box except player shots, which
//! are circles tested with radius-expanded edges. Edges touching counts as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, `pos` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Degenerate boxes never collide
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// Check whether two boxes overlap
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.is_solid()
        && b.is_solid()
        && a.right() >= b.left()
        && a.left() <= b.right()
        && a.bottom() >= b.top()
        && a.top() <= b.bottom()
}

/// Check a circle against a box using the circle's bounding edges
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    rect.is_solid()
        && center.y - radius <= rect.bottom()
        && center.y + radius >= rect.top()
        && center.x + radius >= rect.left()
        && center.x - radius <= rect.right()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_rects_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!rects_overlap(&a, &rect(20.0, 0.0, 10.0, 10.0)));
        assert!(!rects_overlap(&a, &rect(0.0, 11.0, 10.0, 10.0)));
    }

    #[test]
    fn test_touching_edges_count() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &rect(10.0, 0.0, 10.0, 10.0)));
        assert!(rects_overlap(&a, &rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_zero_sized_box_is_inert() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &rect(5.0, 5.0, 0.0, 0.0)));
        assert!(!circle_overlaps_rect(Vec2::new(5.0, 5.0), 4.0, &rect(0.0, 0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_circle_overlap_uses_radius() {
        let target = rect(100.0, 100.0, 30.0, 30.0);
        // Center 3 units left of the box, radius 4 reaches it
        assert!(circle_overlaps_rect(Vec2::new(97.0, 115.0), 4.0, &target));
        // Center 5 units below the box, radius 4 falls short
        assert!(!circle_overlaps_rect(Vec2::new(115.0, 135.0), 4.0, &target));
    }
}
