//! Screen→render coordinate mapping.
//!
//! Screen space puts the origin top-left with +Y down; render space puts it
//! bottom-left with +Y up. Only the Y axis and the anchor corner change, so
//! the mapping is an involution: applying it twice with the same viewport
//! returns the input.
//!
//! The mapping must run exactly once per primitive, at translation time, with
//! the viewport current at that instant. Never store pre-mapped coordinates —
//! a cached value silently goes stale on the next mode change, and mapping it
//! again flips the scene upside down.

use glint_engine::coords::{Rect, Vec2, Viewport};

/// Maps a screen-space point into render space.
#[inline]
pub fn map_point(viewport: Viewport, p: Vec2) -> Vec2 {
    Vec2::new(p.x, viewport.height_f() - p.y)
}

/// Maps a screen-space rectangle (origin = top-left corner) into render space
/// (origin = bottom-left corner). Width and height are unchanged.
#[inline]
pub fn map_rect(viewport: Viewport, r: Rect) -> Rect {
    Rect::new(r.x, viewport.height_f() - r.y - r.h, r.w, r.h)
}
