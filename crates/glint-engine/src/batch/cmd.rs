use crate::coords::Vec2;
use crate::paint::Color;

/// A single render-space primitive command.
///
/// Coordinates are renderer-native: origin bottom-left, +Y up. The canvas
/// layer owns the screen→render mapping; nothing downstream of this type may
/// flip Y again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveCmd {
    /// Solid axis-aligned rectangle. `origin` is the bottom-left corner.
    FilledRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Solid circle, tessellated into `segments` fan triangles at flush.
    FilledCircle {
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
    },
    /// Line segment of the given thickness, rendered as an oriented quad.
    Line {
        p0: Vec2,
        p1: Vec2,
        thickness: f32,
        color: Color,
    },
}
