//! Geometry types shared between the canvas shim and the renderer backend.
//!
//! Two coordinate conventions flow through these types:
//! - Screen space: origin top-left, +X right, +Y down (pixel convention).
//!   This is what user-facing draw calls speak.
//! - Render space: origin bottom-left, +X right, +Y up (renderer-native).
//!   This is what the batch accumulator and the GPU backend speak.
//!
//! The types themselves are convention-agnostic; the canvas layer performs the
//! screen→render mapping exactly once per primitive.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
