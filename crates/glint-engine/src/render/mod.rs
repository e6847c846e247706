//! Rendering subsystem.
//!
//! [`BatchRenderer`] is the narrow interface the canvas shim drives; it is a
//! trait so lifecycle and translation logic can be tested against recording
//! fakes. [`GpuRenderer`] is the wgpu-backed implementation.
//!
//! Convention:
//! - Append operations take RENDER-SPACE coordinates (bottom-left origin,
//!   +Y up) with colors normalized to `0..=1`.
//! - The canvas layer is the single owner of the screen→render Y-flip.
//!   Implementations must not flip again; the backend's vertex shader maps
//!   render-space pixels straight to NDC with a scale and offset only.

mod geometry;
mod renderer;

pub use renderer::GpuRenderer;

use anyhow::Result;

use crate::coords::Vec2;
use crate::paint::Color;

/// Frame lifecycle plus batch accumulation, as consumed by the canvas shim.
///
/// Expected call order per frame:
/// `begin_frame` → `begin_batch` → (`clear` | appends)* → `end_batch` →
/// `flush_batch` → `end_frame`. Implementations report out-of-order use as
/// errors rather than attempting recovery.
pub trait BatchRenderer {
    /// Starts a new frame (acquires the render target).
    fn begin_frame(&mut self) -> Result<()>;

    /// Finishes the frame and submits recorded GPU work. Presentation is the
    /// window collaborator's job; see `window::PresentWindow::swap_buffers`.
    fn end_frame(&mut self) -> Result<()>;

    /// Establishes the frame's background color. A clear paints over
    /// everything recorded earlier in the frame, so commands already
    /// accumulated in the open batch are discarded.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Opens the per-frame command batch.
    fn begin_batch(&mut self) -> Result<()>;

    /// Closes the command batch.
    fn end_batch(&mut self) -> Result<()>;

    /// Submits the closed batch's commands for drawing, in submission order.
    fn flush_batch(&mut self) -> Result<()>;

    /// Appends a solid rectangle; `origin` is the bottom-left corner.
    fn append_filled_rect(&mut self, origin: Vec2, size: Vec2, color: Color) -> Result<()>;

    /// Appends a solid circle.
    fn append_filled_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
    ) -> Result<()>;

    /// Appends a thick line segment.
    fn append_line(&mut self, p0: Vec2, p1: Vec2, thickness: f32, color: Color) -> Result<()>;
}
