//! Window collaborator.
//!
//! [`PresentWindow`] is the narrow interface the canvas shim consumes:
//! framebuffer size, buffer swap, close/poll queries. [`DesktopWindow`] is the
//! winit-backed implementation, built on the pump-events model so the caller
//! owns the main loop (immediate-mode style) instead of handing control to a
//! callback runtime.

mod desktop;

pub use desktop::DesktopWindow;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            width: 1280,
            height: 720,
            resizable: false,
        }
    }
}

/// Presentation + event-pump surface, as consumed by the canvas shim.
pub trait PresentWindow {
    /// Current framebuffer size in physical pixels. Feeds the viewport.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Presents the most recently submitted frame.
    fn swap_buffers(&mut self) -> Result<()>;

    /// True once the user has requested the window to close.
    fn should_close(&self) -> bool;

    /// Drains pending window-system events.
    fn poll_events(&mut self);

    /// Updates the window title.
    fn set_title(&mut self, title: &str);
}

/// Hand-off slot between renderer submission and window presentation.
///
/// The renderer parks the submitted frame's surface texture here; the window's
/// `swap_buffers` takes and presents it. `Rc<RefCell>` is sound because the
/// whole draw/flip cycle is single-threaded by design; a second producer
/// thread would require a mutex or a channel drained once per frame.
pub(crate) type PresentSlot = Rc<RefCell<Option<wgpu::SurfaceTexture>>>;
