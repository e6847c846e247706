use glint_engine::batch::BatchState;
use glint_engine::coords::Viewport;
use glint_engine::paint::Color;
use glint_engine::render::BatchRenderer;
use glint_engine::window::PresentWindow;

use crate::error::CanvasError;
use crate::surface::{Surface, SurfaceId};

/// Lifecycle phase of a [`RenderContext`].
///
/// `Active` means "frame open and (normally) batch open" — the only steady
/// state during rendering. The batch sub-state is tracked separately so the
/// lazy `Closed → Open` transition is observable on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active,
    Shutdown,
}

/// Frame/batch lifecycle controller and viewport registry.
///
/// Owns the two collaborators (batched renderer + window), the viewport, and
/// the active-target identity. Created by the main loop and passed by
/// reference to every draw call; this replaces the hidden global state a
/// module-level API would need, while keeping single-writer semantics.
///
/// Call order per frame is `fill_screen` / draws, then [`flip`]. `flip`
/// closes and flushes the batch, ends the frame, swaps buffers, and
/// immediately opens the next frame and batch, so the context returns to
/// `Active` with an open batch — calling it with zero draws is legal and
/// flushes an empty batch.
///
/// [`flip`]: RenderContext::flip
pub struct RenderContext<R, W> {
    pub(crate) renderer: R,
    pub(crate) window: W,
    pub(crate) phase: Phase,
    pub(crate) batch: BatchState,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) active_target: Option<SurfaceId>,
    screen: Option<Surface>,
    pub(crate) warned_offscreen_target: bool,
}

impl<R: BatchRenderer, W: PresentWindow> RenderContext<R, W> {
    pub fn new(renderer: R, window: W) -> Self {
        Self {
            renderer,
            window,
            phase: Phase::Uninitialized,
            batch: BatchState::Closed,
            viewport: None,
            active_target: None,
            screen: None,
            warned_offscreen_target: false,
        }
    }

    /// Initializes the display: records the viewport from the window's
    /// framebuffer, begins the first frame and batch, and returns the screen
    /// surface.
    ///
    /// Valid once per context. A second call is a caller error and is
    /// reported, not corrected.
    pub fn set_mode(&mut self, size: (u32, u32)) -> Result<Surface, CanvasError> {
        match self.phase {
            Phase::Active => return Err(CanvasError::AlreadyInitialized),
            Phase::Shutdown => return Err(CanvasError::ShutDown),
            Phase::Uninitialized => {}
        }

        let (fb_w, fb_h) = self.window.framebuffer_size();
        let viewport = Viewport::new(fb_w, fb_h);
        if !viewport.is_valid() {
            return Err(CanvasError::Backend(anyhow::anyhow!(
                "window reported an empty framebuffer ({fb_w}x{fb_h})"
            )));
        }

        self.renderer.begin_frame()?;
        self.renderer.begin_batch()?;

        let screen = Surface::screen(size.0, size.1);
        self.viewport = Some(viewport);
        self.active_target = Some(screen.id());
        self.screen = Some(screen.clone());
        self.phase = Phase::Active;
        self.batch = BatchState::Open;

        log::info!(
            "display mode set: {}x{} (framebuffer {fb_w}x{fb_h})",
            size.0,
            size.1
        );
        Ok(screen)
    }

    /// Presents the frame: ends and flushes the batch (primitives submit in
    /// draw-call order), ends the frame, swaps buffers, then immediately
    /// begins the next frame and batch.
    ///
    /// State-neutral on success. On a submission failure the batch is lost
    /// and the context shuts down; there is no partial-batch recovery.
    pub fn flip(&mut self) -> Result<(), CanvasError> {
        self.guard_active()?;

        if let Err(e) = self.close_and_submit() {
            self.abandon();
            return Err(e);
        }
        if let Err(e) = self.reopen() {
            self.abandon();
            return Err(e);
        }
        Ok(())
    }

    /// Establishes the background color for the current frame.
    ///
    /// A fill paints over everything drawn earlier in the frame; the renderer
    /// discards commands already accumulated in the open batch.
    pub fn fill_screen(&mut self, color: Color) -> Result<(), CanvasError> {
        self.guard_active()?;
        self.renderer.clear(color.clamped())?;
        Ok(())
    }

    /// Shuts the context down, releasing the viewport, batch, and
    /// render-target references. Idempotent. All subsequent draw/flip/fill
    /// calls report [`CanvasError::ShutDown`].
    pub fn quit(&mut self) {
        if self.phase == Phase::Shutdown {
            return;
        }
        log::debug!("render context shut down");
        self.release();
    }

    // ── observers ─────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn batch_state(&self) -> BatchState {
        self.batch
    }

    /// Viewport recorded at `set_mode`; `None` outside `Active`.
    #[inline]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The active screen surface; `None` outside `Active`.
    #[inline]
    pub fn screen(&self) -> Option<&Surface> {
        self.screen.as_ref()
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn window(&self) -> &W {
        &self.window
    }

    #[inline]
    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    // ── lifecycle internals ───────────────────────────────────────────────

    /// Explicit `BatchClosed → BatchOpen` transition.
    ///
    /// Draw calls use this to lazily reopen the batch instead of failing; in
    /// the steady state (batch already open) it is a no-op. Public so the
    /// transition can be exercised independently of any primitive.
    pub fn ensure_batch_open(&mut self) -> Result<(), CanvasError> {
        self.guard_active()?;
        if self.batch == BatchState::Open {
            return Ok(());
        }
        self.renderer.begin_batch()?;
        self.batch = BatchState::Open;
        Ok(())
    }

    pub(crate) fn guard_active(&self) -> Result<(), CanvasError> {
        match self.phase {
            Phase::Uninitialized => Err(CanvasError::NotInitialized),
            Phase::Shutdown => Err(CanvasError::ShutDown),
            Phase::Active => Ok(()),
        }
    }

    /// Identity check against the active render target.
    pub(crate) fn check_target(&mut self, surface: &Surface) -> Result<(), CanvasError> {
        if self.active_target == Some(surface.id()) {
            return Ok(());
        }
        if !self.warned_offscreen_target {
            log::warn!("drawing to a non-active surface is unsupported; call skipped");
            self.warned_offscreen_target = true;
        }
        Err(CanvasError::UnsupportedTarget)
    }

    pub(crate) fn viewport_or_err(&self) -> Result<Viewport, CanvasError> {
        self.viewport.ok_or(CanvasError::NotInitialized)
    }

    fn close_and_submit(&mut self) -> Result<(), CanvasError> {
        self.renderer.end_batch()?;
        self.batch = BatchState::Closed;
        self.renderer.flush_batch()?;
        self.renderer.end_frame()?;
        self.window.swap_buffers()?;
        Ok(())
    }

    fn reopen(&mut self) -> Result<(), CanvasError> {
        self.renderer.begin_frame()?;
        self.renderer.begin_batch()?;
        self.batch = BatchState::Open;
        Ok(())
    }

    /// A failed submission leaves the batch unrecoverable; masking it risks
    /// writing into a destroyed render target, so the context shuts down.
    fn abandon(&mut self) {
        log::error!("frame submission failed; shutting the render context down");
        self.release();
    }

    fn release(&mut self) {
        self.phase = Phase::Shutdown;
        self.batch = BatchState::Closed;
        self.viewport = None;
        self.active_target = None;
        self.screen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Call, FakeWindow, RecordingRenderer};

    fn fresh() -> RenderContext<RecordingRenderer, FakeWindow> {
        RenderContext::new(RecordingRenderer::default(), FakeWindow::default())
    }

    fn active() -> RenderContext<RecordingRenderer, FakeWindow> {
        let mut ctx = fresh();
        ctx.set_mode((800, 600)).unwrap();
        ctx
    }

    #[test]
    fn set_mode_opens_frame_and_batch() {
        let ctx = active();
        assert_eq!(ctx.phase(), Phase::Active);
        assert_eq!(ctx.batch_state(), BatchState::Open);
        assert_eq!(ctx.viewport(), Some(Viewport::new(800, 600)));
        assert_eq!(ctx.screen().unwrap().size(), (800, 600));
        assert_eq!(
            ctx.renderer().calls,
            vec![Call::BeginFrame, Call::BeginBatch]
        );
    }

    #[test]
    fn set_mode_twice_is_a_caller_error() {
        let mut ctx = active();
        let err = ctx.set_mode((800, 600)).unwrap_err();
        assert!(matches!(err, CanvasError::AlreadyInitialized));
        // State untouched, no extra renderer calls.
        assert_eq!(ctx.phase(), Phase::Active);
        assert_eq!(ctx.renderer().calls.len(), 2);
    }

    #[test]
    fn set_mode_rejects_empty_framebuffer() {
        let mut ctx = RenderContext::new(
            RecordingRenderer::default(),
            FakeWindow { size: (0, 0), ..FakeWindow::default() },
        );
        let err = ctx.set_mode((800, 600)).unwrap_err();
        assert!(matches!(err, CanvasError::Backend(_)));
        assert_eq!(ctx.phase(), Phase::Uninitialized);
        assert!(ctx.renderer().calls.is_empty());
    }

    #[test]
    fn flip_before_set_mode_is_a_sequencing_error() {
        let mut ctx = fresh();
        assert!(matches!(ctx.flip(), Err(CanvasError::NotInitialized)));
        assert!(ctx.renderer().calls.is_empty());
        assert_eq!(ctx.window().swaps, 0);
    }

    #[test]
    fn empty_flip_swaps_once_and_stays_active() {
        let mut ctx = active();
        ctx.flip().unwrap();

        assert_eq!(ctx.window().swaps, 1);
        assert_eq!(ctx.phase(), Phase::Active);
        assert_eq!(ctx.batch_state(), BatchState::Open);
        assert_eq!(
            ctx.renderer().calls,
            vec![
                Call::BeginFrame,
                Call::BeginBatch,
                Call::EndBatch,
                Call::FlushBatch,
                Call::EndFrame,
                Call::BeginFrame,
                Call::BeginBatch,
            ]
        );
    }

    #[test]
    fn two_empty_flips_flush_two_empty_batches() {
        let mut ctx = active();
        ctx.flip().unwrap();
        ctx.flip().unwrap();

        assert_eq!(ctx.window().swaps, 2);
        let flushes = ctx
            .renderer()
            .calls
            .iter()
            .filter(|c| **c == Call::FlushBatch)
            .count();
        assert_eq!(flushes, 2);
        // No appends ever happened, so both flushed batches were empty.
        assert!(ctx.renderer().appends().is_empty());
    }

    #[test]
    fn fill_screen_forwards_clear() {
        let mut ctx = active();
        let color = Color::from_rgb_u8(10, 20, 30);
        ctx.fill_screen(color).unwrap();
        assert_eq!(ctx.renderer().calls.last(), Some(&Call::Clear(color)));
    }

    #[test]
    fn fill_screen_before_set_mode_errors_without_renderer_calls() {
        let mut ctx = fresh();
        assert!(matches!(
            ctx.fill_screen(Color::BLACK),
            Err(CanvasError::NotInitialized)
        ));
        assert!(ctx.renderer().calls.is_empty());
    }

    #[test]
    fn quit_releases_everything() {
        let mut ctx = active();
        ctx.quit();

        assert_eq!(ctx.phase(), Phase::Shutdown);
        assert_eq!(ctx.batch_state(), BatchState::Closed);
        assert!(ctx.viewport().is_none());
        assert!(ctx.screen().is_none());
    }

    #[test]
    fn operations_after_quit_are_usage_errors() {
        let mut ctx = active();
        ctx.quit();

        assert!(matches!(ctx.flip(), Err(CanvasError::ShutDown)));
        assert!(matches!(
            ctx.fill_screen(Color::BLACK),
            Err(CanvasError::ShutDown)
        ));
        assert!(matches!(
            ctx.set_mode((800, 600)),
            Err(CanvasError::ShutDown)
        ));
    }

    #[test]
    fn quit_is_idempotent() {
        let mut ctx = active();
        ctx.quit();
        ctx.quit();
        assert_eq!(ctx.phase(), Phase::Shutdown);
    }

    #[test]
    fn flush_failure_shuts_the_context_down() {
        let mut ctx = active();
        ctx.renderer.fail_flush = true;

        let err = ctx.flip().unwrap_err();
        assert!(matches!(err, CanvasError::Backend(_)));
        assert_eq!(ctx.phase(), Phase::Shutdown);
        // The lost batch is not resumed; later calls report shutdown.
        assert!(matches!(ctx.flip(), Err(CanvasError::ShutDown)));
    }

    #[test]
    fn ensure_batch_open_transitions_closed_to_open() {
        let mut ctx = active();
        ctx.batch = BatchState::Closed;

        ctx.ensure_batch_open().unwrap();
        assert_eq!(ctx.batch_state(), BatchState::Open);
        assert_eq!(ctx.renderer().calls.last(), Some(&Call::BeginBatch));
    }

    #[test]
    fn ensure_batch_open_is_a_noop_when_open() {
        let mut ctx = active();
        let calls_before = ctx.renderer().calls.len();
        ctx.ensure_batch_open().unwrap();
        assert_eq!(ctx.renderer().calls.len(), calls_before);
    }
}
