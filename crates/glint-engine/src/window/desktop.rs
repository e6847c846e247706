use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Window, WindowId};

use super::{PresentSlot, PresentWindow, WindowConfig};

/// winit-backed window using the pump-events model.
///
/// Unlike a `run_app`-style runtime, the event loop never takes over the
/// thread: [`PresentWindow::poll_events`] pumps it with a zero timeout, so the
/// application keeps a classic `while !should_close()` main loop.
pub struct DesktopWindow {
    event_loop: EventLoop<()>,
    driver: Driver,
    window: Arc<Window>,
    present: PresentSlot,
}

/// `ApplicationHandler` state driven by the pumps.
struct Driver {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    close_requested: bool,
}

impl ApplicationHandler for Driver {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ))
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.close_requested = true;
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close_requested = true;
            }
            _ => {}
        }
    }
}

impl DesktopWindow {
    /// Creates the event loop and pumps it until the window exists.
    pub fn new(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit event loop")?;
        let mut driver = Driver {
            config,
            window: None,
            close_requested: false,
        };

        // The first pump delivers `resumed`, which creates the window.
        let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut driver);

        let window = driver
            .window
            .clone()
            .context("event loop did not deliver a window")?;

        Ok(Self {
            event_loop,
            driver,
            window,
            present: PresentSlot::default(),
        })
    }

    fn pump(&mut self) {
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.driver);
    }

    /// Window handle for surface creation. The `Arc` keeps the window alive
    /// for as long as the GPU surface needs it.
    pub(crate) fn winit_window(&self) -> Arc<Window> {
        self.window.clone()
    }

    /// Shared slot the renderer parks submitted frames in.
    pub(crate) fn present_slot(&self) -> PresentSlot {
        self.present.clone()
    }
}

impl PresentWindow for DesktopWindow {
    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        match self.present.borrow_mut().take() {
            Some(texture) => {
                self.window.pre_present_notify();
                texture.present();
                Ok(())
            }
            None => {
                // Nothing was submitted since the last swap; presenting
                // nothing keeps the previous frame on screen.
                log::warn!("swap_buffers called with no submitted frame");
                Ok(())
            }
        }
    }

    fn should_close(&self) -> bool {
        self.driver.close_requested
    }

    fn poll_events(&mut self) {
        self.pump();
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}
