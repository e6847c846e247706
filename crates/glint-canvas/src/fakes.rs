//! Recording fakes for the collaborator traits, shared by lifecycle and
//! translation tests.

use anyhow::{Result, bail};

use glint_engine::coords::Vec2;
use glint_engine::paint::Color;
use glint_engine::render::BatchRenderer;
use glint_engine::window::PresentWindow;

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginFrame,
    EndFrame,
    Clear(Color),
    BeginBatch,
    EndBatch,
    FlushBatch,
    FilledRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    FilledCircle {
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
    },
    Line {
        p0: Vec2,
        p1: Vec2,
        thickness: f32,
        color: Color,
    },
}

impl Call {
    pub fn is_append(&self) -> bool {
        matches!(
            self,
            Call::FilledRect { .. } | Call::FilledCircle { .. } | Call::Line { .. }
        )
    }
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub fail_flush: bool,
}

impl RecordingRenderer {
    /// Recorded append calls only.
    pub fn appends(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.is_append()).collect()
    }

    /// Recorded line appends as `(p0, p1, thickness)` triples.
    pub fn lines(&self) -> Vec<(Vec2, Vec2, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Line { p0, p1, thickness, .. } => Some((*p0, *p1, *thickness)),
                _ => None,
            })
            .collect()
    }
}

impl BatchRenderer for RecordingRenderer {
    fn begin_frame(&mut self) -> Result<()> {
        self.calls.push(Call::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.calls.push(Call::EndFrame);
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(Call::Clear(color));
        Ok(())
    }

    fn begin_batch(&mut self) -> Result<()> {
        self.calls.push(Call::BeginBatch);
        Ok(())
    }

    fn end_batch(&mut self) -> Result<()> {
        self.calls.push(Call::EndBatch);
        Ok(())
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.fail_flush {
            bail!("injected flush failure");
        }
        self.calls.push(Call::FlushBatch);
        Ok(())
    }

    fn append_filled_rect(&mut self, origin: Vec2, size: Vec2, color: Color) -> Result<()> {
        self.calls.push(Call::FilledRect { origin, size, color });
        Ok(())
    }

    fn append_filled_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
    ) -> Result<()> {
        self.calls.push(Call::FilledCircle {
            center,
            radius,
            segments,
            color,
        });
        Ok(())
    }

    fn append_line(&mut self, p0: Vec2, p1: Vec2, thickness: f32, color: Color) -> Result<()> {
        self.calls.push(Call::Line {
            p0,
            p1,
            thickness,
            color,
        });
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeWindow {
    pub size: (u32, u32),
    pub swaps: usize,
    pub closing: bool,
    pub title: String,
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self {
            size: (800, 600),
            swaps: 0,
            closing: false,
            title: String::new(),
        }
    }
}

impl PresentWindow for FakeWindow {
    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.closing
    }

    fn poll_events(&mut self) {}

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}
