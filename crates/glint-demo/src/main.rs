//! Bouncing-ball demo exercising the whole stack end to end: window, GPU
//! batch renderer, and the immediate-mode canvas facade on top.
//!
//! Close the window to exit.

use anyhow::Result;

use glint_canvas::{RenderContext, draw};
use glint_engine::coords::{Rect, Vec2};
use glint_engine::device::GpuInit;
use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::paint::Color;
use glint_engine::render::GpuRenderer;
use glint_engine::time::Clock;
use glint_engine::window::{DesktopWindow, PresentWindow, WindowConfig};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;
const BALL_COUNT: usize = 24;
const WALL_MARGIN: f32 = 20.0;

struct Ball {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    color: Color,
}

impl Ball {
    fn update(&mut self, dt: f32) {
        self.pos = self.pos + self.vel * dt;

        let min_x = WALL_MARGIN + self.radius;
        let max_x = WIDTH as f32 - WALL_MARGIN - self.radius;
        let min_y = WALL_MARGIN + self.radius;
        let max_y = HEIGHT as f32 - WALL_MARGIN - self.radius;

        if self.pos.x <= min_x {
            self.pos.x = min_x;
            self.vel.x = -self.vel.x;
        } else if self.pos.x >= max_x {
            self.pos.x = max_x;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y <= min_y {
            self.pos.y = min_y;
            self.vel.y = -self.vel.y;
        } else if self.pos.y >= max_y {
            self.pos.y = max_y;
            self.vel.y = -self.vel.y;
        }
    }
}

/// Deterministic ball field: positions on a jittered grid, velocities and
/// colors derived from the index. No RNG needed for a demo scene.
fn seed_balls() -> Vec<Ball> {
    (0..BALL_COUNT)
        .map(|i| {
            let f = i as f32;
            let col = (i % 6) as f32;
            let row = (i / 6) as f32;
            let angle = f * 2.399963; // golden angle, spreads directions evenly
            let speed = 140.0 + 60.0 * ((f * 0.37).sin() * 0.5 + 0.5);

            Ball {
                pos: Vec2::new(150.0 + col * 180.0, 120.0 + row * 160.0),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius: 12.0 + 10.0 * ((f * 0.61).cos() * 0.5 + 0.5),
                color: Color::new(
                    0.35 + 0.65 * ((f * 0.83).sin() * 0.5 + 0.5),
                    0.35 + 0.65 * ((f * 1.31).sin() * 0.5 + 0.5),
                    0.35 + 0.65 * ((f * 1.97).sin() * 0.5 + 0.5),
                    1.0,
                ),
            }
        })
        .collect()
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let window = DesktopWindow::new(WindowConfig {
        title: "glint — bouncing balls".to_string(),
        width: WIDTH,
        height: HEIGHT,
        resizable: false,
    })?;
    let renderer = GpuRenderer::new(&window, GpuInit::default())?;

    let mut ctx = RenderContext::new(renderer, window);
    let screen = ctx.set_mode((WIDTH, HEIGHT))?;

    let mut balls = seed_balls();
    let mut clock = Clock::new();
    let mut title_timer = 0.0f32;

    let background = Color::from_rgb_u8(26, 26, 38);
    let wall_color = Color::from_rgb_u8(90, 95, 120);

    while !ctx.window().should_close() {
        ctx.window_mut().poll_events();

        let dt = clock.tick(120) / 1000.0;
        for ball in &mut balls {
            ball.update(dt);
        }

        ctx.fill_screen(background)?;

        // Arena walls.
        draw::rect(
            &mut ctx,
            &screen,
            wall_color,
            Rect::new(
                WALL_MARGIN,
                WALL_MARGIN,
                WIDTH as f32 - 2.0 * WALL_MARGIN,
                HEIGHT as f32 - 2.0 * WALL_MARGIN,
            ),
            3.0,
        )?;

        for ball in &balls {
            draw::circle(&mut ctx, &screen, ball.color, ball.pos, ball.radius, 0.0)?;
        }

        ctx.flip()?;

        title_timer += dt;
        if title_timer >= 1.0 {
            title_timer = 0.0;
            let stats = ctx.renderer().stats();
            ctx.window_mut().set_title(&format!(
                "glint — bouncing balls | {:.0} fps | {} batches flushed",
                clock.fps(),
                stats.batches_flushed,
            ));
        }
    }

    let stats = ctx.renderer().stats();
    log::info!(
        "exiting: {} batches flushed, {} primitives",
        stats.batches_flushed,
        stats.primitives_flushed
    );
    ctx.quit();
    Ok(())
}
