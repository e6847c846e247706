//! Immediate-mode draw primitives.
//!
//! Each function translates one screen-space shape into renderer append
//! operations against the currently open batch, mapping coordinates into
//! render space exactly once per primitive. A `stroke_width` of zero (or
//! less) means "filled" where a filled form exists; positive widths decompose
//! the outline into thick line segments, since the renderer's filled
//! primitives cannot express strokes.
//!
//! All functions take the target surface explicitly. Only the screen surface
//! returned by `set_mode` is drawable; anything else reports
//! [`CanvasError::UnsupportedTarget`] without touching the batch.

use std::f32::consts::TAU;

use glint_engine::coords::{Rect, Vec2};
use glint_engine::paint::Color;
use glint_engine::render::BatchRenderer;
use glint_engine::window::PresentWindow;

use crate::context::RenderContext;
use crate::error::CanvasError;
use crate::space;
use crate::surface::Surface;

/// Segment count used by [`circle`] outlines and fills.
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 32;

/// Rectangle, filled (`stroke_width <= 0`) or outlined.
///
/// Outlines trace the four edges as thick lines, each endpoint mapped
/// independently.
pub fn rect<R: BatchRenderer, W: PresentWindow>(
    ctx: &mut RenderContext<R, W>,
    target: &Surface,
    color: Color,
    rect: Rect,
    stroke_width: f32,
) -> Result<(), CanvasError> {
    ctx.guard_active()?;
    ctx.check_target(target)?;
    ctx.ensure_batch_open()?;

    let viewport = ctx.viewport_or_err()?;
    let color = color.clamped();
    let rect = rect.normalized();

    if stroke_width <= 0.0 {
        let mapped = space::map_rect(viewport, rect);
        ctx.renderer
            .append_filled_rect(mapped.origin(), mapped.size(), color)?;
        return Ok(());
    }

    let corners = [
        Vec2::new(rect.left(), rect.near_edge()),
        Vec2::new(rect.right(), rect.near_edge()),
        Vec2::new(rect.right(), rect.far_edge()),
        Vec2::new(rect.left(), rect.far_edge()),
    ];
    for i in 0..corners.len() {
        let p0 = space::map_point(viewport, corners[i]);
        let p1 = space::map_point(viewport, corners[(i + 1) % corners.len()]);
        ctx.renderer.append_line(p0, p1, stroke_width, color)?;
    }
    Ok(())
}

/// Circle with the default segment count.
pub fn circle<R: BatchRenderer, W: PresentWindow>(
    ctx: &mut RenderContext<R, W>,
    target: &Surface,
    color: Color,
    center: Vec2,
    radius: f32,
    stroke_width: f32,
) -> Result<(), CanvasError> {
    circle_with_segments(
        ctx,
        target,
        color,
        center,
        radius,
        stroke_width,
        DEFAULT_CIRCLE_SEGMENTS,
    )
}

/// Circle, filled (`stroke_width <= 0`) or outlined.
///
/// Outlines sample `segments` equally spaced rim points (angle step
/// `2π/segments`) and connect consecutive samples, wrapping last→first. Each
/// endpoint is mapped individually — the filled-circle primitive cannot
/// express an outline, so the shape must already be line segments by the time
/// it reaches the renderer.
pub fn circle_with_segments<R: BatchRenderer, W: PresentWindow>(
    ctx: &mut RenderContext<R, W>,
    target: &Surface,
    color: Color,
    center: Vec2,
    radius: f32,
    stroke_width: f32,
    segments: u32,
) -> Result<(), CanvasError> {
    ctx.guard_active()?;
    ctx.check_target(target)?;
    ctx.ensure_batch_open()?;

    let viewport = ctx.viewport_or_err()?;
    let color = color.clamped();
    let segments = segments.max(3);

    if stroke_width <= 0.0 {
        ctx.renderer.append_filled_circle(
            space::map_point(viewport, center),
            radius,
            segments,
            color,
        )?;
        return Ok(());
    }

    let step = TAU / segments as f32;
    for i in 0..segments {
        let a0 = i as f32 * step;
        let a1 = (i + 1) as f32 * step;
        let s0 = Vec2::new(center.x + radius * a0.cos(), center.y + radius * a0.sin());
        let s1 = Vec2::new(center.x + radius * a1.cos(), center.y + radius * a1.sin());
        ctx.renderer.append_line(
            space::map_point(viewport, s0),
            space::map_point(viewport, s1),
            stroke_width,
            color,
        )?;
    }
    Ok(())
}

/// Line segment of the given thickness.
pub fn line<R: BatchRenderer, W: PresentWindow>(
    ctx: &mut RenderContext<R, W>,
    target: &Surface,
    color: Color,
    p0: Vec2,
    p1: Vec2,
    thickness: f32,
) -> Result<(), CanvasError> {
    ctx.guard_active()?;
    ctx.check_target(target)?;
    ctx.ensure_batch_open()?;

    let viewport = ctx.viewport_or_err()?;
    ctx.renderer.append_line(
        space::map_point(viewport, p0),
        space::map_point(viewport, p1),
        thickness,
        color.clamped(),
    )?;
    Ok(())
}

/// Polygon outline: connects each point to its successor, wrapping
/// last→first.
///
/// Filled polygons are a known limitation: `stroke_width <= 0` reports
/// [`CanvasError::UnsupportedPolygonFill`] rather than approximating the
/// fill. Fewer than two points is a no-op (no edge to draw).
pub fn polygon<R: BatchRenderer, W: PresentWindow>(
    ctx: &mut RenderContext<R, W>,
    target: &Surface,
    color: Color,
    points: &[Vec2],
    stroke_width: f32,
) -> Result<(), CanvasError> {
    ctx.guard_active()?;
    ctx.check_target(target)?;
    if stroke_width <= 0.0 {
        return Err(CanvasError::UnsupportedPolygonFill);
    }
    if points.len() < 2 {
        return Ok(());
    }
    ctx.ensure_batch_open()?;

    let viewport = ctx.viewport_or_err()?;
    let color = color.clamped();

    for i in 0..points.len() {
        let p0 = space::map_point(viewport, points[i]);
        let p1 = space::map_point(viewport, points[(i + 1) % points.len()]);
        ctx.renderer.append_line(p0, p1, stroke_width, color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderContext;
    use crate::fakes::{Call, FakeWindow, RecordingRenderer};
    use glint_engine::coords::Viewport;

    const EPS: f32 = 1e-6;

    fn active() -> (RenderContext<RecordingRenderer, FakeWindow>, Surface) {
        let mut ctx = RenderContext::new(RecordingRenderer::default(), FakeWindow::default());
        let screen = ctx.set_mode((800, 600)).unwrap();
        (ctx, screen)
    }

    fn close(a: Vec2, b: Vec2, eps: f32) -> bool {
        (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
    }

    // ── rect ──────────────────────────────────────────────────────────────

    #[test]
    fn filled_rect_appends_once_with_mapped_origin() {
        let (mut ctx, screen) = active();
        rect(
            &mut ctx,
            &screen,
            Color::RED,
            Rect::new(100.0, 50.0, 200.0, 80.0),
            0.0,
        )
        .unwrap();

        let appends = ctx.renderer().appends();
        assert_eq!(appends.len(), 1);
        assert_eq!(
            *appends[0],
            Call::FilledRect {
                origin: Vec2::new(100.0, 470.0),
                size: Vec2::new(200.0, 80.0),
                color: Color::RED,
            }
        );
    }

    #[test]
    fn negative_extent_rect_is_normalized_before_mapping() {
        let (mut ctx, screen) = active();
        // Same rect as above, specified from the opposite corner.
        rect(
            &mut ctx,
            &screen,
            Color::RED,
            Rect::new(300.0, 130.0, -200.0, -80.0),
            0.0,
        )
        .unwrap();

        assert_eq!(
            *ctx.renderer().appends()[0],
            Call::FilledRect {
                origin: Vec2::new(100.0, 470.0),
                size: Vec2::new(200.0, 80.0),
                color: Color::RED,
            }
        );
    }

    #[test]
    fn stroked_rect_decomposes_into_four_edges() {
        let (mut ctx, screen) = active();
        let r = Rect::new(100.0, 50.0, 200.0, 80.0);
        rect(&mut ctx, &screen, Color::WHITE, r, 3.0).unwrap();

        let lines = ctx.renderer().lines();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|(_, _, t)| *t == 3.0));

        // Re-mapping the stroke endpoints back to screen space reconstructs
        // the rectangle's four corners exactly.
        let viewport = Viewport::new(800, 600);
        let expected = [
            Vec2::new(100.0, 50.0),
            Vec2::new(300.0, 50.0),
            Vec2::new(300.0, 130.0),
            Vec2::new(100.0, 130.0),
        ];
        for corner in expected {
            let hits = lines
                .iter()
                .flat_map(|(p0, p1, _)| [*p0, *p1])
                .filter(|p| close(space::map_point(viewport, *p), corner, EPS))
                .count();
            // Each corner is shared by exactly two edges.
            assert_eq!(hits, 2, "corner {corner:?} not reconstructed");
        }
    }

    // ── circle ────────────────────────────────────────────────────────────

    #[test]
    fn filled_circle_maps_center_only() {
        let (mut ctx, screen) = active();
        circle(&mut ctx, &screen, Color::BLUE, Vec2::new(400.0, 100.0), 50.0, 0.0).unwrap();

        assert_eq!(
            *ctx.renderer().appends()[0],
            Call::FilledCircle {
                center: Vec2::new(400.0, 500.0),
                radius: 50.0,
                segments: DEFAULT_CIRCLE_SEGMENTS,
                color: Color::BLUE,
            }
        );
    }

    #[test]
    fn circle_outline_emits_one_line_per_segment() {
        let (mut ctx, screen) = active();
        let center = Vec2::new(400.0, 300.0);
        circle_with_segments(&mut ctx, &screen, Color::WHITE, center, 50.0, 2.0, 16).unwrap();

        let lines = ctx.renderer().lines();
        assert_eq!(lines.len(), 16);

        // Each start point is a rim sample at angle i·2π/16, mapped with
        // y' = 600 − y.
        let step = TAU / 16.0;
        for (i, (p0, _, thickness)) in lines.iter().enumerate() {
            let angle = i as f32 * step;
            let sample = Vec2::new(400.0 + 50.0 * angle.cos(), 300.0 + 50.0 * angle.sin());
            let expected = Vec2::new(sample.x, 600.0 - sample.y);
            assert!(close(*p0, expected, 1e-3), "segment {i}: {p0:?} vs {expected:?}");
            assert_eq!(*thickness, 2.0);
        }

        // Wrap-around: the last segment ends where the first began.
        let first_start = lines[0].0;
        let last_end = lines[15].1;
        assert!(close(first_start, last_end, 1e-3));
    }

    // ── line ──────────────────────────────────────────────────────────────

    #[test]
    fn line_maps_both_endpoints() {
        let (mut ctx, screen) = active();
        line(
            &mut ctx,
            &screen,
            Color::GREEN,
            Vec2::new(10.0, 20.0),
            Vec2::new(30.0, 40.0),
            1.0,
        )
        .unwrap();

        assert_eq!(
            ctx.renderer().lines(),
            vec![(Vec2::new(10.0, 580.0), Vec2::new(30.0, 560.0), 1.0)]
        );
    }

    // ── polygon ───────────────────────────────────────────────────────────

    #[test]
    fn polygon_connects_points_with_wraparound() {
        let (mut ctx, screen) = active();
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 100.0),
        ];
        polygon(&mut ctx, &screen, Color::WHITE, &points, 2.0).unwrap();

        let lines = ctx.renderer().lines();
        assert_eq!(lines.len(), 3);
        // Closing edge runs from the last point back to the first.
        assert_eq!(lines[2].0, Vec2::new(50.0, 500.0));
        assert_eq!(lines[2].1, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn polygon_fill_is_reported_unsupported() {
        let (mut ctx, screen) = active();
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0)];
        let err = polygon(&mut ctx, &screen, Color::WHITE, &points, 0.0).unwrap_err();
        assert!(matches!(err, CanvasError::UnsupportedPolygonFill));
        assert!(ctx.renderer().appends().is_empty());
    }

    #[test]
    fn degenerate_polygon_is_a_noop() {
        let (mut ctx, screen) = active();
        polygon(&mut ctx, &screen, Color::WHITE, &[Vec2::new(1.0, 1.0)], 2.0).unwrap();
        assert!(ctx.renderer().appends().is_empty());
    }

    // ── guards ────────────────────────────────────────────────────────────

    #[test]
    fn draw_before_set_mode_performs_no_renderer_calls() {
        let mut ctx = RenderContext::new(RecordingRenderer::default(), FakeWindow::default());
        let stray = Surface::offscreen(800, 600);

        let err = rect(&mut ctx, &stray, Color::RED, Rect::new(0.0, 0.0, 1.0, 1.0), 0.0)
            .unwrap_err();
        assert!(matches!(err, CanvasError::NotInitialized));
        assert!(ctx.renderer().calls.is_empty());
    }

    #[test]
    fn offscreen_target_is_reported_not_drawn() {
        let (mut ctx, _screen) = active();
        let offscreen = Surface::offscreen(64, 64);

        let err = circle(&mut ctx, &offscreen, Color::RED, Vec2::new(5.0, 5.0), 2.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, CanvasError::UnsupportedTarget));

        // The open batch is untouched: still just the set_mode call pair.
        assert_eq!(
            ctx.renderer().calls,
            vec![Call::BeginFrame, Call::BeginBatch]
        );
    }

    #[test]
    fn draw_lazily_reopens_a_closed_batch() {
        let (mut ctx, screen) = active();
        ctx.batch = glint_engine::batch::BatchState::Closed;

        line(
            &mut ctx,
            &screen,
            Color::WHITE,
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            1.0,
        )
        .unwrap();

        let calls = &ctx.renderer().calls;
        // set_mode pair, then the lazy reopen, then the append.
        assert_eq!(calls[2], Call::BeginBatch);
        assert!(calls[3].is_append());
    }
}
