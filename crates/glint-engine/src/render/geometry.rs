//! CPU-side tessellation of primitive commands into a solid-color triangle
//! list.
//!
//! All positions are render-space pixels; the vertex shader handles the
//! pixel→NDC conversion.

use bytemuck::{Pod, Zeroable};

use crate::batch::PrimitiveCmd;
use crate::coords::Vec2;
use crate::paint::Color;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct PrimitiveVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl PrimitiveVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PrimitiveVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Appends triangles for `cmd` to `out`.
pub(super) fn tessellate(cmd: &PrimitiveCmd, out: &mut Vec<PrimitiveVertex>) {
    match *cmd {
        PrimitiveCmd::FilledRect { origin, size, color } => {
            push_rect(out, origin, size, color);
        }
        PrimitiveCmd::FilledCircle { center, radius, segments, color } => {
            push_circle(out, center, radius, segments, color);
        }
        PrimitiveCmd::Line { p0, p1, thickness, color } => {
            push_line(out, p0, p1, thickness, color);
        }
    }
}

fn vertex(p: Vec2, color: Color) -> PrimitiveVertex {
    PrimitiveVertex { pos: [p.x, p.y], color: color.to_array() }
}

fn push_quad(out: &mut Vec<PrimitiveVertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) {
    // Two triangles covering the quad a-b-c-d (in perimeter order).
    out.push(vertex(a, color));
    out.push(vertex(b, color));
    out.push(vertex(c, color));
    out.push(vertex(a, color));
    out.push(vertex(c, color));
    out.push(vertex(d, color));
}

fn push_rect(out: &mut Vec<PrimitiveVertex>, origin: Vec2, size: Vec2, color: Color) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let a = origin;
    let b = Vec2::new(origin.x + size.x, origin.y);
    let c = Vec2::new(origin.x + size.x, origin.y + size.y);
    let d = Vec2::new(origin.x, origin.y + size.y);
    push_quad(out, a, b, c, d, color);
}

fn push_circle(out: &mut Vec<PrimitiveVertex>, center: Vec2, radius: f32, segments: u32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    // Fewer than 3 segments cannot enclose area.
    let segments = segments.max(3);
    let step = std::f32::consts::TAU / segments as f32;

    for i in 0..segments {
        let a0 = i as f32 * step;
        let a1 = (i + 1) as f32 * step;
        let p0 = Vec2::new(center.x + radius * a0.cos(), center.y + radius * a0.sin());
        let p1 = Vec2::new(center.x + radius * a1.cos(), center.y + radius * a1.sin());
        out.push(vertex(center, color));
        out.push(vertex(p0, color));
        out.push(vertex(p1, color));
    }
}

fn push_line(out: &mut Vec<PrimitiveVertex>, p0: Vec2, p1: Vec2, thickness: f32, color: Color) {
    let Some(dir) = (p1 - p0).normalized() else {
        // Degenerate segment; nothing to draw.
        return;
    };
    let half = thickness.max(1.0) * 0.5;
    let n = dir.perp() * half;

    push_quad(out, p0 + n, p1 + n, p1 - n, p0 - n, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(verts: &[PrimitiveVertex]) -> Vec<Vec2> {
        verts.iter().map(|v| Vec2::new(v.pos[0], v.pos[1])).collect()
    }

    #[test]
    fn rect_tessellates_to_two_triangles() {
        let mut out = Vec::new();
        push_rect(&mut out, Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), Color::RED);
        assert_eq!(out.len(), 6);

        let ps = positions(&out);
        assert!(ps.contains(&Vec2::new(10.0, 20.0)));
        assert!(ps.contains(&Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn empty_rect_emits_nothing() {
        let mut out = Vec::new();
        push_rect(&mut out, Vec2::zero(), Vec2::new(0.0, 10.0), Color::RED);
        assert!(out.is_empty());
    }

    #[test]
    fn circle_fan_has_three_vertices_per_segment() {
        let mut out = Vec::new();
        push_circle(&mut out, Vec2::new(5.0, 5.0), 2.0, 16, Color::BLUE);
        assert_eq!(out.len(), 16 * 3);
    }

    #[test]
    fn circle_rim_vertices_sit_on_the_radius() {
        let center = Vec2::new(100.0, 50.0);
        let mut out = Vec::new();
        push_circle(&mut out, center, 7.0, 8, Color::BLUE);

        for chunk in out.chunks(3) {
            // First vertex of each triangle is the center; the other two are rim points.
            assert_eq!(Vec2::new(chunk[0].pos[0], chunk[0].pos[1]), center);
            for v in &chunk[1..] {
                let p = Vec2::new(v.pos[0], v.pos[1]);
                assert!(((p - center).length() - 7.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn circle_segment_count_is_clamped() {
        let mut out = Vec::new();
        push_circle(&mut out, Vec2::zero(), 1.0, 1, Color::BLUE);
        assert_eq!(out.len(), 3 * 3);
    }

    #[test]
    fn line_quad_offsets_perpendicular_to_direction() {
        let mut out = Vec::new();
        push_line(&mut out, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, Color::WHITE);
        assert_eq!(out.len(), 6);

        // Horizontal segment of thickness 4 → corners offset ±2 in y.
        let ps = positions(&out);
        assert!(ps.contains(&Vec2::new(0.0, 2.0)));
        assert!(ps.contains(&Vec2::new(0.0, -2.0)));
        assert!(ps.contains(&Vec2::new(10.0, 2.0)));
        assert!(ps.contains(&Vec2::new(10.0, -2.0)));
    }

    #[test]
    fn zero_length_line_emits_nothing() {
        let mut out = Vec::new();
        push_line(&mut out, Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), 2.0, Color::WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn hairline_thickness_is_at_least_one_pixel() {
        let mut out = Vec::new();
        push_line(&mut out, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 0.0, Color::WHITE);
        let ps = positions(&out);
        assert!(ps.contains(&Vec2::new(0.0, 0.5)));
        assert!(ps.contains(&Vec2::new(0.0, -0.5)));
    }
}
