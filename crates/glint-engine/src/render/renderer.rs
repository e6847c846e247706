use anyhow::{Context, Result, bail};
use bytemuck::{Pod, Zeroable};

use crate::batch::{BatchStats, PrimitiveBatch, PrimitiveCmd};
use crate::coords::Vec2;
use crate::device::{AcquiredFrame, Gpu, GpuInit, SurfaceErrorAction};
use crate::paint::Color;
use crate::window::{DesktopWindow, PresentSlot};

use super::BatchRenderer;
use super::geometry::{PrimitiveVertex, tessellate};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

/// wgpu-backed batch renderer.
///
/// Accumulated primitive commands are tessellated CPU-side into one
/// solid-color triangle list and drawn in a single render pass per flush.
/// Commands arrive in render space (bottom-left origin, +Y up); the vertex
/// shader converts pixels to NDC without flipping Y — the canvas layer has
/// already done the one permitted flip.
pub struct GpuRenderer {
    gpu: Gpu,
    batch: PrimitiveBatch,
    frame: Option<AcquiredFrame>,
    present: PresentSlot,

    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    clear_color: Color,
    background_applied: bool,

    scratch_cmds: Vec<PrimitiveCmd>,
    scratch_verts: Vec<PrimitiveVertex>,
}

impl GpuRenderer {
    /// Creates the GPU context and primitive pipeline for `window`.
    ///
    /// Blocks on adapter/device acquisition; call from the main thread during
    /// startup.
    pub fn new(window: &DesktopWindow, init: GpuInit) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window.winit_window(), init))
            .context("renderer initialization failed")?;

        let shader = gpu
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("glint primitive shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("shaders/primitive.wgsl").into(),
                ),
            });

        let bind_group_layout =
            gpu.device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("glint primitive bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<ViewportUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            gpu.device()
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("glint primitive pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = gpu
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("glint primitive pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[PrimitiveVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.surface_format(),
                        blend: Some(straight_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        let viewport_ubo = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint primitive bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        Ok(Self {
            gpu,
            batch: PrimitiveBatch::new(),
            frame: None,
            present: window.present_slot(),
            pipeline,
            bind_group,
            viewport_ubo,
            vertex_vbo: None,
            vertex_capacity: 0,
            clear_color: Color::BLACK,
            background_applied: false,
            scratch_cmds: Vec::new(),
            scratch_verts: Vec::new(),
        })
    }

    /// Flush statistics accumulated since startup (or the last reset).
    pub fn stats(&self) -> BatchStats {
        self.batch.stats()
    }

    pub fn reset_stats(&mut self) {
        self.batch.reset_stats();
    }

    fn ensure_vertex_capacity(&mut self, needed: usize) {
        if needed == 0 || (self.vertex_capacity >= needed && self.vertex_vbo.is_some()) {
            return;
        }

        let capacity = needed.next_power_of_two().max(1024);
        self.vertex_vbo = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint primitive vbo"),
            size: (capacity * std::mem::size_of::<PrimitiveVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = capacity;
    }
}

impl BatchRenderer for GpuRenderer {
    fn begin_frame(&mut self) -> Result<()> {
        if self.frame.is_some() {
            bail!("begin_frame called while a frame is in flight");
        }

        let mut attempts = 0;
        let frame = loop {
            match self.gpu.acquire_frame() {
                Ok(frame) => break frame,
                Err(err) => {
                    attempts += 1;
                    log::warn!("surface acquire failed: {err}");
                    let action = self.gpu.handle_surface_error(err);
                    if action == SurfaceErrorAction::Fatal {
                        bail!("fatal surface error while acquiring frame");
                    }
                    if attempts > 1 {
                        bail!("failed to acquire frame after surface reconfigure");
                    }
                }
            }
        };

        self.frame = Some(frame);
        self.background_applied = false;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if self.batch.is_open() {
            bail!("end_frame called while the batch is still open");
        }
        let Some(frame) = self.frame.take() else {
            bail!("end_frame called with no frame in flight");
        };

        let texture = self.gpu.submit(frame);
        let previous = self.present.borrow_mut().replace(texture);
        if previous.is_some() {
            log::warn!("previous frame was never presented; dropping it");
        }
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.clear_color = color.clamped();

        // A full-screen fill paints over everything recorded before it; those
        // commands can never be visible.
        if self.batch.is_open() && !self.batch.is_empty() {
            log::debug!(
                "clear after draws discards {} queued primitives",
                self.batch.len()
            );
            self.batch.discard_pending();
        }
        Ok(())
    }

    fn begin_batch(&mut self) -> Result<()> {
        self.batch.begin()?;
        Ok(())
    }

    fn end_batch(&mut self) -> Result<()> {
        self.batch.end()?;
        Ok(())
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.frame.is_none() {
            bail!("flush_batch called with no frame in flight");
        }

        let mut cmds = std::mem::take(&mut self.scratch_cmds);
        if let Err(err) = self.batch.flush_into(&mut cmds) {
            self.scratch_cmds = cmds;
            return Err(err.into());
        }

        let mut verts = std::mem::take(&mut self.scratch_verts);
        verts.clear();
        for cmd in &cmds {
            tessellate(cmd, &mut verts);
        }

        self.ensure_vertex_capacity(verts.len());

        let size = self.gpu.size();
        let uniform = ViewportUniform {
            size: [size.width as f32, size.height as f32],
            _pad: [0.0; 2],
        };
        self.gpu
            .queue()
            .write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&uniform));

        if !verts.is_empty() {
            if let Some(vbo) = self.vertex_vbo.as_ref() {
                self.gpu
                    .queue()
                    .write_buffer(vbo, 0, bytemuck::cast_slice(&verts));
            }
        }

        // The first pass of the frame establishes the background.
        let load = if self.background_applied {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(to_wgpu_color(self.clear_color))
        };

        let Some(frame) = self.frame.as_mut() else {
            bail!("flush_batch called with no frame in flight");
        };

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glint primitive pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !verts.is_empty() {
                if let Some(vbo) = self.vertex_vbo.as_ref() {
                    rpass.set_pipeline(&self.pipeline);
                    rpass.set_bind_group(0, &self.bind_group, &[]);
                    rpass.set_vertex_buffer(0, vbo.slice(..));
                    rpass.draw(0..verts.len() as u32, 0..1);
                }
            }
        }

        self.background_applied = true;
        self.scratch_cmds = cmds;
        self.scratch_verts = verts;
        Ok(())
    }

    fn append_filled_rect(&mut self, origin: Vec2, size: Vec2, color: Color) -> Result<()> {
        self.batch
            .append(PrimitiveCmd::FilledRect { origin, size, color })?;
        Ok(())
    }

    fn append_filled_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
    ) -> Result<()> {
        self.batch.append(PrimitiveCmd::FilledCircle {
            center,
            radius,
            segments,
            color,
        })?;
        Ok(())
    }

    fn append_line(&mut self, p0: Vec2, p1: Vec2, thickness: f32, color: Color) -> Result<()> {
        self.batch.append(PrimitiveCmd::Line {
            p0,
            p1,
            thickness,
            color,
        })?;
        Ok(())
    }
}

fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn to_wgpu_color(c: Color) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}
