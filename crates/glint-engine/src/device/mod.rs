//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//!
//! Submission and presentation are split: `submit` hands back the surface
//! texture so the window collaborator can own the buffer swap.

mod gpu;

pub use gpu::{AcquiredFrame, Gpu, GpuInit, SurfaceErrorAction};
