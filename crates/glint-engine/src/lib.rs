//! Glint engine crate.
//!
//! This crate owns the renderer side of the stack: geometry and color value
//! types, the render-space primitive batch, the collaborator traits consumed
//! by the `glint-canvas` shim, and the wgpu/winit backend implementing them.

pub mod device;
pub mod window;
pub mod time;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod batch;
pub mod render;
