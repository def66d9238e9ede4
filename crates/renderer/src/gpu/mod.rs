//! GPU plumbing behind the viewer window.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `uniforms` mirrors the shader's std140 uniform block and converts the
//!   motion pipeline's running values at the f64 -> f32 boundary.
//! - `state` compiles the fullscreen-triangle pipeline and exposes the
//!   `GpuState` API used by `window`.

mod context;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
