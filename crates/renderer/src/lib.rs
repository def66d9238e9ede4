//! Renderer surface for marchview.
//!
//! Owns the window, the wgpu fullscreen-triangle pipeline, and the per-frame
//! invocation hook. The overall flow is:
//!
//! ```text
//!   CLI (marchview)
//!          │ ViewerConfig
//!          ▼
//!   window::run ──▶ winit event loop ──▶ InputBus ──▶ trackers
//!                          │
//!                          └─▶ RedrawRequested ──▶ FrameSampler ──▶ GPU UBO
//! ```
//!
//! The renderer never interprets input itself: raw window events are handed
//! to the `motion` pipeline, which the redraw handler samples exactly once
//! per frame into the shader's uniform set. The fragment shader is an opaque
//! artifact compiled through naga's GLSL frontend; the only contract between
//! the two sides is the `SceneParams` uniform block.

mod clock;
mod compile;
mod gpu;
mod types;
mod window;

pub use clock::{SystemTimeSource, TimeSample, TimeSource};
pub use types::ViewerConfig;
pub use window::run;
