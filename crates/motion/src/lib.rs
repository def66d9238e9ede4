//! Input-to-uniform state pipeline for marchview.
//!
//! Discrete, asynchronous input events are folded into persistent tracker
//! state, which the renderer samples exactly once per frame and writes into
//! the shader's uniform set:
//!
//! ```text
//!   key/pointer/wheel events ──▶ InputBus ──▶ trackers   (event-driven)
//!                                               │
//!                              FrameSample ◀────┘         (once per frame)
//!                                   │
//!                                   ▼
//!             FrameSampler ──▶ MotionUniforms ──▶ GPU uniform buffer
//! ```
//!
//! Trackers own their state exclusively and hook into the host's event loop
//! through an explicit activate/deactivate lifecycle on [`InputBus`], so a
//! torn-down rendering surface never leaks callbacks. Everything is
//! single-threaded by construction (`Rc<RefCell<…>>`), matching the
//! cooperative scheduling of a winit event loop: input dispatch and frame
//! sampling can never interleave.

mod bus;
mod keys;
mod pointer;
mod sampler;
mod wheel;

pub use bus::{EventKind, InputBus, InputEvent, ListenerId};
pub use keys::{KeyBindings, KeyMoveState, KeyTracker};
pub use pointer::{DragDelta, PointerTracker};
pub use sampler::{FrameContext, FrameSample, FrameSampler, MotionScales, MotionUniforms};
pub use wheel::WheelTracker;
