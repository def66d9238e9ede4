use std::borrow::Cow;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use motion::{
    FrameContext, FrameSample, FrameSampler, InputBus, InputEvent, KeyBindings, KeyTracker,
    PointerTracker, WheelTracker,
};
use tracing::{error, info, trace};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::clock::{SystemTimeSource, TimeSource};
use crate::compile::DEFAULT_FRAGMENT;
use crate::gpu::GpuState;
use crate::types::ViewerConfig;

/// Pixels represented by one wheel line, for devices that report scroll in
/// lines rather than pixels. Keeps one detent roughly in the range the
/// wheel divisor was tuned against.
const WHEEL_LINE_PIXELS: f64 = 100.0;

/// Aggregates the window, optional GPU state, and the input pipeline.
///
/// `gpu` stays `None` until the event loop delivers `Resumed`, so redraws
/// that arrive earlier are sampled against a missing uniform set and
/// skipped silently.
struct ViewerState {
    window: Arc<Window>,
    gpu: Option<GpuState>,
    fragment_source: Cow<'static, str>,
    bus: InputBus,
    keys: KeyTracker,
    pointer: PointerTracker,
    wheel: WheelTracker,
    sampler: FrameSampler,
    clock: SystemTimeSource,
    cursor: Option<PhysicalPosition<f64>>,
}

impl ViewerState {
    fn new(window: Arc<Window>, fragment_source: Cow<'static, str>, config: &ViewerConfig) -> Self {
        let mut bus = InputBus::new();
        let mut keys = KeyTracker::new(KeyBindings::default());
        let mut pointer = PointerTracker::new();
        let mut wheel = WheelTracker::new();
        keys.activate(&mut bus);
        pointer.activate(&mut bus);
        wheel.activate(&mut bus);

        Self {
            window,
            gpu: None,
            fragment_source,
            bus,
            keys,
            pointer,
            wheel,
            sampler: FrameSampler::new(config.scales),
            clock: SystemTimeSource::new(),
            cursor: None,
        }
    }

    fn initialise_gpu(&mut self) -> Result<()> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let gpu = GpuState::new(
            self.window.as_ref(),
            self.window.inner_size(),
            &self.fragment_source,
        )?;
        info!("GPU resources initialised");
        self.gpu = Some(gpu);
        self.clock.reset();
        Ok(())
    }

    /// Samples the trackers into the uniform set and draws one frame.
    ///
    /// Before the GPU exists this is a silent skip; the pipeline recovers on
    /// the first redraw after initialisation.
    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = self.gpu.as_mut() else {
            trace!("gpu not initialised; skipping frame sample");
            return Ok(());
        };

        let time = self.clock.sample();
        let size = gpu.size();
        let sample = FrameSample::capture(
            FrameContext {
                seconds: time.seconds,
                frame_index: time.frame_index,
                width: size.width,
                height: size.height,
            },
            &self.keys,
            &self.pointer,
            &self.wheel,
        );
        self.sampler.sample(&sample, Some(gpu.motion_mut()));

        gpu.render()
    }

    fn detach_input(&mut self) {
        self.keys.deactivate(&mut self.bus);
        self.pointer.deactivate(&mut self.bus);
        self.wheel.deactivate(&mut self.bus);
    }
}

/// Opens the viewer window and runs its event loop until the user closes it.
pub fn run(config: ViewerConfig) -> Result<()> {
    let fragment_source = load_fragment_source(&config)?;

    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window_size = PhysicalSize::new(
        config.surface_size.0.max(1),
        config.surface_size.1.max(1),
    );
    let window = WindowBuilder::new()
        .with_title("marchview")
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create viewer window: {err}"))?;
    let window = Arc::new(window);

    let mut state = ViewerState::new(window, fragment_source, &config);

    let failure: Rc<RefCell<Option<anyhow::Error>>> = Rc::new(RefCell::new(None));
    let failure_slot = Rc::clone(&failure);

    event_loop
        .run(move |event, elwt| match event {
            Event::Resumed => {
                if let Err(err) = state.initialise_gpu() {
                    error!("failed to initialise GPU state: {err:?}");
                    *failure_slot.borrow_mut() = Some(err);
                    elwt.exit();
                } else {
                    state.window.request_redraw();
                }
            }
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        elwt.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed
                            && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                        {
                            elwt.exit();
                            return;
                        }
                        if let PhysicalKey::Code(code) = event.physical_key {
                            let input = match event.state {
                                ElementState::Pressed => InputEvent::KeyDown(code),
                                ElementState::Released => InputEvent::KeyUp(code),
                            };
                            state.bus.dispatch(&input);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        state.cursor = Some(position);
                        state.bus.dispatch(&InputEvent::PointerMove {
                            x: position.x,
                            y: position.y,
                        });
                    }
                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    } => match button_state {
                        ElementState::Pressed => {
                            if let Some(position) = state.cursor {
                                state.bus.dispatch(&InputEvent::PointerDown {
                                    x: position.x,
                                    y: position.y,
                                });
                            }
                        }
                        ElementState::Released => {
                            state.bus.dispatch(&InputEvent::PointerUp);
                        }
                    },
                    WindowEvent::MouseWheel { delta, .. } => {
                        // winit reports scroll-up as positive; browsers (where
                        // the divisor constants come from) report it negative.
                        let delta_y = match delta {
                            MouseScrollDelta::LineDelta(_, lines) => {
                                -f64::from(lines) * WHEEL_LINE_PIXELS
                            }
                            MouseScrollDelta::PixelDelta(position) => -position.y,
                        };
                        state.bus.dispatch(&InputEvent::Wheel { delta_y });
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Some(gpu) = state.gpu.as_mut() {
                            gpu.resize(new_size);
                        }
                    }
                    WindowEvent::RedrawRequested => match state.render_frame() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            if let Some(gpu) = state.gpu.as_mut() {
                                let size = gpu.size();
                                gpu.resize(size);
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("surface out of memory; exiting viewer");
                            elwt.exit();
                        }
                        Err(err) => {
                            trace!(?err, "surface error; retrying next frame");
                        }
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                state.window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            }
            Event::LoopExiting => {
                state.detach_input();
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    let failure = failure.borrow_mut().take();
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn load_fragment_source(config: &ViewerConfig) -> Result<Cow<'static, str>> {
    match &config.shader_source {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read shader at {}", path.display()))?;
            info!(shader = %path.display(), "loaded fragment shader");
            Ok(Cow::Owned(source))
        }
        None => Ok(Cow::Borrowed(DEFAULT_FRAGMENT)),
    }
}
