use serde::Deserialize;

use crate::keys::{KeyMoveState, KeyTracker};
use crate::pointer::{DragDelta, PointerTracker};
use crate::wheel::WheelTracker;

/// Named scaling constants at the uniform-contract boundary.
///
/// These map raw input units (pixels, wheel deltas, key holds) into
/// shader-space units and are the only tunables in the pipeline; the
/// settings file can override them per session.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MotionScales {
    /// Divisor applied to the wheel total before it reaches the shader.
    pub wheel_divisor: f64,
    /// Horizontal divisor for the drag delta integrated each frame.
    pub pointer_divisor_x: f64,
    /// Vertical divisor for the drag delta integrated each frame.
    pub pointer_divisor_y: f64,
    /// Distance added per frame per held movement key.
    pub key_step: f64,
}

impl Default for MotionScales {
    fn default() -> Self {
        Self {
            wheel_divisor: 40.0,
            pointer_divisor_x: 200.0,
            pointer_divisor_y: 400.0,
            key_step: 0.1,
        }
    }
}

/// Per-frame clock and drawable-size readings supplied by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Monotonic elapsed seconds since the session started.
    pub seconds: f64,
    /// Frame counter for the running session.
    pub frame_index: u64,
    /// Drawable width in physical pixels.
    pub width: u32,
    /// Drawable height in physical pixels.
    pub height: u32,
}

/// Ephemeral read of every tracker taken once per rendered frame.
///
/// Exists only for the duration of one uniform update; nothing here is
/// persisted between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    pub context: FrameContext,
    pub keys: KeyMoveState,
    pub drag: DragDelta,
    pub wheel_total: f64,
}

impl FrameSample {
    /// Snapshots all three trackers together with the frame context.
    pub fn capture(
        context: FrameContext,
        keys: &KeyTracker,
        pointer: &PointerTracker,
        wheel: &WheelTracker,
    ) -> Self {
        Self {
            context,
            keys: keys.read(),
            drag: pointer.delta(),
            wheel_total: wheel.total(),
        }
    }
}

/// The pipeline's write surface: the running uniform values owned by the
/// renderer.
///
/// `time`, `resolution`, and `wheel` are snapshots of external truth and are
/// overwritten every frame. `pointer` and `movement` are displacement that
/// compounds across frames; they are kept in f64 because they grow without
/// bound over a session and only drop to f32 at the GPU boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionUniforms {
    pub time: f32,
    pub resolution: [f32; 2],
    pub wheel: f32,
    pub pointer: [f64; 2],
    pub movement: [f64; 2],
}

/// Folds one [`FrameSample`] into the uniform set, once per rendered frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSampler {
    scales: MotionScales,
}

impl FrameSampler {
    pub fn new(scales: MotionScales) -> Self {
        Self { scales }
    }

    pub fn scales(&self) -> &MotionScales {
        &self.scales
    }

    /// Writes the sample into the uniform set and returns `true`.
    ///
    /// A `None` target means the renderer's GPU resources do not exist yet;
    /// the frame is skipped silently with no integration, so a held key
    /// during start-up contributes nothing until the first real frame.
    ///
    /// Write order and semantics:
    /// 1. elapsed time, verbatim;
    /// 2. drawable size, verbatim;
    /// 3. wheel total / `wheel_divisor`, full overwrite;
    /// 4. drag delta / pointer divisors, added to the running pointer value;
    /// 5. key intent x `key_step`, added to the running movement value.
    ///
    /// Released inputs produce zero increments: accumulated motion freezes
    /// where it is rather than decaying back toward the origin.
    pub fn sample(&self, sample: &FrameSample, target: Option<&mut MotionUniforms>) -> bool {
        let Some(uniforms) = target else {
            tracing::trace!(
                frame = sample.context.frame_index,
                "uniform set unavailable; skipping frame sample"
            );
            return false;
        };

        uniforms.time = sample.context.seconds as f32;
        uniforms.resolution = [sample.context.width as f32, sample.context.height as f32];
        uniforms.wheel = (sample.wheel_total / self.scales.wheel_divisor) as f32;

        uniforms.pointer[0] += sample.drag.x / self.scales.pointer_divisor_x;
        uniforms.pointer[1] += sample.drag.y / self.scales.pointer_divisor_y;

        let (intent_x, intent_y) = sample.keys.intent();
        uniforms.movement[0] += intent_x * self.scales.key_step;
        uniforms.movement[1] += intent_y * self.scales.key_step;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(frame_index: u64) -> FrameContext {
        FrameContext {
            seconds: frame_index as f64 / 60.0,
            frame_index,
            width: 800,
            height: 450,
        }
    }

    fn idle_sample(frame_index: u64) -> FrameSample {
        FrameSample {
            context: context(frame_index),
            keys: KeyMoveState::default(),
            drag: DragDelta::default(),
            wheel_total: 0.0,
        }
    }

    #[test]
    fn missing_target_skips_without_integrating() {
        let sampler = FrameSampler::default();
        let mut sample = idle_sample(0);
        sample.keys.right = true;

        assert!(!sampler.sample(&sample, None));

        // Once the target exists the very next invocation performs all
        // writes, including exactly one key-step increment.
        let mut uniforms = MotionUniforms::default();
        sample.context = context(1);
        assert!(sampler.sample(&sample, Some(&mut uniforms)));
        assert_eq!(uniforms.resolution, [800.0, 450.0]);
        assert!((uniforms.movement[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn time_and_resolution_are_written_verbatim() {
        let sampler = FrameSampler::default();
        let mut uniforms = MotionUniforms::default();

        let mut sample = idle_sample(7);
        sample.context.seconds = 12.5;
        sampler.sample(&sample, Some(&mut uniforms));

        assert_eq!(uniforms.time, 12.5);
        assert_eq!(uniforms.resolution, [800.0, 450.0]);
    }

    #[test]
    fn wheel_uniform_is_an_overwrite_independent_of_frame_count() {
        let sampler = FrameSampler::default();
        let mut uniforms = MotionUniforms::default();

        let mut sample = idle_sample(0);
        sample.wheel_total = 120.0;

        // Many frames between wheel events must not compound the value.
        for frame in 0..5 {
            sample.context = context(frame);
            sampler.sample(&sample, Some(&mut uniforms));
        }
        assert_eq!(uniforms.wheel, 3.0);

        sample.wheel_total = 40.0;
        sampler.sample(&sample, Some(&mut uniforms));
        assert_eq!(uniforms.wheel, 1.0);
    }

    #[test]
    fn held_key_integrates_one_step_per_frame_and_freezes_on_release() {
        let sampler = FrameSampler::default();
        let mut uniforms = MotionUniforms::default();

        let mut sample = idle_sample(0);
        sample.keys.right = true;
        for frame in 0..3 {
            sample.context = context(frame);
            sampler.sample(&sample, Some(&mut uniforms));
        }
        assert!((uniforms.movement[0] - 0.3).abs() < 1e-12);

        // Release before the fourth frame: no decay, no further movement.
        sample.keys.right = false;
        sample.context = context(3);
        sampler.sample(&sample, Some(&mut uniforms));
        assert!((uniforms.movement[0] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn sustained_drag_integrates_every_frame() {
        let sampler = FrameSampler::default();
        let mut uniforms = MotionUniforms::default();

        let mut sample = idle_sample(0);
        sample.drag = DragDelta { x: 100.0, y: 100.0 };
        for frame in 0..2 {
            sample.context = context(frame);
            sampler.sample(&sample, Some(&mut uniforms));
        }
        assert!((uniforms.pointer[0] - 1.0).abs() < 1e-12);
        assert!((uniforms.pointer[1] - 0.5).abs() < 1e-12);

        // Release resets the delta; the integrated value holds steady.
        sample.drag = DragDelta::default();
        sample.context = context(2);
        sampler.sample(&sample, Some(&mut uniforms));
        assert!((uniforms.pointer[0] - 1.0).abs() < 1e-12);
        assert!((uniforms.pointer[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn custom_scales_are_honoured() {
        let sampler = FrameSampler::new(MotionScales {
            wheel_divisor: 10.0,
            pointer_divisor_x: 50.0,
            pointer_divisor_y: 25.0,
            key_step: 1.0,
        });
        let mut uniforms = MotionUniforms::default();

        let mut sample = idle_sample(0);
        sample.wheel_total = 30.0;
        sample.drag = DragDelta { x: 100.0, y: 100.0 };
        sample.keys.forward = true;
        sampler.sample(&sample, Some(&mut uniforms));

        assert_eq!(uniforms.wheel, 3.0);
        assert_eq!(uniforms.pointer, [2.0, 4.0]);
        assert_eq!(uniforms.movement, [0.0, 1.0]);
    }
}
