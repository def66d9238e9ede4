use bytemuck::{Pod, Zeroable};
use motion::MotionUniforms;

/// GPU-side mirror of the shader's `SceneParams` uniform block.
///
/// Field order matches the std140 layout declared in the fragment shader;
/// the eight f32 fields pack without implicit padding, so `bytes_of` can be
/// uploaded verbatim. The motion pipeline integrates in f64 and only drops
/// to f32 here, at the upload boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct SceneUniforms {
    resolution: [f32; 2],
    time: f32,
    wheel: f32,
    pointer: [f32; 2],
    movement: [f32; 2],
}

impl SceneUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            ..Self::default()
        }
    }

    pub fn apply(&mut self, motion: &MotionUniforms) {
        self.time = motion.time;
        self.resolution = motion.resolution;
        self.wheel = motion.wheel;
        self.pointer = [motion.pointer[0] as f32, motion.pointer[1] as f32];
        self.movement = [motion.movement[0] as f32, motion.movement[1] as f32];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_matches_std140_layout() {
        // vec2 + float + float + vec2 + vec2, no padding required.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 32);
        assert_eq!(std::mem::align_of::<SceneUniforms>(), 4);
    }

    #[test]
    fn apply_copies_every_uniform() {
        let motion = MotionUniforms {
            time: 1.5,
            resolution: [800.0, 450.0],
            wheel: 3.0,
            pointer: [0.25, -0.5],
            movement: [0.3, 0.1],
        };

        let mut uniforms = SceneUniforms::new(1, 1);
        uniforms.apply(&motion);

        assert_eq!(uniforms.time, 1.5);
        assert_eq!(uniforms.resolution, [800.0, 450.0]);
        assert_eq!(uniforms.wheel, 3.0);
        assert_eq!(uniforms.pointer, [0.25, -0.5]);
        assert_eq!(uniforms.movement, [0.3, 0.1]);
    }
}
