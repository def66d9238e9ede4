use std::path::PathBuf;

use motion::MotionScales;

/// Immutable configuration passed to the viewer at start-up.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Optional fragment shader to render instead of the bundled scene.
    ///
    /// A user-supplied shader must declare the same uniform block the
    /// bundled one does; the contract is fixed when the shader is compiled,
    /// not negotiated at runtime.
    pub shader_source: Option<PathBuf>,
    /// Input-to-shader scaling constants.
    pub scales: MotionScales,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_size: (800, 450),
            shader_source: None,
            scales: MotionScales::default(),
        }
    }
}
