use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Vertical field of view shared by every recipe, in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Right-handed perspective projection with wgpu's `[0, 1]` depth range.
pub fn perspective(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(f32::EPSILON), Z_NEAR, Z_FAR)
}

/// Per-draw uniform block shared by the cube and mesh shaders.
///
/// Layout matches the WGSL struct `{ mvp: mat4x4<f32>, is_wireframe: i32 }`
/// rounded up to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PerFrameData {
    pub mvp: [[f32; 4]; 4],
    pub is_wireframe: i32,
    pub _pad: [i32; 3],
}

impl PerFrameData {
    pub fn new(mvp: Mat4, is_wireframe: bool) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            is_wireframe: is_wireframe as i32,
            _pad: [0; 3],
        }
    }
}
