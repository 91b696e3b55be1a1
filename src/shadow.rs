pub mod cascade_set;
pub mod frustum;

pub use cascade_set::{compute_cascade, compute_cascades, CascadeSet};

use glam::Mat4;

/// Upper bound on the runtime cascade count; sizes the uniform arrays.
pub const MAX_SHADOW_CASCADES: usize = 4;

/// One depth slice of the camera frustum with its fitted light-space
/// transforms. `near_z`/`far_z` run along the camera's forward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cascade {
    pub near_z: f32,
    pub far_z: f32,
    pub light_view: Mat4,
    pub light_projection: Mat4,
}

impl Cascade {
    pub fn light_view_projection(&self) -> Mat4 {
        self.light_projection * self.light_view
    }
}

impl Default for Cascade {
    fn default() -> Self {
        Self { near_z: 0.0, far_z: 0.0, light_view: Mat4::IDENTITY, light_projection: Mat4::IDENTITY }
    }
}

/// GPU-side cascade table consumed by the shading pass. Split depths sit in
/// the x lane of each vec4 to satisfy uniform array stride rules.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CascadeUniform {
    pub light_view_proj: [[[f32; 4]; 4]; MAX_SHADOW_CASCADES],
    pub splits: [[f32; 4]; MAX_SHADOW_CASCADES],
    pub params: [f32; 4],
}

impl CascadeUniform {
    pub fn from_cascades(cascades: &[Cascade]) -> Self {
        let count = cascades.len().min(MAX_SHADOW_CASCADES);
        let mut light_view_proj = [Mat4::IDENTITY.to_cols_array_2d(); MAX_SHADOW_CASCADES];
        let mut splits = [[0.0f32; 4]; MAX_SHADOW_CASCADES];
        for (idx, cascade) in cascades.iter().take(count).enumerate() {
            light_view_proj[idx] = cascade.light_view_projection().to_cols_array_2d();
            splits[idx][0] = cascade.far_z;
        }
        Self { light_view_proj, splits, params: [count as f32, 0.0, 0.0, 0.0] }
    }
}
