pub mod camera3d;
pub mod config;
pub mod lighting;
pub mod shadow;

pub use camera3d::{Camera3D, FlyCamera};
pub use config::ShadowSettings;
pub use shadow::{Cascade, CascadeSet, MAX_SHADOW_CASCADES};

pub(crate) fn wrap_angle(mut radians: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    while radians > std::f32::consts::PI {
        radians -= two_pi;
    }
    while radians < -std::f32::consts::PI {
        radians += two_pi;
    }
    radians
}
