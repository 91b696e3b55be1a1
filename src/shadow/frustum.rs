use glam::{Mat4, Vec3, Vec4};

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Depth bounds of slice `index` out of `count` slices covering `[near, far]`.
///
/// Slices are contiguous: slice 0 starts at the camera near plane, every
/// later slice starts where the previous one ends, and the last slice ends
/// exactly at `far`.
pub fn slice_bounds(near: f32, far: f32, count: usize, index: usize) -> (f32, f32) {
    debug_assert!(count > 0, "cascade count must be non-zero");
    debug_assert!(index < count, "cascade index {index} out of range 0..{count}");
    debug_assert!(near < far, "near plane must sit in front of far plane");
    let step = far / count as f32;
    let slice_near = if index == 0 { near } else { step * index as f32 };
    (slice_near, step * (index + 1) as f32)
}

/// Un-projects the NDC cube through `inverse(projection * view)` to recover
/// the 8 world-space frustum corners.
pub fn frustum_corners_world(projection: Mat4, view: Mat4) -> [Vec3; 8] {
    let inv = (projection * view).inverse();
    let mut corners = [Vec3::ZERO; 8];
    let mut idx = 0;
    for &x in &[-1.0f32, 1.0] {
        for &y in &[-1.0f32, 1.0] {
            for &z in &[-1.0f32, 1.0] {
                let world = inv * Vec4::new(x, y, z, 1.0);
                corners[idx] = world.truncate() / world.w;
                idx += 1;
            }
        }
    }
    corners
}

pub fn frustum_center(corners: &[Vec3; 8]) -> Vec3 {
    let mut center = Vec3::ZERO;
    for corner in corners {
        center += *corner;
    }
    center / corners.len() as f32
}

/// View matrix of the shadow-casting light: one unit back from the slice
/// center against the light direction, world up, with a fallback axis when
/// the light is near-vertical so the basis never degenerates.
pub fn light_view_matrix(center: Vec3, light_direction: Vec3) -> Mat4 {
    debug_assert!(light_direction.length_squared() > 1e-8, "light direction must be non-zero");
    let towards_light = -light_direction.normalize();
    let mut up = WORLD_UP;
    if up.dot(towards_light).abs() > 0.95 {
        up = Vec3::X;
    }
    Mat4::look_at_rh(center + towards_light, center, up)
}

/// Axis-aligned bounds of the corners after transforming into light space.
pub fn light_space_bounds(light_view: Mat4, corners: &[Vec3; 8]) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for corner in corners {
        let light_space = light_view.transform_point3(*corner);
        min = min.min(light_space);
        max = max.max(light_space);
    }
    (min, max)
}

/// Stretches the light-space depth bounds away from the fitted box so
/// casters outside the strict slice volume still land in the shadow map.
/// The sign-dependent form is a tunable heuristic, not a hard invariant;
/// a multiplier of 1.0 leaves the bounds untouched.
pub fn stretch_z_bounds(min_z: f32, max_z: f32, multiplier: f32) -> (f32, f32) {
    debug_assert!(multiplier > 0.0, "z multiplier must be positive");
    let min_z = if min_z < 0.0 { min_z * multiplier } else { min_z / multiplier };
    let max_z = if max_z < 0.0 { max_z / multiplier } else { max_z * multiplier };
    (min_z, max_z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sample_view() -> Mat4 {
        Mat4::look_at_rh(Vec3::new(3.0, 4.0, 8.0), Vec3::new(0.5, 0.0, -2.0), Vec3::Y)
    }

    #[test]
    fn slices_are_contiguous_and_cover_range() {
        let (near, far, count) = (0.1f32, 100.0f32, 3usize);
        let mut prev_far = near;
        for index in 0..count {
            let (slice_near, slice_far) = slice_bounds(near, far, count, index);
            assert!(slice_near < slice_far);
            if index > 0 {
                assert!((slice_near - prev_far).abs() < 1e-4);
            }
            prev_far = slice_far;
        }
        assert!((prev_far - far).abs() < 1e-4);
    }

    #[test]
    #[should_panic]
    fn slice_index_out_of_range_asserts() {
        slice_bounds(0.1, 100.0, 3, 3);
    }

    #[test]
    fn corners_round_trip_to_ndc_cube() {
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 0.5, 50.0);
        let view = sample_view();
        let corners = frustum_corners_world(projection, view);
        let mut idx = 0;
        for &x in &[-1.0f32, 1.0] {
            for &y in &[-1.0f32, 1.0] {
                for &z in &[-1.0f32, 1.0] {
                    let clip = projection * view * corners[idx].extend(1.0);
                    let ndc = clip.truncate() / clip.w;
                    assert!(ndc.distance(Vec3::new(x, y, z)) < 1e-3, "corner {idx} drifted: {ndc}");
                    idx += 1;
                }
            }
        }
    }

    #[test]
    fn light_space_bounds_contain_all_corners() {
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), 1.5, 0.1, 30.0);
        let corners = frustum_corners_world(projection, sample_view());
        let light_view = light_view_matrix(frustum_center(&corners), Vec3::new(-0.4, -1.0, -0.3));
        let (min, max) = light_space_bounds(light_view, &corners);
        for corner in corners {
            let p = light_view.transform_point3(corner);
            assert!(p.x >= min.x - 1e-3 && p.x <= max.x + 1e-3);
            assert!(p.y >= min.y - 1e-3 && p.y <= max.y + 1e-3);
            assert!(p.z >= min.z - 1e-3 && p.z <= max.z + 1e-3);
        }
    }

    #[test]
    fn unit_z_multiplier_is_identity() {
        let (min_z, max_z) = stretch_z_bounds(-12.5, 3.75, 1.0);
        assert_eq!(min_z, -12.5);
        assert_eq!(max_z, 3.75);
    }

    #[test]
    fn z_multiplier_pushes_bounds_outward() {
        let (min_z, max_z) = stretch_z_bounds(-10.0, 5.0, 10.0);
        assert!(min_z <= -10.0);
        assert!(max_z >= 5.0);
        let (min_z, max_z) = stretch_z_bounds(2.0, 5.0, 10.0);
        assert!(min_z <= 2.0);
        assert!(max_z >= 5.0);
    }

    #[test]
    fn vertical_light_still_builds_a_basis() {
        let light_view = light_view_matrix(Vec3::new(1.0, 0.0, -4.0), Vec3::NEG_Y);
        assert!(!light_view.to_cols_array().iter().any(|v| v.is_nan()));
        assert!(light_view.determinant().abs() > 1e-4);
    }

    #[test]
    fn center_is_mean_of_corners() {
        let projection = Mat4::perspective_rh_gl(50f32.to_radians(), 1.0, 1.0, 10.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let corners = frustum_corners_world(projection, view);
        let center = frustum_center(&corners);
        // Symmetric frustum looking down -Z keeps the center on the view axis.
        assert!(Vec2::new(center.x, center.y).length() < 1e-3);
        assert!(center.z < 0.0);
    }
}
