use glam::{Mat4, Vec2, Vec3};

/// Half width of the square the overhead camera covers.
pub const ORTHO_HALF_EXTENT: f32 = 13.0;
const ORTHO_EYE: Vec3 = Vec3::new(0.0, 50.0, 0.0);

/// Overhead orthographic camera that renders the accumulation depth map.
pub fn ortho_view_proj() -> Mat4 {
    let e = ORTHO_HALF_EXTENT;
    let proj = Mat4::orthographic_rh(-e, e, -e, e, 0.1, 5000.0);
    let view = Mat4::look_at_rh(ORTHO_EYE, Vec3::ZERO, Vec3::X);
    proj * view
}

/// World → accumulation texture coordinates (xy = uv, z = ortho depth).
///
/// Texture v grows downwards, hence the flipped y scale.
pub fn snow_matrix() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
        * Mat4::from_scale(Vec3::new(0.5, -0.5, 1.0))
        * ortho_view_proj()
}

pub fn world_to_snow_uv(p: Vec3) -> Vec2 {
    snow_matrix().project_point3(p).truncate()
}

/// Broom radius in uv units for a world-space radius.
pub fn world_radius_to_uv(radius: f32) -> f32 {
    radius / (2.0 * ORTHO_HALF_EXTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_texture_centre() {
        let uv = world_to_snow_uv(Vec3::ZERO);
        assert!((uv - Vec2::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn area_corners_map_to_unit_square() {
        for p in [Vec3::new(13.0, 0.0, 13.0), Vec3::new(-13.0, 0.0, -13.0), Vec3::new(13.0, 5.0, -13.0)] {
            let uv = world_to_snow_uv(p);
            for c in uv.to_array() {
                assert!(c.abs() < 1e-5 || (c - 1.0).abs() < 1e-5, "{p} -> {uv}");
            }
        }
    }

    #[test]
    fn height_only_changes_depth() {
        let a = snow_matrix().project_point3(Vec3::new(3.0, 0.0, 2.0));
        let b = snow_matrix().project_point3(Vec3::new(3.0, 4.0, 2.0));
        assert!((a.truncate() - b.truncate()).length() < 1e-6);
        assert!(b.z < a.z);
    }
}
