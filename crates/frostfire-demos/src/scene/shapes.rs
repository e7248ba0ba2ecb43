//! Procedural meshes for the demo props, assembled from engine primitives.
//!
//! Every builder returns geometry in world units with its origin on the
//! ground plane unless noted.

use frostfire_engine::render::MeshData;
use frostfire_sim::forest::TreeInstance;
use glam::{Mat4, Quat, Vec3};

const SEGMENTS: u32 = 16;

fn at(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, translation)
}

/// Castle with a central keep, four corner towers and curtain walls.
///
/// Footprint is about 3.7 units square, placed at twice that size.
pub fn castle() -> MeshData {
    let cube = MeshData::cube();
    let cylinder = MeshData::cylinder(SEGMENTS);
    let cone = MeshData::cone(SEGMENTS);

    let mut mesh = MeshData::default();
    mesh.append(&cube, at(Vec3::new(0.0, 1.1, 0.0), Vec3::new(1.4, 2.2, 1.4)));
    mesh.append(&cone, at(Vec3::new(0.0, 2.2, 0.0), Vec3::new(1.0, 1.0, 1.0)));

    let corner = 1.4;
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let base = Vec3::new(sx * corner, 0.0, sz * corner);
        mesh.append(&cylinder, at(base, Vec3::new(0.35, 2.6, 0.35)));
        mesh.append(&cone, at(base + Vec3::Y * 2.6, Vec3::new(0.45, 0.8, 0.45)));
    }

    let span = 2.0 * corner;
    for (offset, along_x) in [(-corner, true), (corner, true), (-corner, false), (corner, false)] {
        let (center, size) = if along_x {
            (Vec3::new(0.0, 0.6, offset), Vec3::new(span, 1.2, 0.25))
        } else {
            (Vec3::new(offset, 0.6, 0.0), Vec3::new(0.25, 1.2, span))
        };
        mesh.append(&cube, at(center, size));
        // Crenellations.
        for i in 0..7 {
            let t = (i as f32 + 0.5) / 7.0 - 0.5;
            let merlon = if along_x {
                Vec3::new(t * span, 1.3, offset)
            } else {
                Vec3::new(offset, 1.3, t * span)
            };
            mesh.append(&cube, at(merlon, Vec3::splat(0.2)));
        }
    }
    mesh
}

/// Car body facing +x, origin at the body centre.
pub fn car_body() -> MeshData {
    let cube = MeshData::cube();
    MeshData::default()
        .with(&cube, at(Vec3::new(0.0, -0.05, 0.0), Vec3::new(0.6, 0.12, 0.3)))
        .with(&cube, at(Vec3::new(-0.03, 0.06, 0.0), Vec3::new(0.32, 0.1, 0.26)))
}

/// Four wheels matching [`car_body`].
pub fn car_wheels() -> MeshData {
    let cylinder = MeshData::cylinder(SEGMENTS);
    let mut mesh = MeshData::default();
    for x in [-0.19, 0.19] {
        for z in [-0.15, 0.15] {
            // Cylinder axis is y; lay it along z.
            let transform = Mat4::from_translation(Vec3::new(x, -0.11, z - 0.025))
                * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2)
                * Mat4::from_scale(Vec3::new(0.06, 0.05, 0.06));
            mesh.append(&cylinder, transform);
        }
    }
    mesh
}

/// Street lamp pole and arm; origin at the bulb.
pub fn lamp_post() -> MeshData {
    let cylinder = MeshData::cylinder(8);
    let cube = MeshData::cube();
    MeshData::default()
        .with(&cylinder, at(Vec3::new(0.0, -0.93, -0.12), Vec3::new(0.02, 0.99, 0.02)))
        .with(&cube, at(Vec3::new(0.0, 0.06, -0.06), Vec3::new(0.03, 0.03, 0.14)))
}

/// Small house with a pyramid roof, about one unit across.
pub fn house() -> MeshData {
    let cube = MeshData::cube();
    let roof = MeshData::cone(4);
    MeshData::default()
        .with(&cube, at(Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.0, 0.8, 1.2)))
        .with(
            &roof,
            Mat4::from_translation(Vec3::new(0.0, 0.8, 0.0))
                * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4)
                * Mat4::from_scale(Vec3::new(0.85, 0.5, 0.85)),
        )
        .with(&cube, at(Vec3::new(0.0, 0.25, 0.6), Vec3::new(0.25, 0.5, 0.02)))
}

/// Handle plus bristle block, origin at the bristles' base.
pub fn broom() -> MeshData {
    let cylinder = MeshData::cylinder(8);
    let cube = MeshData::cube();
    MeshData::default()
        .with(&cube, at(Vec3::new(0.0, 0.05, 0.0), Vec3::new(0.3, 0.1, 0.08)))
        .with(&cylinder, at(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.015, 0.6, 0.015)))
}

fn tree_transform(tree: &TreeInstance, ground: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(tree.x, ground, tree.z))
        * Mat4::from_rotation_y(tree.rotation_degrees.to_radians())
        * Mat4::from_scale(Vec3::splat(tree.scale))
}

/// Foliage shape for a variant index. Variants alternate firs and round trees
/// of three heights.
fn foliage(variant: u32) -> MeshData {
    let height = 1.0 + 0.25 * (variant / 2 % 3) as f32;
    if variant % 2 == 0 {
        let cone = MeshData::cone(8);
        MeshData::default()
            .with(&cone, at(Vec3::new(0.0, 0.2, 0.0), Vec3::new(0.3, 0.5 * height, 0.3)))
            .with(&cone, at(Vec3::new(0.0, 0.2 + 0.3 * height, 0.0), Vec3::new(0.22, 0.4 * height, 0.22)))
    } else {
        let sphere = MeshData::uv_sphere(8, 6);
        MeshData::default().with(&sphere, at(Vec3::new(0.0, 0.3 + 0.2 * height, 0.0), Vec3::new(0.25, 0.3 * height, 0.25)))
    }
}

/// Merges a whole forest into one trunk mesh and one foliage mesh.
pub fn forest(trees: &[TreeInstance], ground: f32) -> (MeshData, MeshData) {
    let trunk = MeshData::cylinder(6);
    let variants: Vec<MeshData> = (0..6).map(foliage).collect();

    let mut trunks = MeshData::default();
    let mut leaves = MeshData::default();
    for tree in trees {
        let transform = tree_transform(tree, ground);
        trunks.append(&trunk, transform * Mat4::from_scale(Vec3::new(0.04, 0.35, 0.04)));
        leaves.append(&variants[tree.variant as usize % variants.len()], transform);
    }
    (trunks, leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(mesh: &MeshData) -> (Vec3, Vec3) {
        mesh.vertices.iter().fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), v| {
            let p = Vec3::from_array(v.position);
            (lo.min(p), hi.max(p))
        })
    }

    // ── props ─────────────────────────────────────────────────────────────

    #[test]
    fn castle_fits_on_its_base() {
        let (lo, hi) = bounds(&castle());
        assert!(lo.x >= -1.9 && hi.x <= 1.9);
        assert!(lo.y >= -1e-5);
        assert!(hi.y > 3.0);
    }

    #[test]
    fn wheels_touch_the_ground() {
        // Body origin rides 0.17 above the road.
        let (lo, _) = bounds(&car_wheels());
        assert!((lo.y + 0.17).abs() < 1e-4);
    }

    #[test]
    fn lamp_reaches_the_ground_from_the_bulb() {
        let (lo, hi) = bounds(&lamp_post());
        assert!((lo.y + 0.93).abs() < 1e-4);
        assert!(hi.y < 0.1);
    }

    // ── forest ────────────────────────────────────────────────────────────

    #[test]
    fn forest_merges_every_tree() {
        let trees = [
            TreeInstance { x: 0.0, z: 3.0, scale: 1.0, rotation_degrees: 0.0, variant: 0 },
            TreeInstance { x: 2.0, z: 5.0, scale: 1.5, rotation_degrees: 90.0, variant: 3 },
        ];
        let (trunks, leaves) = forest(&trees, -0.45);
        assert_eq!(trunks.vertices.len(), 2 * MeshData::cylinder(6).vertices.len());
        assert_eq!(leaves.vertices.len(), foliage(0).vertices.len() + foliage(3).vertices.len());

        let (lo, _) = bounds(&trunks);
        assert!((lo.y + 0.45).abs() < 1e-4);
    }

    #[test]
    fn empty_forest_is_empty() {
        let (trunks, leaves) = forest(&[], 0.0);
        assert!(trunks.indices.is_empty() && leaves.indices.is_empty());
    }
}
