use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use frostfire_engine::render::Mesh;
use glam::{Mat4, Vec3, Vec4};

/// Phong material. `emissive` materials ignore lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    /// 10% ambient, 90% diffuse of `color`, dim specular.
    pub fn phong(color: Vec3) -> Self {
        Self {
            ambient: color * 0.1,
            diffuse: color * 0.9,
            specular: Vec3::splat(0.1),
            shininess: 2.0,
        }
    }

    pub fn emissive(color: Vec3) -> Self {
        Self {
            ambient: color,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            shininess: 1.0,
        }
    }
}

/// Procedural surface pattern standing in for an albedo texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Pattern {
    #[default]
    None = 0,
    Checker = 1,
    /// Value noise (ice, snow, ground).
    Noise = 2,
    /// Dashed centre line (road).
    Stripes = 3,
    /// Wood grain (broom).
    Grain = 4,
}

/// One renderable entry of the registry.
#[derive(Clone)]
pub struct SceneObject {
    pub mesh: Rc<Mesh>,
    pub model: Mat4,
    pub material: Material,
    pub pattern: Pattern,
    pub uv_multiplier: f32,
    /// Flagged as reflective water in the mask pass.
    pub water: bool,
}

impl SceneObject {
    pub fn new(mesh: Rc<Mesh>, model: Mat4, material: Material) -> Self {
        Self {
            mesh,
            model,
            material,
            pattern: Pattern::None,
            uv_multiplier: 1.0,
            water: false,
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern, uv_multiplier: f32) -> Self {
        self.pattern = pattern;
        self.uv_multiplier = uv_multiplier;
        self
    }

    pub fn as_water(mut self) -> Self {
        self.water = true;
        self
    }

    pub fn uniform(&self) -> ObjectUniform {
        let normal = Mat4::from_mat3(glam::Mat3::from_mat4(self.model).inverse().transpose());
        ObjectUniform {
            model: self.model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            ambient: self.material.ambient.extend(1.0).to_array(),
            diffuse: self.material.diffuse.extend(1.0).to_array(),
            specular: self.material.specular.extend(self.material.shininess).to_array(),
            surface: Vec4::new(
                self.pattern as u32 as f32,
                self.uv_multiplier,
                if self.water { 1.0 } else { 0.0 },
                0.0,
            )
            .to_array(),
        }
    }
}

/// Per-object uniform block (`group(1)`, dynamic offset).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// w = shininess
    pub specular: [f32; 4],
    /// x = pattern, y = uv multiplier, z = water flag
    pub surface: [f32; 4],
}

/// Handle into a [`SceneRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered list of scene objects. Slot order is the uniform slot order.
#[derive(Default, Clone)]
pub struct SceneRegistry {
    objects: Vec<SceneObject>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn get(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut SceneObject {
        &mut self.objects[id.0]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn uniforms(&self) -> Vec<ObjectUniform> {
        self.objects.iter().map(SceneObject::uniform).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_uniform_fits_one_dynamic_slot() {
        assert!(size_of::<ObjectUniform>() as u64 <= frostfire_engine::render::DYNAMIC_STRIDE);
        assert_eq!(size_of::<ObjectUniform>() % 16, 0);
    }

    #[test]
    fn phong_splits_color() {
        let m = Material::phong(Vec3::ONE);
        assert_eq!(m.ambient, Vec3::splat(0.1));
        assert_eq!(m.diffuse, Vec3::splat(0.9));
    }

    #[test]
    fn emissive_has_no_diffuse() {
        let m = Material::emissive(Vec3::X);
        assert_eq!(m.diffuse, Vec3::ZERO);
        assert_eq!(m.ambient, Vec3::X);
    }
}
