use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Upper bound on lights in one scene (19 lamps + 4 car lights + sun).
pub const MAX_LIGHTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional { direction: Vec3 },
    Point { position: Vec3 },
    /// Cone with smooth falloff between the cosines of `inner` and `outer` (radians).
    Spot {
        position: Vec3,
        direction: Vec3,
        inner: f32,
        outer: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Light {
    pub fn directional(direction: Vec3, ambient: f32, diffuse: f32, specular: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction },
            ambient: Vec3::splat(ambient),
            diffuse: Vec3::splat(diffuse),
            specular: Vec3::splat(specular),
        }
    }

    pub fn point(position: Vec3, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            kind: LightKind::Point { position },
            ambient,
            diffuse,
            specular,
        }
    }

    pub fn spot(position: Vec3, direction: Vec3, inner_deg: f32, outer_deg: f32, color: Vec3) -> Self {
        Self {
            kind: LightKind::Spot {
                position,
                direction,
                inner: inner_deg.to_radians(),
                outer: outer_deg.to_radians(),
            },
            ambient: Vec3::ZERO,
            diffuse: color,
            specular: color,
        }
    }

    fn gpu(&self) -> LightData {
        // position.w: 0 = directional (xyz is the direction towards the light)
        let (position, direction, cone) = match self.kind {
            LightKind::Directional { direction } => {
                (direction.normalize_or_zero().extend(0.0), Vec4::ZERO, Vec4::new(-1.0, -1.0, 0.0, 0.0))
            }
            LightKind::Point { position } => (position.extend(1.0), Vec4::ZERO, Vec4::new(-1.0, -1.0, 0.0, 0.0)),
            LightKind::Spot {
                position,
                direction,
                inner,
                outer,
            } => (
                position.extend(1.0),
                direction.normalize_or_zero().extend(1.0),
                Vec4::new(inner.cos(), outer.cos(), 0.0, 0.0),
            ),
        };
        LightData {
            position: position.to_array(),
            ambient: self.ambient.extend(1.0).to_array(),
            diffuse: self.diffuse.extend(1.0).to_array(),
            specular: self.specular.extend(1.0).to_array(),
            direction: direction.to_array(),
            cone: cone.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LightData {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// w = 1 for spot lights
    pub direction: [f32; 4],
    /// x = cos(inner), y = cos(outer)
    pub cone: [f32; 4],
}

/// Light block shared read-only by every pass (`group(0) binding(1)`).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LightsUniform {
    pub global_ambient: [f32; 4],
    pub count: u32,
    pub _pad: [u32; 3],
    pub lights: [LightData; MAX_LIGHTS],
}

impl LightsUniform {
    /// Packs `lights`; entries past [`MAX_LIGHTS`] are dropped with a warning.
    pub fn new(global_ambient: Vec3, lights: &[Light]) -> Self {
        if lights.len() > MAX_LIGHTS {
            log::warn!("{} lights requested, only {MAX_LIGHTS} are shaded", lights.len());
        }
        let mut out = Self {
            global_ambient: global_ambient.extend(1.0).to_array(),
            count: lights.len().min(MAX_LIGHTS) as u32,
            _pad: [0; 3],
            lights: [LightData::zeroed(); MAX_LIGHTS],
        };
        for (slot, light) in out.lights.iter_mut().zip(lights) {
            *slot = light.gpu();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_data_is_six_vec4() {
        assert_eq!(size_of::<LightData>(), 96);
        assert_eq!(size_of::<LightsUniform>(), 32 + 96 * MAX_LIGHTS);
    }

    #[test]
    fn directional_light_has_zero_w() {
        let u = LightsUniform::new(Vec3::ZERO, &[Light::directional(Vec3::ONE, 0.1, 0.9, 0.1)]);
        assert_eq!(u.count, 1);
        assert_eq!(u.lights[0].position[3], 0.0);
        let d = Vec3::from_slice(&u.lights[0].position[..3]);
        assert!((d.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spot_cone_stores_cosines() {
        let s = Light::spot(Vec3::ZERO, Vec3::NEG_Y, 45.0, 75.0, Vec3::ONE);
        let u = LightsUniform::new(Vec3::ZERO, &[s]);
        assert!((u.lights[0].cone[0] - 45f32.to_radians().cos()).abs() < 1e-6);
        assert!((u.lights[0].cone[1] - 75f32.to_radians().cos()).abs() < 1e-6);
        assert_eq!(u.lights[0].direction[3], 1.0);
    }

    #[test]
    fn excess_lights_are_truncated() {
        let many = vec![Light::point(Vec3::ZERO, Vec3::ZERO, Vec3::ONE, Vec3::ONE); MAX_LIGHTS + 5];
        assert_eq!(LightsUniform::new(Vec3::ZERO, &many).count as usize, MAX_LIGHTS);
    }
}
