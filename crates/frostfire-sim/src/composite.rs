//! Reflection compositing shared by the firework demo and its shaders.

use glam::{Mat4, Vec4};

/// What the combine pass puts on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DisplayMode {
    /// Lit scene blended with its reflection through the water mask.
    #[default]
    Final,
    /// The water mask alone.
    Mask,
    /// The mirrored render alone.
    Reflection,
    /// The lit scene without any reflection.
    WithoutReflection,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Final,
        DisplayMode::Mask,
        DisplayMode::Reflection,
        DisplayMode::WithoutReflection,
    ];

    pub fn next(self) -> Self {
        match self {
            DisplayMode::Final => DisplayMode::Mask,
            DisplayMode::Mask => DisplayMode::Reflection,
            DisplayMode::Reflection => DisplayMode::WithoutReflection,
            DisplayMode::WithoutReflection => DisplayMode::Final,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Final => "Final",
            DisplayMode::Mask => "Lake Mask",
            DisplayMode::Reflection => "Reflection Only",
            DisplayMode::WithoutReflection => "Without Reflection",
        }
    }

    /// Value of the `mode` field in the combine shader's uniform block.
    pub fn shader_index(self) -> u32 {
        self as u32
    }
}

/// Offscreen passes of one composited frame, in execution order.
///
/// The combine pass reads all three targets, so none may be skipped even when
/// a [`DisplayMode`] shows only one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenePass {
    /// Castle, base and particles seen through the mirrored view.
    Reflection,
    /// Water flagged 1, everything else 0; particles drawn black.
    Mask,
    /// Lit scene plus additive particles.
    Final,
}

impl ScenePass {
    pub const ORDER: [ScenePass; 3] = [ScenePass::Reflection, ScenePass::Mask, ScenePass::Final];

    pub fn label(self) -> &'static str {
        match self {
            ScenePass::Reflection => "reflection",
            ScenePass::Mask => "mask",
            ScenePass::Final => "final",
        }
    }

    /// Whether this pass renders through [`mirrored_view`].
    pub fn mirrored(self) -> bool {
        self == ScenePass::Reflection
    }
}

impl DisplayMode {
    /// Target shown directly instead of running the combine shader.
    pub fn shown_target(self) -> Option<ScenePass> {
        match self {
            DisplayMode::Final => None,
            DisplayMode::Mask => Some(ScenePass::Mask),
            DisplayMode::Reflection => Some(ScenePass::Reflection),
            DisplayMode::WithoutReflection => Some(ScenePass::Final),
        }
    }
}

/// CPU reference of the combine shader: `mix(final, reflection, mask * mirror)`.
///
/// `mask` is the red channel of the mask target (1 on water).
pub fn combine_texel(final_color: Vec4, reflection: Vec4, mask: f32, mirror_factor: f32) -> Vec4 {
    let t = (mask * mirror_factor).clamp(0.0, 1.0);
    final_color.lerp(reflection, t)
}

/// Reflects a view matrix through the `y = 0` plane.
pub fn mirrored_view(view: Mat4) -> Mat4 {
    view * Mat4::from_scale(glam::Vec3::new(1.0, -1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const F: Vec4 = Vec4::new(0.2, 0.4, 0.6, 1.0);
    const R: Vec4 = Vec4::new(0.9, 0.1, 0.3, 1.0);

    #[test]
    fn opaque_mask_without_mirror_is_final() {
        assert_eq!(combine_texel(F, R, 1.0, 0.0), F);
    }

    #[test]
    fn full_mirror_on_water_is_reflection() {
        assert!((combine_texel(F, R, 1.0, 1.0) - R).abs().max_element() < 1e-6);
    }

    #[test]
    fn dry_texel_ignores_mirror() {
        assert_eq!(combine_texel(F, R, 0.0, 1.0), F);
    }

    #[test]
    fn partial_mirror_blends() {
        let out = combine_texel(F, R, 1.0, 0.5);
        assert!((out - (F + R) * 0.5).abs().max_element() < 1e-6);
    }

    #[test]
    fn display_modes_cycle() {
        let mut m = DisplayMode::default();
        for expected in DisplayMode::ALL.iter().cycle().skip(1).take(4) {
            m = m.next();
            assert_eq!(m, *expected);
        }
        assert_eq!(m, DisplayMode::Final);
    }

    #[test]
    fn reflection_renders_first_and_final_last() {
        assert_eq!(ScenePass::ORDER.first(), Some(&ScenePass::Reflection));
        assert_eq!(ScenePass::ORDER.last(), Some(&ScenePass::Final));
        assert_eq!(ScenePass::ORDER.iter().filter(|p| p.mirrored()).count(), 1);
    }

    #[test]
    fn only_final_mode_combines() {
        assert_eq!(DisplayMode::Final.shown_target(), None);
        assert_eq!(DisplayMode::WithoutReflection.shown_target(), Some(ScenePass::Final));
        assert_eq!(DisplayMode::Mask.shown_target(), Some(ScenePass::Mask));
    }

    #[test]
    fn mirrored_view_flips_height() {
        let p = mirrored_view(Mat4::IDENTITY).transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(1.0, -2.0, 3.0));
    }
}
