//! Firework castle: GPU particle fireworks over a castle in a mirroring lake.
//!
//! Keys:
//! - `Tab` cycle display mode, `R` restart the simulation
//! - `D` restore default simulation parameters
//! - `PageUp` / `PageDown` double / halve the particle count
//! - `Minus` / `Equal` lower / raise the mirror factor
//! - `Left` / `Right` select a parameter, `Up` / `Down` adjust it
//! - left drag orbits, wheel zooms

mod buffers;
mod compositor;
mod particles;
mod simulator;
mod tuning;

use std::rc::Rc;

use anyhow::Result;
use frostfire_engine::camera::{CameraUniform, OrbitCamera, Projection};
use frostfire_engine::core::{App, AppControl, FrameCtx};
use frostfire_engine::device::Gpu;
use frostfire_engine::input::Key;
use frostfire_engine::render::{Mesh, MeshData};
use frostfire_sim::composite::{mirrored_view, DisplayMode, ScenePass};
use frostfire_sim::particles::{CpuIntegrator, FireworkParams, ParticleController, ParticleCount};
use glam::{Mat4, Vec3};
use winit::dpi::PhysicalSize;

use crate::diagnostics::Diagnostics;
use crate::scene::{
    shapes, Light, LightsUniform, Material, ObjectId, Pattern, SceneObject, SceneParams, SceneRegistry,
    SceneRenderer, SceneView, Shading,
};
use crate::settings::FireworkSettings;

pub use buffers::ParticleBuffers;
pub use compositor::Compositor;
pub use particles::{ParticleRenderer, SpriteStyle};
pub use simulator::ParticleSimulator;
pub use tuning::Tunable;

pub(crate) const CASTLE_COLOR: Vec3 = Vec3::new(0.95, 0.75, 0.55);
pub(crate) const TERRAIN_COLOR: Vec3 = Vec3::new(0.2, 0.5, 0.15);
pub(crate) const LAKE_COLOR: Vec3 = Vec3::new(0.1, 0.3, 0.6);
pub(crate) const BASE_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Terrain, castle base, lake and castle, shared with the snow scene.
pub(crate) struct CastleGrounds {
    pub terrain: ObjectId,
    pub base: ObjectId,
    pub lake: ObjectId,
    pub castle: ObjectId,
}

impl CastleGrounds {
    pub fn build(device: &wgpu::Device, registry: &mut SceneRegistry) -> Self {
        let cube = Rc::new(Mesh::upload(device, "cube", &MeshData::cube()));
        let castle = Rc::new(Mesh::upload(device, "castle", &shapes::castle()));

        let slab = |pos: Vec3, scale: Vec3| Mat4::from_translation(pos) * Mat4::from_scale(scale);
        Self {
            terrain: registry.push(
                SceneObject::new(
                    cube.clone(),
                    slab(Vec3::new(0.0, -0.08, 0.0), Vec3::new(26.0, 0.2, 26.0)),
                    Material::phong(TERRAIN_COLOR),
                )
                .with_pattern(Pattern::Noise, 8.0),
            ),
            base: registry.push(SceneObject::new(
                cube.clone(),
                slab(Vec3::new(0.0, 0.05, 0.0), Vec3::new(7.6, 0.2, 7.6)),
                Material::phong(BASE_COLOR),
            )),
            lake: registry.push(
                SceneObject::new(
                    cube,
                    slab(Vec3::new(0.0, -0.05, 0.0), Vec3::new(24.0, 0.2, 24.0)),
                    Material::phong(LAKE_COLOR),
                )
                .as_water(),
            ),
            castle: registry.push(SceneObject::new(
                castle,
                Mat4::from_translation(Vec3::new(0.0, 0.15, 0.0)) * Mat4::from_scale(Vec3::splat(2.0)),
                Material::phong(CASTLE_COLOR),
            )),
        }
    }

    pub fn all(&self) -> [ObjectId; 4] {
        [self.terrain, self.base, self.lake, self.castle]
    }
}

/// GPU state, created on the first frame once a device exists.
struct FireworkScene {
    scene: SceneRenderer,
    registry: SceneRegistry,
    grounds: CastleGrounds,
    view: SceneView,
    mirror: SceneView,
    compositor: Compositor,
    buffers: ParticleBuffers,
    simulator: ParticleSimulator,
    sprites: ParticleRenderer,
    /// Indexed by [`ScenePass::ORDER`].
    sprite_groups: [wgpu::BindGroup; 3],
    cpu: Option<CpuIntegrator>,
}

impl FireworkScene {
    fn new(gpu: &Gpu<'_>, settings: &FireworkSettings) -> Self {
        let device = gpu.device();
        let queue = gpu.queue();
        let size = gpu.size();
        let format = gpu.surface_format();

        let mut scene = SceneRenderer::new(device);
        let mut registry = SceneRegistry::new();
        let grounds = CastleGrounds::build(device, &mut registry);
        scene.write_objects(device, queue, &registry);
        scene.write_lights(
            queue,
            &LightsUniform::new(Vec3::ZERO, &[Light::directional(Vec3::ONE, 0.1, 0.9, 0.1)]),
        );
        scene.write_params(queue, &SceneParams::default());
        for shading in [Shading::Lit, Shading::Mask] {
            scene.prepare(device, shading, format);
        }

        let view = scene.create_view(device, "frostfire firework camera");
        let mirror = scene.create_view(device, "frostfire firework mirror camera");

        let buffers = ParticleBuffers::new(device, ParticleCount::MAX);
        let simulator = ParticleSimulator::new(device, &buffers);
        let sprites = ParticleRenderer::new(device);
        let sprite_groups = ScenePass::ORDER.map(|pass| match pass {
            ScenePass::Reflection => sprites.bind_group(device, mirror.camera(), &buffers, SpriteStyle::Glow),
            ScenePass::Mask => sprites.bind_group(device, view.camera(), &buffers, SpriteStyle::Silhouette),
            ScenePass::Final => sprites.bind_group(device, view.camera(), &buffers, SpriteStyle::Glow),
        });

        let cpu = settings.cpu_particles.then(|| {
            log::info!("fireworks integrate on the host");
            CpuIntegrator::new(ParticleCount::MAX)
        });

        Self {
            scene,
            registry,
            grounds,
            view,
            mirror,
            compositor: Compositor::new(device, format, (size.width, size.height)),
            buffers,
            simulator,
            sprites,
            sprite_groups,
            cpu,
        }
    }
}

/// The firework castle application.
pub struct FireworkDemo {
    params: FireworkParams,
    mirror_factor: f32,
    mode: DisplayMode,
    selected: Tunable,
    controller: ParticleController,
    camera: OrbitCamera,
    projection: Projection,
    settings: FireworkSettings,
    diagnostics: Diagnostics,
    state: Option<FireworkScene>,
}

impl FireworkDemo {
    pub fn new(settings: FireworkSettings) -> Self {
        Self {
            params: settings.params,
            mirror_factor: settings.mirror_factor,
            mode: DisplayMode::Final,
            selected: Tunable::Gravity,
            controller: ParticleController::new(settings.count()),
            camera: OrbitCamera::new((-45f32).to_radians(), 20f32.to_radians(), 50.0),
            projection: Projection::default(),
            settings,
            diagnostics: Diagnostics::new("firework"),
            state: None,
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) {
        let pressed = |k| ctx.input_frame.key_pressed(k);

        if pressed(Key::Tab) {
            self.mode = self.mode.next();
            log::info!("display mode: {}", self.mode.label());
        }
        if pressed(Key::R) {
            self.controller.invalidate();
        }
        if pressed(Key::D) {
            self.restore_default_params();
        }
        if pressed(Key::PageUp) {
            self.set_count(self.controller.desired().step_up());
        }
        if pressed(Key::PageDown) {
            self.set_count(self.controller.desired().step_down());
        }
        if pressed(Key::Equal) || pressed(Key::Minus) {
            let delta = if pressed(Key::Equal) { 0.05 } else { -0.05 };
            self.mirror_factor = (self.mirror_factor + delta).clamp(0.0, 1.0);
            log::info!("mirror factor: {:.2}", self.mirror_factor);
        }
        if pressed(Key::ArrowRight) {
            self.selected = self.selected.next();
            log::info!("selected {} = {}", self.selected.label(), self.selected.get(&self.params));
        }
        if pressed(Key::ArrowLeft) {
            self.selected = self.selected.prev();
            log::info!("selected {} = {}", self.selected.label(), self.selected.get(&self.params));
        }
        if pressed(Key::ArrowUp) || pressed(Key::ArrowDown) {
            self.nudge_selected(if pressed(Key::ArrowUp) { 1.0 } else { -1.0 });
        }
    }

    fn nudge_selected(&mut self, steps: f32) {
        let next = self.selected.nudge(&self.params, steps);
        if next == self.params {
            return;
        }
        self.params = next;
        if self.selected.restarts_simulation() {
            self.controller.invalidate();
        }
        log::info!("{} = {}", self.selected.label(), self.selected.get(&self.params));
    }

    fn restore_default_params(&mut self) {
        self.params = FireworkParams::default();
        self.controller.invalidate();
        log::info!("simulation parameters restored to defaults");
    }

    fn set_count(&mut self, count: ParticleCount) {
        self.controller.set_desired(count);
    }

    /// Advances the particles one step and blocks until the buffers hold it.
    fn simulate(&mut self, gpu: &Gpu<'_>, dt: f32) -> Result<()> {
        let Some(state) = self.state.as_mut() else { return Ok(()) };
        let plan = self.controller.begin_step(dt, &self.params);

        if plan.reset {
            state.buffers.reset(gpu.queue());
        }

        match state.cpu.as_mut() {
            Some(cpu) => {
                if plan.reset {
                    cpu.reset(plan.count);
                }
                cpu.step(plan.elapsed, plan.dt, &self.params);
                state.buffers.upload(gpu.queue(), cpu.states());
            }
            None => {
                let commands = state.simulator.dispatch(gpu.device(), gpu.queue(), &plan, &self.params);
                gpu.submit_commands(commands);
                gpu.wait_idle()?;
            }
        }
        Ok(())
    }
}

impl App for FireworkDemo {
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        if let Some(state) = self.state.as_mut() {
            state.compositor.resize(gpu.device(), (size.width, size.height));
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.state.is_none() {
            self.state = Some(FireworkScene::new(ctx.gpu, &self.settings));
        }
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.camera.update(ctx.input, ctx.input_frame);
        self.handle_keys(ctx);

        if let Err(err) = self.simulate(ctx.gpu, ctx.time.dt) {
            log::error!("particle step failed: {err:#}");
            return AppControl::Exit;
        }

        let Some(state) = self.state.as_mut() else {
            return AppControl::Continue;
        };
        let aspect = ctx.gpu.aspect();
        let projection = self.projection.matrix(aspect);
        let view_matrix = self.camera.view();
        let eye = self.camera.eye();
        state.view.write(ctx.gpu.queue(), &CameraUniform::new(view_matrix, projection, eye));
        state.mirror.write(
            ctx.gpu.queue(),
            &CameraUniform::new(mirrored_view(view_matrix), projection, eye * Vec3::new(1.0, -1.0, 1.0)),
        );
        state.sprites.prepare(
            ctx.gpu.device(),
            ctx.gpu.queue(),
            state.compositor.format(),
            self.params.particle_size,
        );

        let count = self.controller.active();
        let (mode, mirror_factor) = (self.mode, self.mirror_factor);
        let FireworkScene {
            scene,
            registry,
            grounds,
            view,
            mirror,
            compositor,
            sprites,
            sprite_groups,
            ..
        } = state;
        let format = compositor.format();

        let control = ctx.render(|rctx, target| {
            compositor.render(rctx, target, mode, mirror_factor, |pass, rpass| {
                let sprites_group = &sprite_groups[pass as usize];
                match pass {
                    ScenePass::Reflection => {
                        scene.draw(rpass, mirror, None, Shading::Lit, format, registry, &[grounds.castle, grounds.base]);
                        sprites.draw(rpass, sprites_group, SpriteStyle::Glow, format, count);
                    }
                    ScenePass::Mask => {
                        scene.draw(rpass, view, None, Shading::Mask, format, registry, &grounds.all());
                        sprites.draw(rpass, sprites_group, SpriteStyle::Silhouette, format, count);
                    }
                    ScenePass::Final => {
                        scene.draw(rpass, view, None, Shading::Lit, format, registry, &grounds.all());
                        sprites.draw(rpass, sprites_group, SpriteStyle::Glow, format, count);
                    }
                }
            });
        });

        let status = format!("{} | {} particles | {}", self.mode.label(), count, self.selected.label());
        self.diagnostics.frame(ctx, &status);
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> FireworkDemo {
        let mut demo = FireworkDemo::new(FireworkSettings::default());
        // Consume the initial reset so later ones are observable.
        demo.controller.begin_step(0.1, &demo.params);
        demo
    }

    fn resets_next_step(demo: &mut FireworkDemo) -> bool {
        demo.controller.begin_step(0.1, &demo.params).reset
    }

    // ── parameter edits ───────────────────────────────────────────────────

    #[test]
    fn defaults_key_restores_every_parameter() {
        let mut demo = demo();
        demo.selected = Tunable::ExplosionForce;
        demo.nudge_selected(3.0);
        demo.selected = Tunable::Gravity;
        demo.nudge_selected(-2.0);
        assert_ne!(demo.params, FireworkParams::default());
        resets_next_step(&mut demo);

        demo.restore_default_params();
        assert_eq!(demo.params, FireworkParams::default());
        assert!(resets_next_step(&mut demo));
    }

    #[test]
    fn particle_size_does_not_restart() {
        let mut demo = demo();
        demo.selected = Tunable::ParticleSize;
        demo.nudge_selected(1.0);
        assert!((demo.params.particle_size - 0.21).abs() < 1e-6);
        assert!(!resets_next_step(&mut demo));
    }

    #[test]
    fn physics_edit_restarts() {
        let mut demo = demo();
        demo.selected = Tunable::Lifespan;
        demo.nudge_selected(1.0);
        assert!(resets_next_step(&mut demo));
    }
}
