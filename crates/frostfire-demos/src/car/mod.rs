//! Car scene: a car loops along a lamp-lit road past houses and a forest.
//!
//! Keys:
//! - `P` switch first-person / orbit camera, `Space` pause the car
//! - `F` fog, `N` night vision, `T` toon shading
//! - `Minus` / `Equal` fewer / more toon levels
//! - first person: WASD moves, Q/E lowers/raises, right drag looks, shift sprints
//! - orbit: left drag orbits, wheel zooms

use std::rc::Rc;

use anyhow::{Context, Result};
use frostfire_engine::camera::{CameraUniform, FlyCamera, OrbitCamera, Projection};
use frostfire_engine::core::{App, AppControl, FrameCtx};
use frostfire_engine::device::Gpu;
use frostfire_engine::input::Key;
use frostfire_engine::render::{begin_pass, DepthBuffer, Mesh, MeshData, PassTarget};
use frostfire_sim::forest::{generate_forest, TreeInstance};
use frostfire_sim::traffic::{street_lamp_x, BlinkingLamp, CarAnimation, BLINKING_LAMP, STREET_LAMP_COUNT};
use glam::{Mat4, Quat, Vec3};
use winit::dpi::PhysicalSize;

use crate::diagnostics::Diagnostics;
use crate::scene::{
    shapes, Light, LightsUniform, Material, ObjectId, Pattern, SceneObject, SceneParams, SceneRegistry,
    SceneRenderer, SceneView, Shading,
};
use crate::settings::CarSettings;

/// Top of the ground slab; everything stands on it.
const GROUND_Y: f32 = -0.45;
const BULB_HEIGHT: f32 = 0.48;
const LAMP_Z: f32 = -0.34;
const FOG_COLOR: Vec3 = Vec3::splat(0.2);

const BULB_ON: Vec3 = Vec3::new(1.0, 1.0, 0.1);
const BULB_OFF: Vec3 = Vec3::splat(0.05);

/// `(x, z, rotation_degrees)` of each house.
const HOUSES: [(f32, f32, f32); 4] = [(1.7, -3.5, 180.0), (-10.0, -3.5, -90.0), (-5.0, -3.5, -90.0), (6.7, -2.0, 90.0)];
const HOUSE_COLORS: [Vec3; 4] = [
    Vec3::new(0.85, 0.8, 0.7),
    Vec3::new(0.7, 0.45, 0.35),
    Vec3::new(0.8, 0.75, 0.5),
    Vec3::new(0.6, 0.65, 0.75),
];

/// `(x, z, width, depth)` of the paths leading to the houses.
const PATHWAYS: [(f32, f32, f32, f32); 6] = [
    (1.7, -1.3, 0.3, 1.0),
    (-10.0, -1.3, 0.2, 1.5),
    (-5.54, -1.5, 0.18, 1.2),
    (7.64, -1.0, 0.45, 1.0),
    (6.79, -1.3, 0.4, 0.12),
    (6.27, -1.63, 0.12, 0.45),
];

/// Tree in front of the first house, placed by hand.
const FRONT_TREE: TreeInstance = TreeInstance {
    x: 1.0,
    z: -1.0,
    scale: 2.0,
    rotation_degrees: 0.0,
    variant: 3,
};

fn lamp_position(i: usize) -> Vec3 {
    Vec3::new(street_lamp_x(i), BULB_HEIGHT, LAMP_Z)
}

/// Every light of the car scene for one frame: the sun first, then the
/// street lamps (minus the blinking one while it is off), then the car.
pub fn scene_lights(car: &CarAnimation, lamp_on: bool, night_vision: bool) -> Vec<Light> {
    let sun = if night_vision { 1.0 } else { 0.1 };
    let mut lights = vec![Light::directional(Vec3::ONE, sun, sun, sun)];

    let lamp_dir = Vec3::new(0.0, -1.0, 0.3);
    for i in 0..STREET_LAMP_COUNT {
        if i == BLINKING_LAMP && !lamp_on {
            continue;
        }
        lights.push(Light::spot(lamp_position(i), lamp_dir, 45.0, 75.0, Vec3::new(1.0, 1.0, 0.3)));
    }

    let [front_l, front_r, rear_l, rear_r] = car.spot_positions();
    for p in [front_l, front_r] {
        lights.push(Light::spot(p, Vec3::X, 30.0, 45.0, Vec3::ONE));
    }
    for p in [rear_l, rear_r] {
        lights.push(Light::spot(p, -Vec3::X, 30.0, 60.0, Vec3::new(0.1, 0.0, 0.0)));
    }
    lights
}

fn clear_color(fog: bool, night_vision: bool) -> wgpu::Color {
    let c = if fog {
        FOG_COLOR
    } else if night_vision {
        Vec3::new(0.35, 0.4, 0.5)
    } else {
        Vec3::new(0.01, 0.01, 0.04)
    };
    wgpu::Color {
        r: c.x as f64,
        g: c.y as f64,
        b: c.z as f64,
        a: 1.0,
    }
}

fn slab(center: Vec3, size: Vec3) -> Mat4 {
    Mat4::from_translation(center) * Mat4::from_scale(size)
}

struct CarScene {
    scene: SceneRenderer,
    registry: SceneRegistry,
    view: SceneView,
    depth: DepthBuffer,
    /// Lit objects that never move.
    scenery: Vec<ObjectId>,
    bulbs: Vec<ObjectId>,
    car_body: ObjectId,
    car_wheels: ObjectId,
    /// Front pair first.
    car_lamps: [ObjectId; 4],
}

impl CarScene {
    fn new(gpu: &Gpu<'_>, settings: &CarSettings) -> Result<Self> {
        let device = gpu.device();
        let size = gpu.size();
        let format = gpu.surface_format();

        let mut trees = generate_forest(&settings.forest).context("failed to lay out the forest")?;
        trees.push(FRONT_TREE);
        log::info!("forest: {} trees", trees.len());

        let mut registry = SceneRegistry::new();
        let mut scenery = Vec::new();
        let cube = Rc::new(Mesh::upload(device, "cube", &MeshData::cube()));

        scenery.push(registry.push(
            SceneObject::new(
                cube.clone(),
                slab(Vec3::new(0.0, -0.46, 0.0), Vec3::new(60.0, 0.02, 30.0)),
                Material::phong(Vec3::new(0.25, 0.4, 0.2)),
            )
            .with_pattern(Pattern::Noise, 30.0),
        ));
        scenery.push(registry.push(
            SceneObject::new(
                cube.clone(),
                slab(Vec3::new(0.0, -0.45, 0.45), Vec3::new(60.0, 0.02, 2.0)),
                Material::phong(Vec3::splat(0.35)),
            )
            .with_pattern(Pattern::Stripes, 30.0),
        ));
        for (x, z, w, d) in PATHWAYS {
            scenery.push(registry.push(
                SceneObject::new(
                    cube.clone(),
                    slab(Vec3::new(x, -0.455, z), Vec3::new(2.0 * w, 0.02, 2.0 * d)),
                    Material::phong(Vec3::new(0.6, 0.55, 0.5)),
                )
                .with_pattern(Pattern::Checker, 10.0 * w.max(d)),
            ));
        }

        let house = Rc::new(Mesh::upload(device, "house", &shapes::house()));
        for ((x, z, rotation), color) in HOUSES.into_iter().zip(HOUSE_COLORS) {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(1.5),
                Quat::from_rotation_y(rotation.to_radians()),
                Vec3::new(x, GROUND_Y, z),
            );
            scenery.push(registry.push(SceneObject::new(house.clone(), model, Material::phong(color))));
        }

        let (trunks, leaves) = shapes::forest(&trees, GROUND_Y);
        let trunks = Rc::new(Mesh::upload(device, "tree trunks", &trunks));
        let leaves = Rc::new(Mesh::upload(device, "tree foliage", &leaves));
        scenery.push(registry.push(SceneObject::new(
            trunks,
            Mat4::IDENTITY,
            Material::phong(Vec3::new(0.4, 0.26, 0.13)),
        )));
        scenery.push(registry.push(
            SceneObject::new(leaves, Mat4::IDENTITY, Material::phong(Vec3::new(0.1, 0.45, 0.15)))
                .with_pattern(Pattern::Noise, 3.0),
        ));

        let lamp = Rc::new(Mesh::upload(device, "lamp post", &shapes::lamp_post()));
        let bulb = Rc::new(Mesh::upload(device, "bulb", &MeshData::uv_sphere(12, 8)));
        let mut bulbs = Vec::with_capacity(STREET_LAMP_COUNT);
        for i in 0..STREET_LAMP_COUNT {
            let p = lamp_position(i);
            let post = SceneObject::new(lamp.clone(), Mat4::from_translation(p), Material {
                ambient: Vec3::splat(0.01),
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                shininess: 10.0,
            });
            scenery.push(registry.push(post));
            let model = Mat4::from_translation(p)
                * Mat4::from_rotation_x((-5f32).to_radians())
                * Mat4::from_scale(Vec3::new(0.028, 0.01, 0.04));
            bulbs.push(registry.push(SceneObject::new(bulb.clone(), model, Material::emissive(BULB_ON))));
        }

        let body = Rc::new(Mesh::upload(device, "car body", &shapes::car_body()));
        let wheels = Rc::new(Mesh::upload(device, "car wheels", &shapes::car_wheels()));
        let car_body = registry.push(SceneObject::new(body, Mat4::IDENTITY, Material {
            specular: Vec3::splat(0.6),
            shininess: 32.0,
            ..Material::phong(Vec3::new(0.75, 0.1, 0.1))
        }));
        let car_wheels = registry.push(SceneObject::new(wheels, Mat4::IDENTITY, Material::phong(Vec3::splat(0.05))));
        let car_lamps = [Vec3::ONE, Vec3::ONE, Vec3::X, Vec3::X]
            .map(|color| registry.push(SceneObject::new(cube.clone(), Mat4::IDENTITY, Material::emissive(color))));

        let mut scene = SceneRenderer::new(device);
        for shading in [Shading::Lit, Shading::Unlit] {
            scene.prepare(device, shading, format);
        }
        let view = scene.create_view(device, "frostfire car camera");

        Ok(Self {
            scene,
            registry,
            view,
            depth: DepthBuffer::new(device, "car scene", (size.width, size.height)),
            scenery,
            bulbs,
            car_body,
            car_wheels,
            car_lamps,
        })
    }

    /// Moves the car and its lamps, recolors the blinking bulb.
    fn update_objects(&mut self, car: &CarAnimation, lamp_on: bool) {
        let model = Mat4::from_translation(car.position);
        self.registry.get_mut(self.car_body).model = model;
        self.registry.get_mut(self.car_wheels).model = model;

        for (i, (id, p)) in self.car_lamps.iter().zip(car.light_positions()).enumerate() {
            let (tilt, size) = if i < 2 {
                (22f32.to_radians(), Vec3::new(0.01, 0.024, 0.066))
            } else {
                (0.0, Vec3::new(0.018, 0.02, 0.03))
            };
            self.registry.get_mut(*id).model =
                Mat4::from_translation(p) * Mat4::from_rotation_z(tilt) * Mat4::from_scale(size);
        }

        let bulb = self.bulbs[BLINKING_LAMP];
        self.registry.get_mut(bulb).material = Material::emissive(if lamp_on { BULB_ON } else { BULB_OFF });
    }
}

/// The car scene application.
pub struct CarDemo {
    settings: CarSettings,
    car: CarAnimation,
    lamp: BlinkingLamp,
    orbit: OrbitCamera,
    fly: FlyCamera,
    first_person: bool,
    diagnostics: Diagnostics,
    state: Option<CarScene>,
}

impl CarDemo {
    pub fn new(settings: CarSettings, seed: u64) -> Self {
        let mut fly = FlyCamera::new(Vec3::new(0.0, -0.25, 0.5), -std::f32::consts::FRAC_PI_2, 0.0);
        fly.speed = 1.0;
        fly.sprint_multiplier = 10.0;
        Self {
            lamp: BlinkingLamp::new(seed, settings.blink_interval),
            first_person: settings.first_person,
            settings,
            car: CarAnimation::default(),
            orbit: OrbitCamera::new(0.0, 25f32.to_radians(), 12.0),
            fly,
            diagnostics: Diagnostics::new("car"),
            state: None,
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) {
        let pressed = |k| ctx.input_frame.key_pressed(k);

        if pressed(Key::P) {
            self.first_person = !self.first_person;
            log::info!("camera: {}", self.camera_label());
        }
        if pressed(Key::Space) {
            self.car.toggle_pause();
        }
        if pressed(Key::F) {
            self.settings.fog = !self.settings.fog;
            log::info!("fog {}", on_off(self.settings.fog));
        }
        if pressed(Key::N) {
            self.settings.night_vision = !self.settings.night_vision;
            log::info!("night vision {}", on_off(self.settings.night_vision));
        }
        if pressed(Key::T) {
            self.settings.toon_shading = !self.settings.toon_shading;
            log::info!("toon shading {}", on_off(self.settings.toon_shading));
        }
        if pressed(Key::Equal) || pressed(Key::Minus) {
            let levels = if pressed(Key::Equal) {
                self.settings.toon_levels + 1
            } else {
                self.settings.toon_levels.saturating_sub(1)
            };
            self.settings.toon_levels = levels.clamp(4, 20);
            log::info!("toon levels: {}", self.settings.toon_levels);
        }
    }

    fn camera_label(&self) -> &'static str {
        if self.first_person { "first person" } else { "orbit" }
    }

    fn camera(&self, aspect: f32) -> CameraUniform {
        if self.first_person {
            let projection = Projection {
                fov_y: 65f32.to_radians(),
                near: 0.01,
                far: 1000.0,
            };
            CameraUniform::new(self.fly.view(), projection.matrix(aspect), self.fly.position)
        } else {
            let projection = Projection {
                near: 0.01,
                far: 1000.0,
                ..Projection::default()
            };
            CameraUniform::new(self.orbit.view(), projection.matrix(aspect), self.orbit.eye())
        }
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

impl App for CarDemo {
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        if let Some(state) = self.state.as_mut() {
            state.depth.resize(gpu.device(), (size.width, size.height));
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.state.is_none() {
            match CarScene::new(ctx.gpu, &self.settings) {
                Ok(scene) => self.state = Some(scene),
                Err(err) => {
                    log::error!("car scene setup failed: {err:#}");
                    return AppControl::Exit;
                }
            }
        }
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let dt = ctx.time.dt;
        if self.first_person {
            self.fly.update(ctx.input, ctx.input_frame, dt);
        } else {
            self.orbit.update(ctx.input, ctx.input_frame);
        }
        self.handle_keys(ctx);

        self.car.advance(dt);
        if self.lamp.update(ctx.time.elapsed as f32) {
            log::trace!("blinking lamp {}", on_off(self.lamp.is_on()));
        }

        let aspect = ctx.gpu.aspect();
        let camera = self.camera(aspect);
        let lamp_on = self.lamp.is_on();
        let settings = &self.settings;

        let Some(state) = self.state.as_mut() else {
            return AppControl::Continue;
        };
        let device = ctx.gpu.device();
        let queue = ctx.gpu.queue();
        let format = ctx.gpu.surface_format();

        state.update_objects(&self.car, lamp_on);
        state.scene.write_objects(device, queue, &state.registry);
        state.scene.write_lights(
            queue,
            &LightsUniform::new(Vec3::ZERO, &scene_lights(&self.car, lamp_on, settings.night_vision)),
        );
        state.scene.write_params(
            queue,
            &SceneParams::default()
                .with_fog(settings.fog, FOG_COLOR, settings.fog_density)
                .with_toon(settings.toon_shading.then_some(settings.toon_levels)),
        );
        state.view.write(queue, &camera);

        let clear = clear_color(settings.fog, settings.night_vision);
        let CarScene {
            scene,
            registry,
            view,
            depth,
            scenery,
            bulbs,
            car_body,
            car_wheels,
            car_lamps,
        } = state;

        let control = ctx.render(|_rctx, target| {
            let mut pass = begin_pass(
                target.encoder,
                "car scene",
                PassTarget::cleared(target.color_view, Some(depth.view()), clear),
            );
            scene.draw(&mut pass, view, None, Shading::Lit, format, registry, scenery.iter());
            scene.draw(&mut pass, view, None, Shading::Lit, format, registry, &[*car_body, *car_wheels]);
            scene.draw(&mut pass, view, None, Shading::Unlit, format, registry, bulbs.iter().chain(car_lamps.iter()));
        });

        let status = format!(
            "{} | fog {} | toon {} | night vision {}",
            self.camera_label(),
            on_off(self.settings.fog),
            on_off(self.settings.toon_shading),
            on_off(self.settings.night_vision)
        );
        self.diagnostics.frame(ctx, &status);
        control
    }
}
