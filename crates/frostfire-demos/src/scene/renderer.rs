use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use frostfire_engine::camera::CameraUniform;
use frostfire_engine::render::{depth_stencil, linear_sampler, DynamicUniforms, UniformBuffer, Vertex};
use glam::{Mat4, Vec3};

use super::lights::LightsUniform;
use super::object::{ObjectId, ObjectUniform, SceneRegistry};

/// Fragment stage used for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Phong with fog, toon steps and snow coverage.
    Lit,
    /// Ambient color only (bulbs, light markers).
    Unlit,
    /// Water flag as grayscale.
    Mask,
    /// Overhead pass feeding the snow deposit.
    Overhead,
    /// Writes zero into an accumulation target; no depth attachment.
    Broom,
    /// Plane grid lifted by the overhead depth plus the accumulated snow.
    SnowTerrain,
}

impl Shading {
    fn entry_point(self) -> &'static str {
        match self {
            Shading::Lit => "fs_lit",
            Shading::Unlit => "fs_unlit",
            Shading::Mask => "fs_mask",
            Shading::Overhead => "fs_overhead",
            Shading::Broom => "fs_broom",
            Shading::SnowTerrain => "fs_snow_terrain",
        }
    }

    fn vertex_entry_point(self) -> &'static str {
        match self {
            Shading::SnowTerrain => "vs_snow_terrain",
            _ => "vs_main",
        }
    }

    fn uses_depth(self) -> bool {
        !matches!(self, Shading::Broom)
    }

    /// Passes that feed the mask or the accumulation always fill.
    fn polygon_mode(self, wireframe: bool) -> wgpu::PolygonMode {
        match self {
            Shading::Lit | Shading::Unlit | Shading::SnowTerrain if wireframe => wgpu::PolygonMode::Line,
            _ => wgpu::PolygonMode::Fill,
        }
    }
}

/// Scene-wide switches (`group(0) binding(2)`).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneParams {
    pub snow_matrix: [[f32; 4]; 4],
    pub fog_color: [f32; 4],
    pub fog_density: f32,
    pub fog: u32,
    /// 0 disables toon shading.
    pub toon_levels: u32,
    pub use_snow: u32,
    pub max_snow_depth: f32,
    pub _pad: [f32; 3],
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            snow_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            fog_color: [0.2, 0.2, 0.2, 1.0],
            fog_density: 0.0,
            fog: 0,
            toon_levels: 0,
            use_snow: 0,
            max_snow_depth: 1.0,
            _pad: [0.0; 3],
        }
    }
}

impl SceneParams {
    pub fn with_fog(mut self, enabled: bool, color: Vec3, density: f32) -> Self {
        self.fog = u32::from(enabled);
        self.fog_color = color.extend(1.0).to_array();
        self.fog_density = density;
        self
    }

    pub fn with_toon(mut self, levels: Option<u32>) -> Self {
        self.toon_levels = levels.unwrap_or(0);
        self
    }

    pub fn with_snow(mut self, snow_matrix: Mat4, max_depth: f32) -> Self {
        self.use_snow = 1;
        self.snow_matrix = snow_matrix.to_cols_array_2d();
        self.max_snow_depth = max_depth;
        self
    }
}

/// Camera block plus the globals bind group for one point of view.
pub struct SceneView {
    camera: UniformBuffer<CameraUniform>,
    bind_group: wgpu::BindGroup,
}

impl SceneView {
    pub fn write(&self, queue: &wgpu::Queue, camera: &CameraUniform) {
        self.camera.write(queue, camera);
    }

    pub fn camera(&self) -> &UniformBuffer<CameraUniform> {
        &self.camera
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    shading: Shading,
    format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
}

/// Draws registry objects with the shared `scene.wgsl` program.
///
/// Pipelines are created lazily per (shading, format) through [`prepare`],
/// which must run before the render pass borrowing the encoder begins.
///
/// [`prepare`]: SceneRenderer::prepare
pub struct SceneRenderer {
    shader: wgpu::ShaderModule,
    globals_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    snow_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    lights: UniformBuffer<LightsUniform>,
    params: UniformBuffer<SceneParams>,
    objects: DynamicUniforms<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    no_snow: wgpu::BindGroup,
    wireframe: bool,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let vf = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire scene globals bgl"),
            entries: &[
                UniformBuffer::<CameraUniform>::layout_entry(0, vf),
                UniformBuffer::<LightsUniform>::layout_entry(1, wgpu::ShaderStages::FRAGMENT),
                UniformBuffer::<SceneParams>::layout_entry(2, vf),
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire scene object bgl"),
            entries: &[DynamicUniforms::<ObjectUniform>::layout_entry(0, vf)],
        });
        let snow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire scene snow bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: vf,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: vf,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: vf,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire scene pipeline layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, &snow_layout],
            immediate_size: 0,
        });

        let lights = UniformBuffer::new(device, "frostfire scene lights");
        let params = UniformBuffer::new(device, "frostfire scene params");
        let objects = DynamicUniforms::new(device, "frostfire scene objects", 16);
        let object_bind_group = create_object_bind_group(device, &object_layout, &objects);
        let sampler = linear_sampler(device, "frostfire scene snow sampler");
        let no_snow = create_placeholder_snow(device, &snow_layout, &sampler);

        Self {
            shader,
            globals_layout,
            object_layout,
            snow_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            lights,
            params,
            objects,
            object_bind_group,
            sampler,
            no_snow,
            wireframe: false,
        }
    }

    /// Switches lit and unlit draws to line polygons. Returns whether
    /// wireframe is now active, which needs `POLYGON_MODE_LINE` on the device.
    pub fn set_wireframe(&mut self, device: &wgpu::Device, wireframe: bool) -> bool {
        let supported = device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        if wireframe && !supported {
            log::warn!("wireframe unavailable: device lacks POLYGON_MODE_LINE");
        }
        self.wireframe = wireframe && supported;
        self.wireframe
    }

    fn key(&self, shading: Shading, format: wgpu::TextureFormat) -> PipelineKey {
        PipelineKey { shading, format, polygon_mode: shading.polygon_mode(self.wireframe) }
    }

    /// New camera slot sharing this renderer's lights and params.
    pub fn create_view(&self, device: &wgpu::Device, label: &str) -> SceneView {
        let camera = UniformBuffer::new(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.lights.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.params.binding(),
                },
            ],
        });
        SceneView { camera, bind_group }
    }

    /// Bind group exposing the overhead depth and an accumulation texture
    /// to the lit stage.
    pub fn snow_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        overhead_depth: &wgpu::TextureView,
        accumulation: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        create_snow_bind_group(device, label, &self.snow_layout, overhead_depth, accumulation, &self.sampler)
    }

    pub fn write_lights(&self, queue: &wgpu::Queue, lights: &LightsUniform) {
        self.lights.write(queue, lights);
    }

    pub fn write_params(&self, queue: &wgpu::Queue, params: &SceneParams) {
        self.params.write(queue, params);
    }

    /// Uploads every object block; slot `i` belongs to `ObjectId` index `i`.
    pub fn write_objects(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, registry: &SceneRegistry) {
        if self.objects.write_all(device, queue, &registry.uniforms()) {
            self.object_bind_group = create_object_bind_group(device, &self.object_layout, &self.objects);
        }
    }

    /// Builds the pipeline for `shading` into `format` (in the current
    /// polygon mode) if it does not exist yet.
    pub fn prepare(&mut self, device: &wgpu::Device, shading: Shading, format: wgpu::TextureFormat) {
        let key = self.key(shading, format);
        if self.pipelines.contains_key(&key) {
            return;
        }
        let pipeline = self.create_pipeline(device, key);
        log::debug!("scene pipeline {shading:?} ({:?}) created for {format:?}", key.polygon_mode);
        self.pipelines.insert(key, pipeline);
    }

    /// Records one draw per id. Missing pipelines skip the batch.
    pub fn draw<'a>(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        view: &SceneView,
        snow: Option<&wgpu::BindGroup>,
        shading: Shading,
        format: wgpu::TextureFormat,
        registry: &SceneRegistry,
        ids: impl IntoIterator<Item = &'a ObjectId>,
    ) {
        let Some(pipeline) = self.pipelines.get(&self.key(shading, format)) else {
            log::warn!("scene pipeline {shading:?} for {format:?} used before prepare");
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &view.bind_group, &[]);
        pass.set_bind_group(2, snow.unwrap_or(&self.no_snow), &[]);

        for &id in ids {
            if id.index() >= self.objects.capacity() {
                continue;
            }
            let offset = DynamicUniforms::<ObjectUniform>::offset(id.index());
            pass.set_bind_group(1, &self.object_bind_group, &[offset]);
            registry.get(id).mesh.draw(pass);
        }
    }

    fn create_pipeline(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let label = format!("frostfire scene {:?} pipeline", key.shading);
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(key.shading.vertex_entry_point()),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(key.shading.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Mirrored views flip winding.
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                polygon_mode: key.polygon_mode,
                ..Default::default()
            },
            depth_stencil: key.shading.uses_depth().then(|| depth_stencil(true, true)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    objects: &DynamicUniforms<ObjectUniform>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frostfire scene object bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: objects.binding(),
        }],
    })
}

fn create_snow_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    depth: &wgpu::TextureView,
    accumulation: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(depth),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(accumulation),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// 1x1 stand-ins bound when a scene has no snow layer.
fn create_placeholder_snow(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let texture = |label: &str, format| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    };
    let depth = texture("frostfire no-snow depth", frostfire_engine::device::DEPTH_FORMAT);
    let accumulation = texture("frostfire no-snow accumulation", wgpu::TextureFormat::R16Float);
    create_snow_bind_group(device, "frostfire no-snow bind group", layout, &depth, &accumulation, sampler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_block_is_std140_sized() {
        assert_eq!(size_of::<SceneParams>(), 112);
    }

    #[test]
    fn broom_has_no_depth() {
        assert!(!Shading::Broom.uses_depth());
        assert!(Shading::Overhead.uses_depth());
    }

    #[test]
    fn wireframe_leaves_feedback_passes_filled() {
        for shading in [Shading::Lit, Shading::Unlit, Shading::SnowTerrain] {
            assert_eq!(shading.polygon_mode(true), wgpu::PolygonMode::Line);
            assert_eq!(shading.polygon_mode(false), wgpu::PolygonMode::Fill);
        }
        for shading in [Shading::Mask, Shading::Overhead, Shading::Broom] {
            assert_eq!(shading.polygon_mode(true), wgpu::PolygonMode::Fill);
        }
    }

    #[test]
    fn snow_terrain_displaces_in_its_own_vertex_stage() {
        assert_eq!(Shading::SnowTerrain.vertex_entry_point(), "vs_snow_terrain");
        assert_eq!(Shading::Lit.vertex_entry_point(), "vs_main");
        assert!(Shading::SnowTerrain.uses_depth());
    }

    #[test]
    fn builders_set_flags() {
        let p = SceneParams::default()
            .with_fog(true, Vec3::splat(0.2), 0.15)
            .with_toon(Some(10))
            .with_snow(Mat4::IDENTITY, 1.0);
        assert_eq!(p.fog, 1);
        assert_eq!(p.toon_levels, 10);
        assert_eq!(p.use_snow, 1);
        assert_eq!(SceneParams::default().with_toon(None).toon_levels, 0);
    }
}
