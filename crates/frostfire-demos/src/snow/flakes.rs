use bytemuck::{Pod, Zeroable};
use frostfire_engine::camera::CameraUniform;
use frostfire_engine::render::{depth_stencil, UniformBuffer};
use frostfire_sim::accumulation::ORTHO_HALF_EXTENT;
use frostfire_sim::particles::ParticleCount;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Height of the box flakes fall through before wrapping.
pub const FALL_HEIGHT: f32 = 50.0;
const FLAKE_SIZE: f32 = 0.08;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FlakeParams {
    time: f32,
    size: f32,
    height: f32,
    _pad: f32,
}

/// Spawn points for `count` flakes: x, z across the accumulation square,
/// y within the fall box, w = fall speed.
pub fn spawn_flakes(count: ParticleCount, seed: u64) -> Vec<[f32; 4]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let e = ORTHO_HALF_EXTENT;
    (0..count.get())
        .map(|_| {
            [
                rng.random_range(-e..e),
                rng.random_range(0.0..FALL_HEIGHT),
                rng.random_range(-e..e),
                rng.random_range(1.5..3.0),
            ]
        })
        .collect()
}

/// Falling snow drawn as alpha-blended billboards.
///
/// The storage buffer is sized for [`ParticleCount::MAX`], so count changes
/// only rewrite the prefix.
pub struct SnowFlakes {
    buffer: wgpu::Buffer,
    params: UniformBuffer<FlakeParams>,
    bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    pipeline: Option<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
    count: ParticleCount,
    seed: u64,
}

impl SnowFlakes {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &UniformBuffer<CameraUniform>,
        count: ParticleCount,
        seed: u64,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frostfire snowflakes"),
            size: u64::from(ParticleCount::MAX.get()) * size_of::<[f32; 4]>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let params = UniformBuffer::new(device, "frostfire snowflake params");

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire snowflake bgl"),
            entries: &[
                UniformBuffer::<CameraUniform>::layout_entry(0, wgpu::ShaderStages::VERTEX),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                UniformBuffer::<FlakeParams>::layout_entry(2, wgpu::ShaderStages::VERTEX),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frostfire snowflake bind group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.binding(),
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire snowflake pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire snowflake shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/snowflakes.wgsl").into()),
        });

        let mut flakes = Self {
            buffer,
            params,
            bind_group,
            pipeline_layout,
            shader,
            pipeline: None,
            count,
            seed,
        };
        flakes.respawn(queue, count);
        flakes
    }

    pub fn count(&self) -> ParticleCount {
        self.count
    }

    /// Replaces every flake with a fresh layout of `count` flakes.
    pub fn respawn(&mut self, queue: &wgpu::Queue, count: ParticleCount) {
        self.count = count;
        let flakes = spawn_flakes(count, self.seed);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&flakes));
        log::info!("snowflakes respawned: {count}");
    }

    /// Advances the fall clock and builds the pipeline for `format`.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat, time: f32) {
        self.params.write(
            queue,
            &FlakeParams {
                time,
                size: FLAKE_SIZE,
                height: FALL_HEIGHT,
                _pad: 0.0,
            },
        );
        if self.pipeline.as_ref().is_some_and(|(f, _)| *f == format) {
            return;
        }
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frostfire snowflake pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_stencil(true, false)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        self.pipeline = Some((format, pipeline));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some((_, pipeline)) = self.pipeline.as_ref() else { return };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..self.count.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flakes_fill_the_fall_box() {
        let flakes = spawn_flakes(ParticleCount::MIN, 3);
        assert_eq!(flakes.len(), 256);
        for [x, y, z, speed] in flakes {
            assert!(x.abs() <= ORTHO_HALF_EXTENT && z.abs() <= ORTHO_HALF_EXTENT);
            assert!((0.0..FALL_HEIGHT).contains(&y));
            assert!(speed > 0.0);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let count = ParticleCount::new(512).unwrap();
        assert_eq!(spawn_flakes(count, 9), spawn_flakes(count, 9));
        assert_ne!(spawn_flakes(count, 9), spawn_flakes(count, 10));
    }

    #[test]
    fn params_block_is_one_vec4() {
        assert_eq!(size_of::<FlakeParams>(), 16);
    }
}
