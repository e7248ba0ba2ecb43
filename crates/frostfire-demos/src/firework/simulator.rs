use frostfire_engine::render::UniformBuffer;
use frostfire_sim::particles::{FireworkParams, FireworkUniform, StepPlan};

use super::buffers::ParticleBuffers;

/// Compute pipeline running `fireworks.wgsl` over the active prefix.
pub struct ParticleSimulator {
    pipeline: wgpu::ComputePipeline,
    params: UniformBuffer<FireworkUniform>,
    bind_group: wgpu::BindGroup,
}

impl ParticleSimulator {
    pub fn new(device: &wgpu::Device, buffers: &ParticleBuffers) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire fireworks shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/fireworks.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire fireworks bgl"),
            entries: &[
                UniformBuffer::<FireworkUniform>::layout_entry(0, wgpu::ShaderStages::COMPUTE),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire fireworks pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("frostfire fireworks pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params = UniformBuffer::new(device, "frostfire fireworks params");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frostfire fireworks bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.buffer().as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            params,
            bind_group,
        }
    }

    /// Encodes one integration step for `plan.count` particles.
    ///
    /// The caller submits the returned commands and waits for the queue
    /// before drawing from the buffers.
    pub fn dispatch(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        plan: &StepPlan,
        params: &FireworkParams,
    ) -> wgpu::CommandBuffer {
        self.params.write(queue, &params.to_uniform(plan.count.get(), plan.elapsed, plan.dt));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frostfire fireworks encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("frostfire fireworks step"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(plan.count.workgroups(), 1, 1);
        }
        encoder.finish()
    }
}
