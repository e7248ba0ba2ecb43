use bytemuck::{Pod, Zeroable};
use frostfire_engine::render::{begin_pass, DepthBuffer, PassTarget, RenderTexture, UniformBuffer};
use frostfire_sim::accumulation::{PingPong, Slot, ACCUMULATION_SIZE, SNOW_MAX_DEPTH};

/// Single-channel float keeps fine deposits from quantizing away.
pub const ACCUMULATION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;
pub const OVERHEAD_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct AccumulateParams {
    amount: f32,
    max_depth: f32,
    _pad: [f32; 2],
}

/// GPU side of the snow feedback loop.
///
/// Owns the two accumulation fields, the scratch field the deposit lands in
/// and the overhead targets (color alpha marks open surfaces, depth is
/// sampled by the lit pass). Tick order matches
/// `frostfire_sim::accumulation::SnowAccumulation::tick`.
pub struct SnowAccumulator {
    fields: PingPong<RenderTexture>,
    scratch: RenderTexture,
    overhead: RenderTexture,
    overhead_depth: DepthBuffer,
    params: UniformBuffer<AccumulateParams>,
    deposit_amount: f32,
    deposit_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    /// Indexed by the read slot of the tick.
    deposit_groups: [wgpu::BindGroup; 2],
    blur_group: wgpu::BindGroup,
}

impl SnowAccumulator {
    pub fn new(device: &wgpu::Device, deposit_amount: f32) -> Self {
        let size = (ACCUMULATION_SIZE, ACCUMULATION_SIZE);
        let field = |name| RenderTexture::new(device, name, size, ACCUMULATION_FORMAT, false);
        let fields = PingPong::new(field("snow field a"), field("snow field b"));
        let scratch = field("snow scratch");
        let overhead = RenderTexture::new(device, "snow overhead", size, OVERHEAD_FORMAT, false);
        let overhead_depth = DepthBuffer::new(device, "snow overhead", size);

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire accumulate bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                UniformBuffer::<AccumulateParams>::layout_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire accumulate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/snow_accumulate.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire accumulate pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });
        let pipeline = |entry_point: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("frostfire accumulate {entry_point}")),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ACCUMULATION_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };
        let deposit_pipeline = pipeline("fs_deposit");
        let blur_pipeline = pipeline("fs_blur");

        let params = UniformBuffer::new(device, "frostfire accumulate params");
        let group = |label: &str, source: &RenderTexture| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(overhead.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params.binding(),
                    },
                ],
            })
        };
        let deposit_groups = [
            group("frostfire deposit from a", fields.get(Slot::A)),
            group("frostfire deposit from b", fields.get(Slot::B)),
        ];
        let blur_group = group("frostfire blur", &scratch);

        Self {
            fields,
            scratch,
            overhead,
            overhead_depth,
            params,
            deposit_amount,
            deposit_pipeline,
            blur_pipeline,
            deposit_groups,
            blur_group,
        }
    }

    pub fn overhead(&self) -> &RenderTexture {
        &self.overhead
    }

    /// Depth of the overhead pass; the lit pass compares against it.
    pub fn overhead_depth(&self) -> &wgpu::TextureView {
        self.overhead_depth.view()
    }

    /// Clears and opens this frame's overhead pass.
    pub fn begin_overhead<'e>(&self, encoder: &'e mut wgpu::CommandEncoder) -> wgpu::RenderPass<'e> {
        begin_pass(
            encoder,
            "snow overhead",
            PassTarget::cleared(self.overhead.view(), Some(self.overhead_depth.view()), wgpu::Color::TRANSPARENT),
        )
    }

    pub fn deposit_amount(&self) -> f32 {
        self.deposit_amount
    }

    pub fn set_deposit_amount(&mut self, amount: f32) {
        self.deposit_amount = amount.max(0.0);
    }

    /// Slot holding the most recent state.
    pub fn latest_slot(&self) -> Slot {
        self.fields.read_slot().other()
    }

    /// Most recently completed state; what the lit pass samples.
    pub fn latest_view(&self) -> &wgpu::TextureView {
        self.fields.write().view()
    }

    pub fn field(&self, slot: Slot) -> &RenderTexture {
        self.fields.get(slot)
    }

    /// One quantum: swap roles, deposit `read` into scratch, blur scratch
    /// into `write`. This frame's overhead pass must already be recorded on
    /// `encoder`.
    pub fn tick(&mut self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder) {
        self.params.write(
            queue,
            &AccumulateParams {
                amount: self.deposit_amount,
                max_depth: SNOW_MAX_DEPTH,
                _pad: [0.0; 2],
            },
        );
        self.fields.swap();

        {
            let mut pass = begin_pass(
                encoder,
                "snow deposit",
                PassTarget::cleared(self.scratch.view(), None, wgpu::Color::BLACK),
            );
            pass.set_pipeline(&self.deposit_pipeline);
            pass.set_bind_group(0, &self.deposit_groups[self.fields.read_index()], &[]);
            pass.draw(0..3, 0..1);
        }

        let mut pass = begin_pass(
            encoder,
            "snow blur",
            PassTarget::cleared(self.fields.write().view(), None, wgpu::Color::BLACK),
        );
        pass.set_pipeline(&self.blur_pipeline);
        pass.set_bind_group(0, &self.blur_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Opens a pass that draws straight into the latest field without
    /// clearing it. Broom strokes do not consume a tick.
    pub fn sweep<'e>(&self, encoder: &'e mut wgpu::CommandEncoder) -> wgpu::RenderPass<'e> {
        begin_pass(encoder, "snow sweep", PassTarget::loaded(self.fields.write().view(), None))
    }

    /// Zeroes both fields; the read slot is left as is.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        for slot in [Slot::A, Slot::B] {
            begin_pass(
                encoder,
                "snow clear",
                PassTarget::cleared(self.fields.get(slot).view(), None, wgpu::Color::BLACK),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostfire_sim::accumulation::SnowAccumulation;

    #[test]
    fn params_block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<AccumulateParams>(), 16);
    }

    #[test]
    fn latest_is_the_write_side_after_a_tick() {
        // Slot bookkeeping mirrors the CPU model.
        let mut fields = PingPong::new((), ());
        let mut model = SnowAccumulation::new(4, 0.1);
        fields.swap();
        model.tick(|_, _| true);
        assert_eq!(fields.read_slot(), model.read_slot());
        assert_eq!(fields.read_slot().other(), Slot::A);
    }
}
