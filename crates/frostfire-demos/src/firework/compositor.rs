use bytemuck::{Pod, Zeroable};
use frostfire_engine::render::{begin_pass, Blit, PassTarget, RenderCtx, RenderTarget, RenderTexture, UniformBuffer};
use frostfire_sim::composite::{DisplayMode, ScenePass};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CombineParams {
    mirror_factor: f32,
    _pad: [f32; 3],
}

/// Night sky behind the fireworks.
const SKY: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.03,
    a: 1.0,
};

fn target_index(pass: ScenePass) -> usize {
    match pass {
        ScenePass::Reflection => 0,
        ScenePass::Mask => 1,
        ScenePass::Final => 2,
    }
}

fn clear_color(pass: ScenePass) -> wgpu::Color {
    match pass {
        // Mask background is "not water".
        ScenePass::Mask => wgpu::Color::BLACK,
        ScenePass::Reflection | ScenePass::Final => SKY,
    }
}

/// Reflection, mask and final passes into window-sized targets, then a
/// combine (or a direct blit of one target) onto the surface.
pub struct Compositor {
    format: wgpu::TextureFormat,
    targets: [RenderTexture; 3],
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    params: UniformBuffer<CombineParams>,
    blit: Blit,
}

impl Compositor {
    /// Targets share `format` with the surface so scene pipelines can draw
    /// into either.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: (u32, u32)) -> Self {
        let targets = ScenePass::ORDER.map(|pass| RenderTexture::new(device, pass.label(), size, format, true));

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
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire combine bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                UniformBuffer::<CombineParams>::layout_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire combine shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/combine.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire combine pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frostfire combine pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let params = UniformBuffer::new(device, "frostfire combine params");
        let bind_group = create_bind_group(device, &bind_group_layout, &targets, &params);

        Self {
            format,
            targets,
            bind_group_layout,
            bind_group,
            pipeline,
            params,
            blit: Blit::new(),
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Follows the window size; the combine bind group is rebuilt when any
    /// target was recreated.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        let mut changed = false;
        for target in &mut self.targets {
            changed |= target.resize(device, size);
        }
        if changed {
            self.bind_group = create_bind_group(device, &self.bind_group_layout, &self.targets, &self.params);
        }
    }

    /// Runs the three scene passes in [`ScenePass::ORDER`], each cleared, then
    /// presents according to `mode`.
    ///
    /// `draw` records the content of one pass.
    pub fn render<F>(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        mode: DisplayMode,
        mirror_factor: f32,
        mut draw: F,
    ) where
        F: FnMut(ScenePass, &mut wgpu::RenderPass<'_>),
    {
        for pass in ScenePass::ORDER {
            let t = &self.targets[target_index(pass)];
            let mut rpass = begin_pass(
                target.encoder,
                pass.label(),
                PassTarget::cleared(t.view(), t.depth_view(), clear_color(pass)),
            );
            draw(pass, &mut rpass);
        }

        match mode.shown_target() {
            Some(pass) => {
                let source = self.targets[target_index(pass)].view();
                self.blit.draw(ctx, target.encoder, source, target.color_view, ctx.surface_format, false);
            }
            None => {
                self.params.write(
                    ctx.queue,
                    &CombineParams {
                        mirror_factor,
                        _pad: [0.0; 3],
                    },
                );
                let mut rpass = begin_pass(
                    target.encoder,
                    "combine",
                    PassTarget::cleared(target.color_view, None, wgpu::Color::BLACK),
                );
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.draw(0..3, 0..1);
            }
        }
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    targets: &[RenderTexture; 3],
    params: &UniformBuffer<CombineParams>,
) -> wgpu::BindGroup {
    let view = |pass| wgpu::BindingResource::TextureView(targets[target_index(pass)].view());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frostfire combine bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: view(ScenePass::Final),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: view(ScenePass::Reflection),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: view(ScenePass::Mask),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: params.binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_pass_order() {
        let indices: Vec<usize> = ScenePass::ORDER.iter().map(|&p| target_index(p)).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn mask_clears_to_dry_ground() {
        assert_eq!(clear_color(ScenePass::Mask), wgpu::Color::BLACK);
        assert_ne!(clear_color(ScenePass::Final), wgpu::Color::BLACK);
    }
}
