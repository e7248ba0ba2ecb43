use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use frostfire_engine::camera::CameraUniform;
use frostfire_engine::render::{additive_blend, depth_stencil, UniformBuffer};
use frostfire_sim::particles::ParticleCount;

use super::buffers::ParticleBuffers;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteParams {
    size: f32,
    silhouette: u32,
    _pad: [u32; 2],
}

/// How sprites land in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteStyle {
    /// Additive glow, depth tested, no depth write.
    Glow,
    /// Flat black, drawn over everything (mask pass).
    Silhouette,
}

/// Billboard renderer reading particle states straight from storage.
pub struct ParticleRenderer {
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<(SpriteStyle, wgpu::TextureFormat), wgpu::RenderPipeline>,
    glow: UniformBuffer<SpriteParams>,
    silhouette: UniformBuffer<SpriteParams>,
}

impl ParticleRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frostfire particle sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/particles.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frostfire particle sprite bgl"),
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
                UniformBuffer::<SpriteParams>::layout_entry(
                    2,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frostfire particle sprite pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Self {
            shader,
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            glow: UniformBuffer::new(device, "frostfire particle glow params"),
            silhouette: UniformBuffer::new(device, "frostfire particle silhouette params"),
        }
    }

    /// Bind group for drawing `buffers` through `camera` in `style`.
    ///
    /// Both inputs are stable for the renderer's lifetime, so callers build
    /// these once per view.
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        camera: &UniformBuffer<CameraUniform>,
        buffers: &ParticleBuffers,
        style: SpriteStyle,
    ) -> wgpu::BindGroup {
        let params = match style {
            SpriteStyle::Glow => &self.glow,
            SpriteStyle::Silhouette => &self.silhouette,
        };
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frostfire particle sprite bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.binding(),
                },
            ],
        })
    }

    /// Updates the sprite size and builds pipelines for `format`.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat, size: f32) {
        for (style, params) in [(SpriteStyle::Glow, &self.glow), (SpriteStyle::Silhouette, &self.silhouette)] {
            params.write(
                queue,
                &SpriteParams {
                    size,
                    silhouette: u32::from(style == SpriteStyle::Silhouette),
                    _pad: [0; 2],
                },
            );
        }
        for style in [SpriteStyle::Glow, SpriteStyle::Silhouette] {
            if !self.pipelines.contains_key(&(style, format)) {
                let pipeline = self.create_pipeline(device, style, format);
                self.pipelines.insert((style, format), pipeline);
            }
        }
    }

    /// Draws the active prefix as camera-facing quads.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        bind_group: &wgpu::BindGroup,
        style: SpriteStyle,
        format: wgpu::TextureFormat,
        count: ParticleCount,
    ) {
        let Some(pipeline) = self.pipelines.get(&(style, format)) else { return };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..6, 0..count.get());
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        style: SpriteStyle,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let (blend, depth) = match style {
            SpriteStyle::Glow => (Some(additive_blend()), depth_stencil(true, false)),
            SpriteStyle::Silhouette => (None, depth_stencil(false, false)),
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frostfire particle sprite pipeline"),
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
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}
