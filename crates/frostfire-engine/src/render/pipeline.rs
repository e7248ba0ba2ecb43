//! Shared pipeline state and pass helpers.

use crate::device::DEPTH_FORMAT;

// ── blend ─────────────────────────────────────────────────────────────────

/// `dst + src * src_alpha`; used for glowing particles.
pub fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth ─────────────────────────────────────────────────────────────────

/// Depth state against [`DEPTH_FORMAT`].
///
/// `test = false` turns the depth test into `Always` (particles in the mask pass).
pub fn depth_stencil(test: bool, write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: if test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── sampler ───────────────────────────────────────────────────────────────

pub fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

// ── passes ────────────────────────────────────────────────────────────────

/// Attachments of one render pass.
#[derive(Clone, Copy)]
pub struct PassTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: Option<&'a wgpu::TextureView>,
    /// `Some` clears color to this value and depth to 1.0; `None` loads both.
    pub clear: Option<wgpu::Color>,
}

impl<'a> PassTarget<'a> {
    pub fn cleared(
        color: &'a wgpu::TextureView,
        depth: Option<&'a wgpu::TextureView>,
        clear: wgpu::Color,
    ) -> Self {
        Self {
            color,
            depth,
            clear: Some(clear),
        }
    }

    pub fn loaded(color: &'a wgpu::TextureView, depth: Option<&'a wgpu::TextureView>) -> Self {
        Self {
            color,
            depth,
            clear: None,
        }
    }

    fn color_ops(&self) -> wgpu::Operations<wgpu::Color> {
        wgpu::Operations {
            load: match self.clear {
                Some(c) => wgpu::LoadOp::Clear(c),
                None => wgpu::LoadOp::Load,
            },
            store: wgpu::StoreOp::Store,
        }
    }

    fn depth_ops(&self) -> wgpu::Operations<f32> {
        wgpu::Operations {
            load: match self.clear {
                Some(_) => wgpu::LoadOp::Clear(1.0),
                None => wgpu::LoadOp::Load,
            },
            store: wgpu::StoreOp::Store,
        }
    }
}

/// Begins a render pass on `encoder` with one color attachment and an
/// optional depth attachment.
pub fn begin_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    target: PassTarget<'_>,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color,
            resolve_target: None,
            ops: target.color_ops(),
            depth_slice: None,
        })],
        depth_stencil_attachment: target.depth.map(|view| {
            wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(target.depth_ops()),
                stencil_ops: None,
            }
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── blend ─────────────────────────────────────────────────────────────

    #[test]
    fn additive_blend_keeps_destination() {
        let b = additive_blend();
        assert_eq!(b.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(b.color.operation, wgpu::BlendOperation::Add);
        assert_eq!(b.alpha.src_factor, wgpu::BlendFactor::Zero);
    }

    // ── depth ─────────────────────────────────────────────────────────────

    #[test]
    fn depth_test_disabled_means_always() {
        let d = depth_stencil(false, false);
        assert_eq!(d.depth_compare, wgpu::CompareFunction::Always);
        assert!(!d.depth_write_enabled);
        assert_eq!(d.format, DEPTH_FORMAT);
    }

    #[test]
    fn depth_test_enabled_is_less() {
        let d = depth_stencil(true, true);
        assert_eq!(d.depth_compare, wgpu::CompareFunction::Less);
        assert!(d.depth_write_enabled);
    }
}
