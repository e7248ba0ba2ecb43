use crate::device::DEPTH_FORMAT;

/// Offscreen color target with an optional depth attachment.
///
/// Scene targets follow the window and are recreated through [`resize`];
/// fixed-size targets (accumulation, ortho depth) are created once.
///
/// [`resize`]: RenderTexture::resize
pub struct RenderTexture {
    name: String,
    format: wgpu::TextureFormat,
    size: (u32, u32),
    usage: wgpu::TextureUsages,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl RenderTexture {
    /// Creates a sampled + renderable target. Sizes over the device limit are
    /// clamped and logged.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        with_depth: bool,
    ) -> Self {
        Self::with_usage(
            device,
            name,
            size,
            format,
            with_depth,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    pub fn with_usage(
        device: &wgpu::Device,
        name: &str,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        with_depth: bool,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let size = validated_size(name, size, device.limits().max_texture_dimension_2d);
        let (color, color_view) = create_color(device, name, size, format, usage);
        let depth = with_depth.then(|| create_depth(device, name, size));

        log::debug!("render target '{name}' created at {}x{} ({format:?})", size.0, size.1);

        Self {
            name: name.to_string(),
            format,
            size,
            usage,
            color,
            color_view,
            depth,
        }
    }

    /// Recreates the textures when `size` differs from the current one.
    ///
    /// Returns `true` if the target was recreated; views handed out before
    /// are stale afterwards.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) -> bool {
        let size = validated_size(&self.name, size, device.limits().max_texture_dimension_2d);
        if size == self.size {
            return false;
        }

        let (color, color_view) = create_color(device, &self.name, size, self.format, self.usage);
        self.color = color;
        self.color_view = color_view;
        if self.depth.is_some() {
            self.depth = Some(create_depth(device, &self.name, size));
        }
        self.size = size;

        log::debug!("render target '{}' recreated at {}x{}", self.name, size.0, size.1);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref().map(|(_, v)| v)
    }
}

/// Depth-only attachment sized to the surface, for scenes drawn straight to
/// the swapchain.
pub struct DepthBuffer {
    name: String,
    size: (u32, u32),
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    pub fn new(device: &wgpu::Device, name: &str, size: (u32, u32)) -> Self {
        let size = validated_size(name, size, device.limits().max_texture_dimension_2d);
        let (texture, view) = create_depth(device, name, size);
        Self {
            name: name.to_string(),
            size,
            texture,
            view,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) -> bool {
        let size = validated_size(&self.name, size, device.limits().max_texture_dimension_2d);
        if size == self.size {
            return false;
        }
        (self.texture, self.view) = create_depth(device, &self.name, size);
        self.size = size;
        log::debug!("depth buffer '{}' recreated at {}x{}", self.name, size.0, size.1);
        true
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Clamps `size` into `1..=max_dim` per axis, logging the reason when the
/// request was unusable.
fn validated_size(name: &str, size: (u32, u32), max_dim: u32) -> (u32, u32) {
    let (w, h) = size;
    if w == 0 || h == 0 {
        log::error!("render target '{name}' incomplete: zero-sized attachment {w}x{h}");
    }
    if w > max_dim || h > max_dim {
        log::error!(
            "render target '{name}' incomplete: {w}x{h} exceeds max texture dimension {max_dim}"
        );
    }
    (w.clamp(1, max_dim.max(1)), h.clamp(1, max_dim.max(1)))
}

fn create_color(
    device: &wgpu::Device,
    name: &str,
    size: (u32, u32),
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("frostfire {name} color")),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_depth(
    device: &wgpu::Device,
    name: &str,
    size: (u32, u32),
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("frostfire {name} depth")),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── validated_size ────────────────────────────────────────────────────

    #[test]
    fn valid_sizes_pass_through() {
        assert_eq!(validated_size("t", (1024, 1024), 8192), (1024, 1024));
    }

    #[test]
    fn zero_axis_becomes_one() {
        assert_eq!(validated_size("t", (0, 300), 8192), (1, 300));
    }

    #[test]
    fn oversized_axis_is_clamped_to_limit() {
        assert_eq!(validated_size("t", (9000, 20), 8192), (8192, 20));
    }
}
