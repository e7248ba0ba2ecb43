use std::marker::PhantomData;
use std::num::NonZeroU64;

use bytemuck::Pod;

/// Stride between per-object uniform blocks. Matches the default
/// `min_uniform_buffer_offset_alignment`.
pub const DYNAMIC_STRIDE: u64 = 256;

/// One uniform block of type `T`.
pub struct UniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Layout entry for this block at `binding`.
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size_of::<T>() as u64),
            },
            count: None,
        }
    }
}

/// Array of `T` blocks addressed with a dynamic offset, one per scene object.
///
/// Grows to the next power of two when more slots are written than allocated;
/// the bind group must be rebuilt after [`write_all`] reports growth.
///
/// [`write_all`]: DynamicUniforms::write_all
pub struct DynamicUniforms<T: Pod> {
    label: String,
    buffer: wgpu::Buffer,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> DynamicUniforms<T> {
    pub fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            label: label.to_string(),
            buffer: create_dynamic(device, label, capacity),
            capacity,
            _marker: PhantomData,
        }
    }

    /// Writes `values` into consecutive slots. Returns `true` if the buffer
    /// had to be reallocated.
    pub fn write_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, values: &[T]) -> bool {
        let grew = values.len() > self.capacity;
        if grew {
            self.capacity = values.len().next_power_of_two();
            self.buffer = create_dynamic(device, &self.label, self.capacity);
            log::debug!("{}: grown to {} slots", self.label, self.capacity);
        }

        let mut staging = vec![0u8; values.len() * DYNAMIC_STRIDE as usize];
        for (i, v) in values.iter().enumerate() {
            let start = i * DYNAMIC_STRIDE as usize;
            let bytes = bytemuck::bytes_of(v);
            staging[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, &staging);
        }
        grew
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Dynamic offset of slot `index`.
    pub fn offset(index: usize) -> u32 {
        (index as u64 * DYNAMIC_STRIDE) as u32
    }

    /// Binding covering exactly one `T` block; the dynamic offset selects the slot.
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: NonZeroU64::new(size_of::<T>() as u64),
        })
    }

    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(size_of::<T>() as u64),
            },
            count: None,
        }
    }
}

fn create_dynamic(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: capacity as u64 * DYNAMIC_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
