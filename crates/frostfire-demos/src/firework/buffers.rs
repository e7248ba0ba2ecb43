use frostfire_sim::particles::{ParticleCount, ParticleState};

/// Particle storage allocated once at full capacity.
///
/// Written by the integrator kernel (or by [`upload`](Self::upload) on the
/// CPU path) and read by the sprite renderer.
pub struct ParticleBuffers {
    buffer: wgpu::Buffer,
    capacity: ParticleCount,
}

impl ParticleBuffers {
    pub fn new(device: &wgpu::Device, capacity: ParticleCount) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frostfire particle states"),
            size: byte_len(capacity.as_usize()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::debug!("particle buffer allocated for {capacity} particles");
        Self { buffer, capacity }
    }

    pub fn capacity(&self) -> ParticleCount {
        self.capacity
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Returns every particle of the capacity to [`ParticleState::neutral`].
    pub fn reset(&self, queue: &wgpu::Queue) {
        let neutral = vec![ParticleState::neutral(); self.capacity.as_usize()];
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&neutral));
    }

    /// Overwrites the leading states; anything past the capacity is dropped.
    pub fn upload(&self, queue: &wgpu::Queue, states: &[ParticleState]) {
        let n = states.len().min(self.capacity.as_usize());
        if n < states.len() {
            log::warn!("particle upload truncated: {} > capacity {}", states.len(), self.capacity);
        }
        if n > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&states[..n]));
        }
    }
}

fn byte_len(count: usize) -> u64 {
    (count * size_of::<ParticleState>()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_stride_matches_wgsl_struct() {
        assert_eq!(size_of::<ParticleState>(), 48);
        assert_eq!(byte_len(256), 256 * 48);
    }

    #[test]
    fn neutral_state_bytes() {
        let state = ParticleState::neutral();
        let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&state));
        assert_eq!(&bytes[..8], &[0.0; 8]);
        assert_eq!(&bytes[8..], &[1.0; 4]);
    }
}
