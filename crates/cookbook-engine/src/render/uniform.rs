use std::marker::PhantomData;

use bytemuck::Pod;

/// Rounds `size` up to the next multiple of `align` (a power of two).
pub(crate) fn aligned_stride(size: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (size.max(1) + align - 1) & !(align - 1)
}

/// A uniform buffer holding `slots` copies of `T`, each at a dynamic-offset
/// aligned position.
///
/// `queue.write_buffer` calls only land at submit, so two passes in one frame
/// that need different values of the same block must read separate slots.
pub struct UniformSlots<T: Pod> {
    buffer: wgpu::Buffer,
    stride: u64,
    slots: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformSlots<T> {
    pub fn new(device: &wgpu::Device, slots: u32, label: &str) -> Self {
        debug_assert!(slots > 0);
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<T>() as u64, align);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            stride,
            slots,
            _marker: PhantomData,
        }
    }

    /// Bind group layout entry for a dynamic-offset uniform of type `T`.
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }
    }

    /// Binding resource covering one slot; select the slot with [`Self::offset`].
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        })
    }

    /// Dynamic offset of `slot`.
    pub fn offset(&self, slot: u32) -> u32 {
        debug_assert!(slot < self.slots);
        (self.stride * slot as u64) as u32
    }

    pub fn write(&self, queue: &wgpu::Queue, slot: u32, value: &T) {
        if slot >= self.slots {
            log::warn!("uniform slot {slot} out of range ({} slots)", self.slots);
            return;
        }
        queue.write_buffer(&self.buffer, self.stride * slot as u64, bytemuck::bytes_of(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(80, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(80, 16), 80);
    }

    #[test]
    fn zero_sized_block_still_takes_a_slot() {
        assert_eq!(aligned_stride(0, 64), 64);
    }
}
