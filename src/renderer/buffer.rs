use gfx_hal::{buffer, prelude::*, Backend, Limits};
use std::mem::{self, ManuallyDrop};
use std::ptr;

pub struct Buffer<'a, B: Backend, T> {
    pub device: &'a B::Device,
    pub buf: ManuallyDrop<B::Buffer>,
    pub content: &'a [T],
    pub len: u64,
}

impl<'a, B: Backend, T> Buffer<'a, B, T> {
    pub fn new(
        device: &'a B::Device,
        content: &'a [T],
        usage: buffer::Usage,
        limits: &Limits,
    ) -> Self {
        let len = content.len() as u64 * mem::size_of::<T>() as u64;
        assert_ne!(len, 0, "cannot create an empty buffer");
        let size = padded_size(len, limits.non_coherent_atom_size as u64);

        let buf = unsafe { device.create_buffer(size, usage) }.expect("Can't create buffer");
        Buffer {
            device,
            buf: ManuallyDrop::new(buf),
            content,
            len,
        }
    }
}

// Whole non-coherent atoms, so the full mapped range can be flushed.
fn padded_size(len: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return len;
    }
    (len + alignment - 1) / alignment * alignment
}

impl<'a, B: Backend, T> Drop for Buffer<'a, B, T> {
    fn drop(&mut self) {
        unsafe {
            self.device
                .destroy_buffer(ManuallyDrop::into_inner(ptr::read(&self.buf)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::padded_size;

    #[test]
    fn padding_rounds_up_to_atom() {
        // 12 vertices of 20 bytes, 18 u32 indices
        assert_eq!(padded_size(240, 64), 256);
        assert_eq!(padded_size(72, 64), 128);
        assert_eq!(padded_size(256, 64), 256);
        assert_eq!(padded_size(72, 1), 72);
        assert_eq!(padded_size(72, 0), 72);
    }
}
