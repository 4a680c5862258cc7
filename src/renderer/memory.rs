use gfx_hal::{adapter::MemoryType, memory as m, prelude::*, Backend, MemoryTypeId};
use std::iter;
use std::mem::ManuallyDrop;
use std::ptr;

use super::buffer::Buffer;

pub struct Memory<'a, B: Backend, T> {
    pub buffer: ManuallyDrop<Buffer<'a, B, T>>,
    memory: ManuallyDrop<B::Memory>,
}

impl<'a, B: Backend, T> Memory<'a, B, T> {
    pub fn new(mut buffer: Buffer<'a, B, T>, memory_types: &[MemoryType]) -> Self {
        let memory = Self::upload(&mut buffer, memory_types);
        Memory {
            buffer: ManuallyDrop::new(buffer),
            memory: ManuallyDrop::new(memory),
        }
    }

    fn upload(buffer: &mut Buffer<'a, B, T>, memory_types: &[MemoryType]) -> B::Memory {
        let device = buffer.device;
        unsafe {
            let req = device.get_buffer_requirements(&buffer.buf);
            let type_id = upload_type(memory_types, req.type_mask as u64)
                .expect("No CPU visible memory type for buffer");
            let memory = device
                .allocate_memory(type_id, req.size)
                .expect("Can't allocate buffer memory");
            device
                .bind_buffer_memory(&memory, 0, &mut buffer.buf)
                .expect("Can't bind buffer memory");

            let mapping = device
                .map_memory(&memory, m::Segment::ALL)
                .expect("Can't map buffer memory");
            ptr::copy_nonoverlapping(
                buffer.content.as_ptr() as *const u8,
                mapping,
                buffer.len as usize,
            );
            device
                .flush_mapped_memory_ranges(iter::once((&memory, m::Segment::ALL)))
                .expect("Can't flush buffer memory");
            device.unmap_memory(&memory);
            memory
        }
    }
}

fn upload_type(memory_types: &[MemoryType], type_mask: u64) -> Option<MemoryTypeId> {
    memory_types
        .iter()
        .enumerate()
        .position(|(id, mem_type)| {
            type_mask & (1 << id) != 0 && mem_type.properties.contains(m::Properties::CPU_VISIBLE)
        })
        .map(MemoryTypeId::from)
}

impl<'a, B: Backend, T> Drop for Memory<'a, B, T> {
    fn drop(&mut self) {
        unsafe {
            let device = self.buffer.device;
            ManuallyDrop::drop(&mut self.buffer);
            device.free_memory(ManuallyDrop::into_inner(ptr::read(&self.memory)))
        }
    }
}
