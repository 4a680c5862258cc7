use gfx_hal::{
    adapter, buffer as b, command, format as f, image as i, pass, pool,
    prelude::*,
    queue::{family::QueueFamilyId, Submission},
    window, Backend, IndexType,
};
use log::{debug, error, warn};

use std::borrow::Borrow;
use std::iter;
use std::mem::ManuallyDrop;
use std::ptr;

mod buffer;
mod memory;
mod pipeline;
mod shader;
mod swapchain;
mod vertex;

use buffer::Buffer;
use memory::Memory;
use pipeline::Pipeline;
use swapchain::Swapchain;

pub use shader::ShaderStage;
pub use vertex::Vertex;

use crate::config::Config;
use crate::flag::{FLAG_INDICES, FLAG_VERTICES};

pub struct Renderer<'a, B: Backend> {
    frame: usize,
    device: &'a B::Device,
    frames_in_flight: usize,
    clear_color: [f32; 4],
    command_buffers: Vec<B::CommandBuffer>,
    submission_complete_semaphores: Vec<B::Semaphore>,
    submission_complete_fences: Vec<B::Fence>,
    framebuffers: Vec<Option<B::Framebuffer>>,
    command_pool: ManuallyDrop<B::CommandPool>,
    render_pass: ManuallyDrop<B::RenderPass>,
    vertices: Memory<'a, B, Vertex>,
    indices: Memory<'a, B, u32>,
    swapchain: Swapchain<'a, B>,
    // None when the shaders failed to compile or link; frames are then only cleared.
    pipeline: Option<Pipeline<'a, B>>,
}

impl<'a, B> Renderer<'a, B>
where
    B: Backend,
{
    pub fn new(
        surface: &'a mut B::Surface,
        adapter: &'a adapter::Adapter<B>,
        device: &'a B::Device,
        family: QueueFamilyId,
        config: &Config,
    ) -> Self {
        let memory_types = adapter.physical_device.memory_properties().memory_types;
        let limits = adapter.physical_device.limits();

        let vertices = Memory::new(
            Buffer::new(device, &FLAG_VERTICES, b::Usage::VERTEX, &limits),
            &memory_types,
        );
        let indices = Memory::new(
            Buffer::new(device, &FLAG_INDICES, b::Usage::INDEX, &limits),
            &memory_types,
        );

        let swapchain = Swapchain::new(device, surface, adapter, config.dims);
        let render_pass = Self::create_render_pass(device, swapchain.format);
        let pipeline = match Pipeline::new(
            device,
            &config.vertex_shader,
            &config.fragment_shader,
            &render_pass,
        ) {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                error!("{}", err);
                warn!("continuing without a shader program, nothing will be drawn");
                None
            }
        };

        let frames_in_flight = config.frames_in_flight.max(1);
        let mut command_pool = Self::create_command_pool(device, family);
        let command_buffers = Self::allocate_command_buffers(&mut command_pool, frames_in_flight);
        let submission_complete_semaphores = Self::create_semaphores(device, frames_in_flight);
        let submission_complete_fences = Self::create_fences(device, frames_in_flight);

        Renderer {
            device,
            submission_complete_semaphores,
            submission_complete_fences,
            framebuffers: (0..frames_in_flight).map(|_| None).collect(),
            frames_in_flight,
            clear_color: config.clear_color,
            command_pool: ManuallyDrop::new(command_pool),
            render_pass: ManuallyDrop::new(render_pass),
            vertices,
            indices,
            swapchain,
            pipeline,
            command_buffers,
            frame: 0,
        }
    }

    pub fn resize(&mut self, dims: window::Extent2D) {
        debug!("resize to {}x{}", dims.width, dims.height);
        self.swapchain.resize(dims);
    }

    pub fn is_suspended(&self) -> bool {
        self.swapchain.suspended
    }

    pub fn render(&mut self, queue: &mut B::CommandQueue) {
        if self.swapchain.suspended {
            self.swapchain.recreate();
            if self.swapchain.suspended {
                return;
            }
        }

        let surface_image = unsafe {
            match self.swapchain.surface.acquire_image(!0) {
                Ok((image, _)) => image,
                Err(err) => {
                    debug!("acquire failed ({:?}), rebuilding swapchain", err);
                    self.swapchain.recreate();
                    return;
                }
            }
        };

        let frame_idx = self.frame % self.frames_in_flight;

        unsafe {
            let fence = &self.submission_complete_fences[frame_idx];
            self.device
                .wait_for_fence(fence, !0)
                .expect("Can't wait for fence");
            self.device.reset_fence(fence).expect("Can't reset fence");

            // The fence guarantees the GPU is done with this slot's framebuffer.
            if let Some(old) = self.framebuffers[frame_idx].take() {
                self.device.destroy_framebuffer(old);
            }
        }

        let framebuffer = unsafe {
            self.device.create_framebuffer(
                &self.render_pass,
                iter::once(surface_image.borrow()),
                i::Extent {
                    width: self.swapchain.dims.width,
                    height: self.swapchain.dims.height,
                    depth: 1,
                },
            )
        }
        .expect("Can't create framebuffer");

        let cmd_buffer = &mut self.command_buffers[frame_idx];
        unsafe {
            cmd_buffer.reset(false);
            cmd_buffer.begin_primary(command::CommandBufferFlags::ONE_TIME_SUBMIT);
            cmd_buffer.set_viewports(0, &[self.swapchain.viewport.clone()]);
            cmd_buffer.set_scissors(0, &[self.swapchain.viewport.rect]);
            if let Some(pipeline) = &self.pipeline {
                cmd_buffer.bind_graphics_pipeline(&pipeline.pipeline);
                cmd_buffer.bind_vertex_buffers(
                    0,
                    iter::once((&*self.vertices.buffer.buf, b::SubRange::WHOLE)),
                );
                cmd_buffer.bind_index_buffer(b::IndexBufferView {
                    buffer: &*self.indices.buffer.buf,
                    range: b::SubRange::WHOLE,
                    index_type: IndexType::U32,
                });
            }
            cmd_buffer.begin_render_pass(
                &self.render_pass,
                &framebuffer,
                self.swapchain.viewport.rect,
                &[command::ClearValue {
                    color: command::ClearColor {
                        float32: self.clear_color,
                    },
                }],
                command::SubpassContents::Inline,
            );
            if self.pipeline.is_some() {
                cmd_buffer.draw_indexed(0..FLAG_INDICES.len() as u32, 0, 0..1);
            }
            cmd_buffer.end_render_pass();
            cmd_buffer.finish();

            let submission = Submission {
                command_buffers: iter::once(&*cmd_buffer),
                wait_semaphores: None,
                signal_semaphores: iter::once(&self.submission_complete_semaphores[frame_idx]),
            };

            queue.submit(
                submission,
                Some(&self.submission_complete_fences[frame_idx]),
            );

            let result = queue.present_surface(
                &mut self.swapchain.surface,
                surface_image,
                Some(&self.submission_complete_semaphores[frame_idx]),
            );

            if let Err(err) = result {
                debug!("present failed ({:?}), rebuilding swapchain", err);
                self.swapchain.recreate();
            }
        }

        self.framebuffers[frame_idx] = Some(framebuffer);
        self.frame += 1;
    }

    fn create_render_pass(device: &B::Device, format: f::Format) -> B::RenderPass {
        let attachment = pass::Attachment {
            format: Some(format),
            samples: 1,
            ops: pass::AttachmentOps::new(
                pass::AttachmentLoadOp::Clear,
                pass::AttachmentStoreOp::Store,
            ),
            stencil_ops: pass::AttachmentOps::DONT_CARE,
            layouts: i::Layout::Undefined..i::Layout::Present,
        };

        let subpass = pass::SubpassDesc {
            colors: &[(0, i::Layout::ColorAttachmentOptimal)],
            depth_stencil: None,
            inputs: &[],
            resolves: &[],
            preserves: &[],
        };

        unsafe { device.create_render_pass(&[attachment], &[subpass], &[]) }
            .expect("Can't create render pass")
    }

    fn create_command_pool(device: &B::Device, family: QueueFamilyId) -> B::CommandPool {
        unsafe { device.create_command_pool(family, pool::CommandPoolCreateFlags::RESET_INDIVIDUAL) }
            .expect("Can't create command pool")
    }

    fn allocate_command_buffers(
        command_pool: &mut B::CommandPool,
        frames_in_flight: usize,
    ) -> Vec<B::CommandBuffer> {
        (0..frames_in_flight)
            .map(|_| unsafe { command_pool.allocate_one(command::Level::Primary) })
            .collect()
    }

    fn create_semaphores(device: &B::Device, frames_in_flight: usize) -> Vec<B::Semaphore> {
        (0..frames_in_flight)
            .map(|_| device.create_semaphore().expect("Can't create semaphore"))
            .collect()
    }

    fn create_fences(device: &B::Device, frames_in_flight: usize) -> Vec<B::Fence> {
        (0..frames_in_flight)
            .map(|_| device.create_fence(true).expect("Can't create fence"))
            .collect()
    }
}

impl<'a, B: Backend> Drop for Renderer<'a, B> {
    fn drop(&mut self) {
        let device = self.device;
        if let Err(err) = device.wait_idle() {
            error!("device did not become idle: {:?}", err);
        }
        unsafe {
            for framebuffer in self.framebuffers.drain(..).flatten() {
                device.destroy_framebuffer(framebuffer);
            }

            let mut command_pool = ManuallyDrop::into_inner(ptr::read(&self.command_pool));
            command_pool.free(self.command_buffers.drain(..));
            device.destroy_command_pool(command_pool);

            for s in self.submission_complete_semaphores.drain(..) {
                device.destroy_semaphore(s);
            }
            for f in self.submission_complete_fences.drain(..) {
                device.destroy_fence(f);
            }

            device.destroy_render_pass(ManuallyDrop::into_inner(ptr::read(&self.render_pass)));
        }
    }
}
