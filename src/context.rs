use gfx_hal::{adapter::Adapter, prelude::*, queue::QueueGroup, Backend, Features, Instance};
use log::{debug, info};
use std::mem::ManuallyDrop;
use std::ptr;

use crate::error::InitError;

pub struct GpuContext<B: Backend> {
    pub instance: B::Instance,
    pub surface: ManuallyDrop<B::Surface>,
    pub adapter: Adapter<B>,
    pub device: B::Device,
    pub queue_group: QueueGroup<B>,
}

impl<B: Backend> GpuContext<B> {
    pub fn new(window: &winit::window::Window, name: &str) -> Result<Self, InitError> {
        let instance = B::Instance::create(name, 1).map_err(InitError::Backend)?;
        let surface =
            unsafe { instance.create_surface(window) }.map_err(InitError::Surface)?;

        match Self::open_device(&instance, &surface) {
            Ok((adapter, device, queue_group)) => {
                info!("using adapter: {}", adapter.info.name);
                Ok(GpuContext {
                    instance,
                    surface: ManuallyDrop::new(surface),
                    adapter,
                    device,
                    queue_group,
                })
            }
            Err(err) => {
                unsafe { instance.destroy_surface(surface) };
                Err(err)
            }
        }
    }

    fn open_device(
        instance: &B::Instance,
        surface: &B::Surface,
    ) -> Result<(Adapter<B>, B::Device, QueueGroup<B>), InitError> {
        let (adapter, family_idx) = instance
            .enumerate_adapters()
            .into_iter()
            .find_map(|adapter| {
                let idx = adapter.queue_families.iter().position(|family| {
                    surface.supports_queue_family(family) && family.queue_type().supports_graphics()
                });
                match idx {
                    Some(idx) => Some((adapter, idx)),
                    None => {
                        debug!("skipping adapter without usable queue: {}", adapter.info.name);
                        None
                    }
                }
            })
            .ok_or(InitError::NoAdapter)?;

        let family = &adapter.queue_families[family_idx];
        let mut gpu = unsafe {
            adapter
                .physical_device
                .open(&[(family, &[1.0])], Features::empty())
        }
        .map_err(InitError::Device)?;

        let queue_group = gpu.queue_groups.pop().ok_or(InitError::NoAdapter)?;
        Ok((adapter, gpu.device, queue_group))
    }
}

impl<B: Backend> Drop for GpuContext<B> {
    fn drop(&mut self) {
        unsafe {
            self.instance
                .destroy_surface(ManuallyDrop::into_inner(ptr::read(&self.surface)));
        }
    }
}
