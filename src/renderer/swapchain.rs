use gfx_hal::{adapter::Adapter, format as f, prelude::*, pso, window, Backend};
use log::{debug, warn};

pub struct Swapchain<'a, B: Backend> {
    device: &'a B::Device,
    adapter: &'a Adapter<B>,
    pub viewport: pso::Viewport,
    pub dims: window::Extent2D,
    pub surface: &'a mut B::Surface,
    pub format: f::Format,
    pub suspended: bool,
}

impl<'a, B: Backend> Swapchain<'a, B> {
    pub fn new(
        device: &'a B::Device,
        surface: &'a mut B::Surface,
        adapter: &'a Adapter<B>,
        dims: window::Extent2D,
    ) -> Self {
        let formats = surface.supported_formats(&adapter.physical_device);
        let format = formats.map_or(f::Format::Rgba8Srgb, |formats| {
            formats
                .iter()
                .find(|format| format.base_format().1 == f::ChannelType::Srgb)
                .copied()
                .unwrap_or(formats[0])
        });

        let mut swapchain = Swapchain {
            device,
            surface,
            adapter,
            viewport: pso::Viewport {
                rect: pso::Rect {
                    x: 0,
                    y: 0,
                    w: dims.width as _,
                    h: dims.height as _,
                },
                depth: 0.0..1.0,
            },
            format,
            dims,
            suspended: false,
        };

        swapchain.recreate();
        swapchain
    }

    // A minimized window keeps the old swapchain.
    pub fn resize(&mut self, dims: window::Extent2D) {
        if dims.width == 0 || dims.height == 0 || dims == self.dims {
            return;
        }
        self.dims = dims;
        self.recreate();
    }

    pub fn recreate(&mut self) {
        let caps = self.surface.capabilities(&self.adapter.physical_device);
        if presentable(caps.current_extent, self.dims).is_none() {
            self.suspend("surface has no area");
            return;
        }

        let mut swap_config = window::SwapchainConfig::from_caps(&caps, self.format, self.dims);
        swap_config.present_mode = window::PresentMode::FIFO;
        let extent = match presentable(Some(swap_config.extent), self.dims) {
            Some(extent) => extent,
            None => {
                self.suspend("swapchain extent has no area");
                return;
            }
        };
        if let Err(err) = unsafe { self.surface.configure_swapchain(&self.device, swap_config) } {
            warn!("can't configure swapchain: {:?}", err);
            self.suspend("configure failed");
            return;
        }
        debug!("swapchain configured: {}x{}", extent.width, extent.height);

        self.suspended = false;
        self.dims = extent;
        self.viewport.rect.w = extent.width as _;
        self.viewport.rect.h = extent.height as _;
    }

    fn suspend(&mut self, reason: &str) {
        if !self.suspended {
            debug!("swapchain suspended: {}", reason);
        }
        self.suspended = true;
    }
}

// A surface reporting a current extent dictates the swapchain size.
fn presentable(
    current: Option<window::Extent2D>,
    requested: window::Extent2D,
) -> Option<window::Extent2D> {
    let extent = current.unwrap_or(requested);
    if extent.width == 0 || extent.height == 0 {
        None
    } else {
        Some(extent)
    }
}

impl<'a, B: Backend> Drop for Swapchain<'a, B> {
    fn drop(&mut self) {
        unsafe { self.surface.unconfigure_swapchain(&self.device) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(width: u32, height: u32) -> window::Extent2D {
        window::Extent2D { width, height }
    }

    #[test]
    fn minimized_surface_is_not_presentable() {
        assert_eq!(presentable(Some(extent(0, 0)), extent(800, 600)), None);
        assert_eq!(presentable(Some(extent(800, 0)), extent(800, 600)), None);
        assert_eq!(presentable(None, extent(0, 600)), None);
    }

    #[test]
    fn surface_extent_wins_over_requested() {
        assert_eq!(
            presentable(Some(extent(1024, 768)), extent(800, 600)),
            Some(extent(1024, 768))
        );
        assert_eq!(presentable(None, extent(800, 600)), Some(extent(800, 600)));
    }
}
