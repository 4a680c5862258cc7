// Window and graphics context only, nothing is rendered.

#[cfg(feature = "metal")]
use gfx_backend_metal as back;

#[cfg(feature = "vulkan")]
use gfx_backend_vulkan as back;

use austrian_flag::{Config, GpuContext, InitError};
use log::{debug, error, info};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use std::process;

fn main() {
    env_logger::init();
    if let Err(err) = run(Config::bootstrap()) {
        error!("{}", err);
        process::exit(err.exit_code());
    }
}

fn run(config: Config) -> Result<(), InitError> {
    let event_loop = EventLoop::new();
    let window = config.window_builder().build(&event_loop)?;
    let ctx = GpuContext::<back::Backend>::new(&window, &config.title)?;
    info!(
        "context ready on {} ({} queue(s))",
        ctx.adapter.info.name,
        ctx.queue_group.queues.len()
    );

    let mut ctx = Some(ctx);
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    debug!("window resized to {}x{}", size.width, size.height)
                }
                _ => {}
            },
            Event::LoopDestroyed => {
                // The surface has to go before the window it was created for.
                ctx.take();
                info!("closed window {:?}", window.id());
            }
            _ => {}
        }
    })
}
