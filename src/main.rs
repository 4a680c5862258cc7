#[cfg(feature = "metal")]
use gfx_backend_metal as back;

#[cfg(feature = "vulkan")]
use gfx_backend_vulkan as back;

use austrian_flag::{Config, GpuContext, InitError, Renderer};
use gfx_hal::window::Extent2D;
use log::{error, info, trace};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::init();
    if let Err(err) = run(Config::default()) {
        error!("{}", err);
        process::exit(err.exit_code());
    }
}

fn run(config: Config) -> Result<(), InitError> {
    let event_loop = EventLoop::new();
    let window = config.window_builder().build(&event_loop)?;

    let window_should_close = Arc::new(AtomicBool::new(false));
    let (init_tx, init_rx) = mpsc::channel::<Result<(), InitError>>();
    let (resize_tx, resize_rx) = mpsc::channel::<Extent2D>();

    let should_close = Arc::clone(&window_should_close);
    let handler = thread::spawn(move || {
        let mut ctx = match GpuContext::<back::Backend>::new(&window, &config.title) {
            Ok(ctx) => ctx,
            Err(err) => {
                let _ = init_tx.send(Err(err));
                return;
            }
        };

        let family = ctx.queue_group.family;
        let queue = &mut ctx.queue_group.queues[0];
        let mut renderer = Renderer::new(
            &mut *ctx.surface,
            &ctx.adapter,
            &ctx.device,
            family,
            &config,
        );
        let _ = init_tx.send(Ok(()));

        let mut fps_counter = fps_counter::FPSCounter::new();
        while !should_close.load(Ordering::Relaxed) {
            for dims in resize_rx.try_iter() {
                renderer.resize(dims);
            }
            renderer.render(queue);
            if renderer.is_suspended() {
                thread::sleep(Duration::from_millis(50));
                continue;
            }
            trace!("fps: {}", fps_counter.tick());
        }
    });

    if let Err(err) = init_rx.recv().unwrap_or(Err(InitError::RenderThread)) {
        let _ = handler.join();
        return Err(err);
    }
    info!("initialized, entering event loop");

    let mut handler = Some(handler);
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    window_should_close.store(true, Ordering::Relaxed);
                    info!("close requested");
                    if let Some(handler) = handler.take() {
                        if handler.join().is_err() {
                            error!("render thread panicked");
                            process::exit(InitError::RenderThread.exit_code());
                        }
                    }
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let _ = resize_tx.send(Extent2D {
                        width: size.width,
                        height: size.height,
                    });
                }
                _ => {}
            }
        }
    })
}
