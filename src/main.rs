use anyhow::Context;
use clap::Parser;
use winit::{
    dpi::PhysicalSize,
    event::*,
    keyboard::PhysicalKey,
    window::WindowBuilder,
};
use wgpu_lighting_demos::{dump_shadow_map, Args, State};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Args::parse().into_config();

    if let Some(path) = &config.dump_shadow_map {
        return dump_shadow_map(&config, path);
    }

    let event_loop = winit::event_loop::EventLoop::new().context("Failed to create event loop")?;

    let window = WindowBuilder::new()
        .with_title(config.demo.window_title())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_visible(true)
        .build(&event_loop)
        .context("Failed to create window")?;

    let mut state = State::new(window, &config)?;

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::KeyboardInput {
                        event: KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state: key_state,
                            repeat,
                            ..
                        },
                        ..
                    } => {
                        if repeat {
                            return;
                        }
                        if !state.handle_key(key_code, key_state == ElementState::Pressed) {
                            window_target.exit();
                        }
                    }
                    WindowEvent::MouseInput { state: button_state, button, .. } => {
                        state.handle_mouse_button(button, button_state == ElementState::Pressed);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        state.handle_scroll(delta);
                    }
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                    }
                    WindowEvent::RedrawRequested => match state.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory, exiting");
                            window_target.exit();
                        }
                        Err(e) => log::warn!("Dropped frame: {:?}", e),
                    },
                    _ => {}
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                state.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                state.update();
                state.window().request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
