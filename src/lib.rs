use std::time::Instant;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use crate::app::{Application, Hud};
use crate::camera::Camera;
use crate::clock::{Diagnostics, FrameClock};
use crate::config::Config;
use crate::ember::frame::FramePublisher;
use crate::ember::params::RenderParameters;
use crate::ember::scene::build_final_scene;
use crate::input::{Action, KeyEvent, KeyState};

pub mod app;
pub mod camera;
pub mod clock;
pub mod config;
pub mod ember;
pub mod input;
mod util;

/// 한 스레드에서 입력 → 카메라 → 파라미터 발행 → GPU 순서로 매 프레임 돌림
struct Navigator {
    camera: Camera,
    params: RenderParameters,
    keys: KeyState,
    // 창이 포커스를 잃으면 마우스 이동을 무시함
    focused: bool,
    quit_requested: bool,
}

impl Navigator {
    fn new(config: &Config) -> Self {
        Self {
            camera: config.camera(),
            params: config.render_parameters(),
            keys: KeyState::new(),
            focused: true,
            quit_requested: false,
        }
    }

    /// 마우스 캡처 토글이 일어나면 true
    fn key(&mut self, event: KeyEvent) -> bool {
        match event {
            KeyEvent::Pressed(Action::Move(direction)) => self.camera.set_moving(direction, true),
            KeyEvent::Released(Action::Move(direction)) => {
                self.camera.set_moving(direction, false)
            }
            KeyEvent::Pressed(Action::Quit) => self.quit_requested = true,
            KeyEvent::Pressed(Action::ToggleMouseGrab) => {
                let grab = !self.camera.is_grabbing();
                self.camera.set_grab(grab);
                return true;
            }
            KeyEvent::Pressed(action) => {
                action.apply(&mut self.params);
            }
            KeyEvent::Released(_) => {}
        }
        false
    }

    /// 포커스가 나가면 눌린 키를 전부 풀고, 돌아오면 첫 마우스 이동을 버림
    fn focus(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.camera.skip_next_motion();
        } else {
            self.keys.clear();
            self.camera.release_all();
        }
    }

    fn mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.focused {
            self.camera.process_mouse(dx, dy);
        }
    }
}

fn grab_cursor(window: &Window, grab: bool) {
    let result = if grab {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };

    if let Err(err) = result {
        log::warn!("Could not change cursor grab: {}", err);
    }
    window.set_cursor_visible(!grab);
}

pub fn run() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    if let Err(err) = start(Config::default()) {
        log::error!("Error during initialization:\n{:?}", err);
        std::process::exit(1);
    }
}

fn start(config: Config) -> Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(&event_loop)
        .context("Could not create the window")?;

    let mut application = pollster::block_on(Application::new(window, &event_loop))?;

    // 씬은 첫 프레임 전에 딱 한 번만 만듦
    let scene = build_final_scene(config.seed);
    let mut publisher = FramePublisher::new(&scene);
    log::info!("Scene ready: {} spheres", publisher.sphere_count());

    let mut navigator = Navigator::new(&config);
    grab_cursor(&application.window, navigator.camera.is_grabbing());

    let mut clock = FrameClock::new();
    let mut diagnostics = Diagnostics::new();
    let mut last_frame = Instant::now();
    let mut fps = 0.0;

    event_loop.run(move |event, _, control_flow| match event {
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => navigator.mouse_motion(delta.0, delta.1),

        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == application.window.id() => {
            if application.input(event) {
                return;
            }

            match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::ExitWithCode(0),
                WindowEvent::KeyboardInput { input, .. } => {
                    if let Some(key_event) = navigator.keys.input(input) {
                        if navigator.key(key_event) {
                            grab_cursor(&application.window, navigator.camera.is_grabbing());
                        }
                    }
                }
                WindowEvent::Focused(focused) => navigator.focus(*focused),
                WindowEvent::Resized(size) => application.resize(*size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    application.resize(**new_inner_size)
                }
                _ => {}
            }
        }

        Event::MainEventsCleared => {
            if navigator.quit_requested {
                *control_flow = ControlFlow::ExitWithCode(0);
                return;
            }
            application.window.request_redraw();
        }

        Event::RedrawRequested(window_id) if window_id == application.window.id() => {
            let now = Instant::now();
            let time_step = clock.tick(now);
            navigator.camera.update(time_step);

            if let Some(rate) = diagnostics.frame(now - last_frame) {
                fps = rate;
                let camera = &navigator.camera;
                let params = &navigator.params;
                log::info!(
                    "fps {:.1} | pos ({:.2}, {:.2}, {:.2}) | yaw {:.1} pitch {:.1} | focus {:.2} defocus {:.2} depth {}",
                    fps,
                    camera.position.x,
                    camera.position.y,
                    camera.position.z,
                    camera.yaw(),
                    camera.pitch(),
                    params.focus_distance(),
                    params.defocus_angle(),
                    params.max_depth()
                );
            }
            last_frame = now;

            let hud = Hud {
                fps,
                position: navigator.camera.position,
                yaw: navigator.camera.yaw(),
                pitch: navigator.camera.pitch(),
                focus_distance: navigator.params.focus_distance(),
                defocus_angle: navigator.params.defocus_angle(),
                max_depth: navigator.params.max_depth(),
                sphere_count: publisher.sphere_count(),
                grabbing: navigator.camera.is_grabbing(),
            };
            let frame = publisher.publish(&navigator.camera, &navigator.params, application.size);

            match application.render(&frame, &hud) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("Surface lost, reconfiguring");
                    application.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU is out of memory");
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
                Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout, skipping frame"),
            }
        }
        _ => {}
    });
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;
    use winit::event::{ElementState, VirtualKeyCode};

    use super::*;

    fn press(navigator: &mut Navigator, key: VirtualKeyCode) -> bool {
        let event = navigator.keys.handle(key, ElementState::Pressed);
        let toggled = event.map_or(false, |event| navigator.key(event));
        if let Some(event) = navigator.keys.handle(key, ElementState::Released) {
            navigator.key(event);
        }
        toggled
    }

    #[test]
    fn keys_adjust_tunables_and_request_quit() {
        let mut navigator = Navigator::new(&Config::default());
        let before = navigator.params;

        press(&mut navigator, VirtualKeyCode::Up);
        press(&mut navigator, VirtualKeyCode::RBracket);
        assert_eq!(
            navigator.params.focus_distance(),
            before.focus_distance() + 0.5
        );
        assert_eq!(navigator.params.max_depth(), before.max_depth() + 1);

        assert!(!navigator.quit_requested);
        press(&mut navigator, VirtualKeyCode::Escape);
        assert!(navigator.quit_requested);
    }

    #[test]
    fn keys_held_through_focus_loss_press_again() {
        let mut navigator = Navigator::new(&Config::default());
        let before = navigator.params.focus_distance();

        // 뗀 이벤트 없이 포커스를 잃음
        let pressed = navigator
            .keys
            .handle(VirtualKeyCode::Up, ElementState::Pressed)
            .unwrap();
        navigator.key(pressed);
        let forward = navigator
            .keys
            .handle(VirtualKeyCode::W, ElementState::Pressed)
            .unwrap();
        navigator.key(forward);
        navigator.focus(false);

        let start = navigator.camera.position;
        navigator.camera.update(1.0);
        assert_eq!(navigator.camera.position, start);

        navigator.focus(true);
        press(&mut navigator, VirtualKeyCode::Up);
        assert_eq!(navigator.params.focus_distance(), before + 1.0);
    }

    #[test]
    fn unfocused_mouse_motion_is_ignored() {
        let mut navigator = Navigator::new(&Config::default());
        let yaw = navigator.camera.yaw();
        navigator.mouse_motion(0.0, 0.0);

        navigator.focus(false);
        navigator.mouse_motion(200.0, 0.0);
        assert_eq!(navigator.camera.yaw(), yaw);

        // 돌아온 뒤 첫 이동은 버려지고 그다음부터 반영
        navigator.focus(true);
        navigator.mouse_motion(200.0, 0.0);
        assert_eq!(navigator.camera.yaw(), yaw);
        navigator.mouse_motion(100.0, 0.0);
        assert!((navigator.camera.yaw() - (yaw + 10.0)).abs() < 1e-4);
    }

    #[test]
    fn toggle_key_flips_mouse_capture() {
        let mut navigator = Navigator::new(&Config::default());
        assert!(navigator.camera.is_grabbing());
        assert!(press(&mut navigator, VirtualKeyCode::C));
        assert!(!navigator.camera.is_grabbing());
        assert!(press(&mut navigator, VirtualKeyCode::C));
        assert!(navigator.camera.is_grabbing());
    }

    #[test]
    fn held_forward_moves_until_released() {
        let config = Config {
            start_position: Point3::origin(),
            start_yaw: -90.0,
            start_pitch: 0.0,
            ..Default::default()
        };
        let mut navigator = Navigator::new(&config);

        let pressed = navigator
            .keys
            .handle(VirtualKeyCode::W, ElementState::Pressed)
            .unwrap();
        navigator.key(pressed);
        navigator.camera.update(1.0);
        assert!((navigator.camera.position.z - -2.5).abs() < 1e-5);

        let released = navigator
            .keys
            .handle(VirtualKeyCode::W, ElementState::Released)
            .unwrap();
        navigator.key(released);
        navigator.camera.update(1.0);
        assert!((navigator.camera.position.z - -2.5).abs() < 1e-5);
    }
}
