use nalgebra::Point3;

use crate::camera::{Camera, DEFAULT_MOVEMENT_SPEED, DEFAULT_SENSITIVITY};
use crate::ember::params::RenderParameters;

/// 시작할 때 필요한 값들. 실행 중에는 바뀌지 않음.
#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,

    pub start_position: Point3<f32>,
    pub start_yaw: f32,
    pub start_pitch: f32,
    pub movement_speed: f32,
    pub sensitivity: f32,
    pub grab_cursor: bool,

    pub focus_distance: f32,
    pub defocus_angle: f32,
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::from("Ember: Ray Tracer"),
            width: 1080,
            height: 720,
            seed: 42,
            // (13, 2, 3)에서 원점을 바라봄
            start_position: Point3::new(13.0, 2.0, 3.0),
            start_yaw: -167.0,
            start_pitch: -8.5,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            grab_cursor: true,
            focus_distance: 10.0,
            defocus_angle: 0.6,
            max_depth: 10,
        }
    }
}

impl Config {
    /// 시작 자세와 속도, 캡처 여부까지 반영한 카메라
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(self.start_position, self.start_yaw, self.start_pitch)
            .with_speeds(self.movement_speed, self.sensitivity);
        camera.set_grab(self.grab_cursor);
        camera
    }

    pub fn render_parameters(&self) -> RenderParameters {
        RenderParameters::new(self.focus_distance, self.defocus_angle, self.max_depth)
    }
}
