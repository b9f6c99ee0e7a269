use nalgebra::{Point3, Unit, Vector3};

use crate::input::Direction;

pub const PITCH_LIMIT: f32 = 89.0;
pub const DEFAULT_MOVEMENT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// 1인칭 카메라. 방향은 yaw/pitch(도 단위)만 저장하고 나머지는 매번 다시 계산함.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    // 도 단위. yaw는 제한 없이 계속 늘어나거나 줄어듦
    yaw: f32,
    // [-89, 89]로 고정해서 위아래로 뒤집히지 않게 함
    pitch: f32,

    // 초당 이동 거리
    movement_speed: f32,
    // 마우스 1픽셀당 회전 각도
    sensitivity: f32,

    // W S A D
    inputs: [bool; 4],
    // 캡처 직후 첫 마우스 이동은 버리기 위한 표시
    first_motion: bool,
    grab_mouse: bool,
}

impl Default for Camera {
    /// 원점에서 -Z를 바라봄
    fn default() -> Self {
        Self::new(Point3::origin(), -90.0, 0.0)
    }
}

impl Camera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            inputs: [false; 4],
            first_motion: true,
            grab_mouse: true,
        }
    }

    pub fn with_speeds(mut self, movement_speed: f32, sensitivity: f32) -> Self {
        self.movement_speed = movement_speed;
        self.sensitivity = sensitivity;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab_mouse
    }

    /// 마우스 캡처를 켜면 다음 움직임 하나는 버림 (커서 고정하면서 생기는 튀는 값)
    pub fn set_grab(&mut self, grab: bool) {
        if grab && !self.grab_mouse {
            self.first_motion = true;
        }
        self.grab_mouse = grab;
    }

    /// 창이 다시 포커스를 얻었을 때. 그 사이 쌓인 이동량이 한 번에 들어오는 걸 막음.
    pub fn skip_next_motion(&mut self) {
        self.first_motion = true;
    }

    /// 상대 이동량. 화면 아래로 움직이면 pitch 감소.
    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        if !self.grab_mouse {
            return;
        }
        if self.first_motion {
            self.first_motion = false;
            return;
        }

        // 오른쪽으로 움직이면 yaw 증가
        self.yaw += dx as f32 * self.sensitivity;
        self.pitch -= dy as f32 * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn set_moving(&mut self, direction: Direction, is_press: bool) {
        let index = match direction {
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        };
        self.inputs[index] = is_press;
    }

    pub fn release_all(&mut self) {
        self.inputs = [false; 4];
    }

    /// yaw 0, pitch 0이면 +X. yaw -90이면 -Z.
    pub fn forward(&self) -> Unit<Vector3<f32>> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Unit::new_normalize(Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        ))
    }

    /// 수평면에서 forward를 yaw로만 90도 돌린 방향. pitch는 무시.
    pub fn right(&self) -> Unit<Vector3<f32>> {
        let yaw = self.yaw.to_radians();
        Unit::new_normalize(Vector3::new(-yaw.sin(), 0.0, yaw.cos()))
    }

    // 월드 위쪽 고정
    pub fn up(&self) -> Unit<Vector3<f32>> {
        Vector3::y_axis()
    }

    pub fn target(&self) -> Point3<f32> {
        self.position + self.forward().into_inner()
    }

    /// time_step은 초 단위 실제 경과 시간. 움직였으면 true.
    pub fn update(&mut self, time_step: f32) -> bool {
        let forward = self.forward();
        let right = self.right();
        // 이번 프레임 이동 거리 = 속도 × 경과 시간
        let distance = self.movement_speed * time_step;
        let mut moved = false;

        if self.inputs[0] {
            self.position += forward.scale(distance);
            moved = true;
        }
        if self.inputs[1] {
            self.position -= forward.scale(distance);
            moved = true;
        }
        if self.inputs[2] {
            self.position -= right.scale(distance);
            moved = true;
        }
        if self.inputs[3] {
            self.position += right.scale(distance);
            moved = true;
        }

        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn zero_angles_face_positive_x() {
        let camera = Camera::new(Point3::origin(), 0.0, 0.0);
        assert!(close(&camera.forward(), &Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn default_faces_negative_z() {
        let camera = Camera::default();
        assert!(close(&camera.forward(), &Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(&camera.right(), &Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(
            &camera.target().coords,
            &Vector3::new(0.0, 0.0, -1.0)
        ));
    }

    #[test]
    fn forward_for_one_second() {
        let mut camera = Camera::default();
        camera.set_moving(Direction::Forward, true);
        assert!(camera.update(1.0));
        assert!(close(&camera.position.coords, &Vector3::new(0.0, 0.0, -2.5)));
    }

    #[test]
    fn idle_update_does_not_move() {
        let mut camera = Camera::default();
        assert!(!camera.update(1.0));
        assert_eq!(camera.position, Point3::origin());
    }

    #[test]
    fn movement_scales_with_elapsed_time() {
        let mut camera = Camera::default();
        camera.set_moving(Direction::Right, true);
        camera.update(0.5);
        camera.update(0.5);
        assert!(close(&camera.position.coords, &Vector3::new(2.5, 0.0, 0.0)));

        camera.set_moving(Direction::Right, false);
        camera.set_moving(Direction::Left, true);
        camera.update(1.0);
        assert!(close(&camera.position.coords, &Vector3::zeros()));
    }

    #[test]
    fn strafe_ignores_pitch() {
        let mut camera = Camera::new(Point3::origin(), -90.0, 60.0);
        camera.set_moving(Direction::Right, true);
        camera.update(1.0);
        assert!(camera.position.y.abs() < 1e-6);
        assert!(close(&camera.position.coords, &Vector3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, 0.0); // 첫 값은 버려짐

        let deltas = [-1.0e6, 3.0, 250.0, -7.5, 1.0e9, -1.0e9, 0.25];
        for dy in deltas {
            camera.process_mouse(13.0, dy);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&camera.pitch()));
        }

        camera.process_mouse(0.0, 1.0e6);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        camera.process_mouse(0.0, -1.0e6);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
    }

    #[test]
    fn mouse_motion_turns_camera() {
        let mut camera = Camera::default();
        camera.process_mouse(500.0, 500.0);
        assert_eq!(camera.yaw(), -90.0);

        camera.process_mouse(100.0, 50.0);
        assert!((camera.yaw() - -80.0).abs() < 1e-4);
        assert!((camera.pitch() - -5.0).abs() < 1e-4);
    }

    #[test]
    fn released_mouse_is_ignored_and_regrab_rearms() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, 0.0);
        camera.set_grab(false);
        camera.process_mouse(100.0, 0.0);
        assert_eq!(camera.yaw(), -90.0);

        camera.set_grab(true);
        camera.process_mouse(100.0, 0.0);
        assert_eq!(camera.yaw(), -90.0);
        camera.process_mouse(100.0, 0.0);
        assert!((camera.yaw() - -80.0).abs() < 1e-4);
    }

    #[test]
    fn skipped_motion_is_dropped_once() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, 0.0);
        camera.skip_next_motion();
        camera.process_mouse(300.0, 0.0);
        assert_eq!(camera.yaw(), -90.0);
        camera.process_mouse(100.0, 0.0);
        assert!((camera.yaw() - -80.0).abs() < 1e-4);
    }

    #[test]
    fn forward_is_recomputed_after_turning() {
        let mut camera = Camera::new(Point3::origin(), 0.0, 0.0);
        camera.process_mouse(0.0, 0.0);
        camera.process_mouse(900.0, 0.0);
        assert!(close(&camera.forward(), &Vector3::new(0.0, 0.0, 1.0)));
    }
}
