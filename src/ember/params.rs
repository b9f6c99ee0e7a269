pub const FOCUS_STEP: f32 = 0.5;
pub const MIN_FOCUS_DISTANCE: f32 = 0.1;
pub const DEFOCUS_STEP: f32 = 0.1;
pub const MIN_DEFOCUS_ANGLE: f32 = 0.0;
pub const MIN_MAX_DEPTH: u32 = 1;

/// 키보드로 실시간 조절하는 레이 트레이싱 값들. 쓰는 쪽은 키 입력 처리 하나뿐임.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    focus_distance: f32,
    defocus_angle: f32,
    max_depth: u32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self::new(10.0, 0.6, 10)
    }
}

impl RenderParameters {
    /// 범위를 벗어난 초기값도 조용히 하한으로 맞춤
    pub fn new(focus_distance: f32, defocus_angle: f32, max_depth: u32) -> Self {
        Self {
            focus_distance: focus_distance.max(MIN_FOCUS_DISTANCE),
            defocus_angle: defocus_angle.max(MIN_DEFOCUS_ANGLE),
            max_depth: max_depth.max(MIN_MAX_DEPTH),
        }
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }

    pub fn defocus_angle(&self) -> f32 {
        self.defocus_angle
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn focus_farther(&mut self) {
        self.focus_distance += FOCUS_STEP;
    }

    pub fn focus_nearer(&mut self) {
        self.focus_distance = (self.focus_distance - FOCUS_STEP).max(MIN_FOCUS_DISTANCE);
    }

    pub fn widen_defocus(&mut self) {
        self.defocus_angle += DEFOCUS_STEP;
    }

    pub fn narrow_defocus(&mut self) {
        self.defocus_angle = (self.defocus_angle - DEFOCUS_STEP).max(MIN_DEFOCUS_ANGLE);
    }

    // 상한 없음
    pub fn more_bounces(&mut self) {
        self.max_depth = self.max_depth.saturating_add(1);
    }

    pub fn fewer_bounces(&mut self) {
        self.max_depth = self.max_depth.saturating_sub(1).max(MIN_MAX_DEPTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps_to_floors() {
        let params = RenderParameters::new(-3.0, -1.0, 0);
        assert_eq!(params.focus_distance(), MIN_FOCUS_DISTANCE);
        assert_eq!(params.defocus_angle(), MIN_DEFOCUS_ANGLE);
        assert_eq!(params.max_depth(), MIN_MAX_DEPTH);
    }

    #[test]
    fn steps_up_and_down() {
        let mut params = RenderParameters::new(2.0, 0.5, 5);
        params.focus_farther();
        params.widen_defocus();
        params.more_bounces();
        assert_eq!(params.focus_distance(), 2.5);
        assert!((params.defocus_angle() - 0.6).abs() < 1e-6);
        assert_eq!(params.max_depth(), 6);

        params.focus_nearer();
        params.narrow_defocus();
        params.fewer_bounces();
        assert_eq!(params.focus_distance(), 2.0);
        assert!((params.defocus_angle() - 0.5).abs() < 1e-6);
        assert_eq!(params.max_depth(), 5);
    }

    #[test]
    fn never_below_floors() {
        let mut params = RenderParameters::default();
        for _ in 0..200 {
            params.focus_nearer();
            params.narrow_defocus();
            params.fewer_bounces();
            assert!(params.focus_distance() >= MIN_FOCUS_DISTANCE);
            assert!(params.defocus_angle() >= MIN_DEFOCUS_ANGLE);
            assert!(params.max_depth() >= MIN_MAX_DEPTH);
        }
        assert_eq!(params.focus_distance(), MIN_FOCUS_DISTANCE);
        assert_eq!(params.defocus_angle(), 0.0);
        assert_eq!(params.max_depth(), 1);
    }

    #[test]
    fn depth_has_no_ceiling() {
        let mut params = RenderParameters::new(1.0, 0.0, 1);
        for _ in 0..1000 {
            params.more_bounces();
        }
        assert_eq!(params.max_depth(), 1001);
    }
}
