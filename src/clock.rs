use std::time::{Duration, Instant};

pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;
pub const REPORT_INTERVAL: Duration = Duration::from_millis(1000);

/// 연속된 프레임 사이의 실제 경과 시간
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 첫 호출은 측정값이 없으니 1/60초로 침
    pub fn tick(&mut self, now: Instant) -> f32 {
        let step = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => DEFAULT_TIME_STEP,
        };
        self.last = Some(now);
        step
    }
}

/// 1초마다 한 번 상태를 찍기 위한 타이머
#[derive(Debug, Default)]
pub struct Diagnostics {
    frames: u32,
    elapsed: Duration,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 누적 시간이 1초를 넘으면 그동안의 초당 프레임 수를 돌려주고 다시 셈
    pub fn frame(&mut self, elapsed: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += elapsed;

        if self.elapsed < REPORT_INTERVAL {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(fps)
    }
}
