use std::time::{Duration, Instant};

/// Ticks per second the particle speeds and decay rates are tuned for
pub const REFERENCE_RATE: f32 = 60.0;

/// Largest timestep a single frame may advance, in reference ticks
pub const MAX_TICKS: f32 = 4.0;

pub struct Framepacer {
    frame_start: Instant,
    frametime: f32,
    limit_frametime: Option<f32>,
}

impl Framepacer {
    /// `framerate` of `None` or `0` runs unlimited
    pub fn new(framerate: Option<u32>) -> Self {
        Self {
            frame_start: Instant::now(),
            frametime: 1.0 / REFERENCE_RATE,
            limit_frametime: framerate.filter(|&f| f > 0).map(|f| 1.0 / f as f32),
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limit_frametime.is_some()
    }

    /// Seconds between the two latest `begin_frame` calls
    pub fn frametime(&self) -> f32 {
        self.frametime
    }

    pub fn framerate(&self) -> f32 {
        1.0 / self.frametime
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.frametime = (now - self.frame_start).as_secs_f32();
        self.frame_start = now;
    }

    /// Sleep off the rest of the frame when the framerate is limited
    pub fn end_frame(&self) {
        let Some(limit) = self.limit_frametime else {
            return;
        };

        const ACCURACY: f32 = 0.0001; // 100 microseconds
        let elapsed = || self.frame_start.elapsed().as_secs_f32();
        let sleep_time = limit - elapsed() - ACCURACY;

        if sleep_time > 0.0 {
            std::thread::sleep(Duration::from_secs_f32(sleep_time));

            while elapsed() < limit {
                std::thread::yield_now();
            }
        }
    }

    /// Timestep for the latest frame in reference ticks
    pub fn delta_ticks(&self, time_scale: f32) -> f32 {
        to_ticks(self.frametime, time_scale)
    }
}

pub fn to_ticks(seconds: f32, time_scale: f32) -> f32 {
    (seconds * REFERENCE_RATE * time_scale).clamp(0.0, MAX_TICKS)
}

/// Exact timestep of a fixed framerate, used when frames are captured.
/// Bounded like a measured frame.
pub fn fixed_ticks(framerate: u32, time_scale: f32) -> f32 {
    (REFERENCE_RATE / framerate as f32 * time_scale).clamp(0.0, MAX_TICKS)
}
