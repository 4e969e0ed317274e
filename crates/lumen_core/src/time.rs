use std::time::Duration;

/// Playback clock shared by every animation channel.
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    time_scale: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            time_scale: 1.0,
        }
    }
}

impl Time {
    pub fn with_time_scale(time_scale: f32) -> Self {
        Self {
            time_scale,
            ..Default::default()
        }
    }

    /// Advances the clock by one fixed frame step.
    pub fn update_with(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
    }

    /// Returns time in seconds since last frame (e.g., 0.016 for 60fps)
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32() * self.time_scale
    }

    /// Scaled playback time since startup, as of the last update.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32() * self.time_scale
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}
