use glam::{Quat, Vec3};
use lumen_assets::Interpolation;

use crate::error::SamplerError;

/// Values a keyframe track can blend between.
pub trait Interpolate: Copy {
    fn interpolate(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        // slerp flips `end` when the dot product is negative, so this is the short arc.
        start.slerp(end, t).normalize()
    }
}

/// Immutable keyframe data for one channel.
///
/// Sampling is stateless: every call wraps the time into the track's range
/// and scans for the enclosing pair of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: Interpolation,
}

impl<T: Interpolate> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Result<Self, SamplerError> {
        if interpolation == Interpolation::CubicSpline {
            return Err(SamplerError::UnsupportedInterpolation);
        }
        if times.len() < 2 {
            return Err(SamplerError::TooFewKeyframes { count: times.len() });
        }
        if times.len() != values.len() {
            return Err(SamplerError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(&time) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(SamplerError::InvalidTime { time });
        }
        if let Some(position) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SamplerError::NonIncreasingTimes {
                position: position + 1,
                time: times[position + 1],
            });
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn start_time(&self) -> f32 {
        self.times[0]
    }

    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Maps a playback time into `[start, end)`.
    ///
    /// Times are wrapped with `time % end` and then clamped up to `start`.
    /// A time exactly on a multiple of `end` wraps to zero, so it lands on the
    /// first key rather than the last.
    pub fn wrap_time(&self, time: f32) -> f32 {
        let wrapped = time % self.end_time();
        // Also catches NaN from a non-finite input.
        if wrapped >= self.start_time() {
            wrapped
        } else {
            self.start_time()
        }
    }

    pub fn sample(&self, time: f32) -> T {
        let t = self.wrap_time(time);

        let last_pair = self.times.len() - 2;
        let i = self
            .times
            .windows(2)
            .position(|w| w[0] <= t && t < w[1])
            .unwrap_or(last_pair);

        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let ratio = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);

        match self.interpolation {
            Interpolation::Step => self.values[i],
            _ => T::interpolate(self.values[i], self.values[i + 1], ratio),
        }
    }
}
