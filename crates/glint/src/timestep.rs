//! # Frame Timestep
//!
//! Elapsed time between two frames, clamped so a long stall (debugger,
//! window drag) does not blow up integration.

use std::time::Duration;

/// Longest step handed to layers, in seconds.
pub const MAX_TIMESTEP: f32 = 0.1;

/// Seconds elapsed since the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Timestep(f32);

impl Timestep {
    /// Creates a step of `seconds`, clamped to `0.0..=MAX_TIMESTEP`.
    #[must_use]
    pub fn new(seconds: f32) -> Self {
        if seconds.is_nan() {
            return Self(0.0);
        }
        Self(seconds.clamp(0.0, MAX_TIMESTEP))
    }

    /// Step length in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> f32 {
        self.0
    }

    /// Step length in milliseconds.
    #[inline]
    #[must_use]
    pub fn millis(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<Duration> for Timestep {
    fn from(elapsed: Duration) -> Self {
        Self::new(elapsed.as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestep_units() {
        let ts = Timestep::new(0.016);
        assert!((ts.seconds() - 0.016).abs() < f32::EPSILON);
        assert!((ts.millis() - 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_stalls_are_clamped() {
        let ts = Timestep::from(Duration::from_secs(3));
        assert!((ts.seconds() - MAX_TIMESTEP).abs() < f32::EPSILON);
        assert_eq!(Timestep::new(-1.0).seconds(), 0.0);
        assert_eq!(Timestep::new(f32::NAN).seconds(), 0.0);
    }
}
