use crate::core::constants::FULL_TURN_DEG;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Easing curves for camera animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInOutSine,
}

impl Default for EasingFunction {
    fn default() -> Self {
        EasingFunction::EaseOutCubic
    }
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseInOutSine => -(((PI * t).cos() - 1.0) / 2.0),
        }
    }
}

/// Rotational direction, in bearing terms (clockwise = increasing azimuth)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }

    /// Interpolation with easing function
    pub fn ease(start: f64, end: f64, t: f64, easing: EasingFunction) -> f64 {
        Self::linear(start, end, easing.apply(t))
    }

    /// Wraps an angle in degrees into `[0, 360)`
    pub fn normalize_angle(degrees: f64) -> f64 {
        let wrapped = degrees.rem_euclid(FULL_TURN_DEG);
        // rem_euclid rounds tiny negatives up to exactly 360, and keeps -0.0
        if wrapped >= FULL_TURN_DEG {
            0.0
        } else {
            wrapped + 0.0
        }
    }

    /// Signed delta of the shorter arc from `from` to `to`, in `(-180, 180]`.
    ///
    /// Exactly opposite angles resolve counter-clockwise (negative).
    pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
        let delta = Self::normalize_angle(to - from);
        if delta >= FULL_TURN_DEG / 2.0 {
            delta - FULL_TURN_DEG
        } else {
            delta
        }
    }

    pub fn direction_of(delta: f64) -> RotationDirection {
        if delta >= 0.0 {
            RotationDirection::Clockwise
        } else {
            RotationDirection::CounterClockwise
        }
    }

    /// Angular distance between two azimuths along the shorter arc
    pub fn angular_distance(a: f64, b: f64) -> f64 {
        Self::shortest_angle_delta(a, b).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseInQuad,
            EasingFunction::EaseOutQuad,
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseInCubic,
            EasingFunction::EaseOutCubic,
            EasingFunction::EaseInOutCubic,
            EasingFunction::EaseInOutSine,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at 1", easing);
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-9, "{:?} clamps", easing);
        }
    }

    #[test]
    fn test_shortest_angle_delta() {
        assert_eq!(Interpolation::shortest_angle_delta(10.0, 0.0), -10.0);
        assert_eq!(Interpolation::shortest_angle_delta(350.0, 0.0), 10.0);
        assert_eq!(Interpolation::shortest_angle_delta(180.0, 0.0), -180.0);
        assert_eq!(Interpolation::shortest_angle_delta(90.0, 90.0), 0.0);
        assert_eq!(Interpolation::shortest_angle_delta(0.0, 270.0), -90.0);
    }

    #[test]
    fn test_direction_of_shorter_arc() {
        let delta = Interpolation::shortest_angle_delta(10.0, 0.0);
        assert_eq!(
            Interpolation::direction_of(delta),
            RotationDirection::CounterClockwise
        );
        let delta = Interpolation::shortest_angle_delta(300.0, 0.0);
        assert_eq!(Interpolation::direction_of(delta), RotationDirection::Clockwise);
    }

    #[test]
    fn test_normalize_angle_negative_zero() {
        let value = Interpolation::normalize_angle(-720.0);
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }
}
