use crate::animation::interpolation::{EasingFunction, Interpolation, RotationDirection};
use crate::core::camera::CameraState;
use crate::core::constants::{DEFAULT_ALIGN_DURATION_MS, NORTH_EPSILON_DEG};
use crate::core::observable::Observable;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the north-alignment animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AzimuthAnimationConfig {
    /// Duration used by `animated_align_azimuth_to_north`
    pub align_duration_ms: u64,
    pub easing: EasingFunction,
    /// Azimuths within this many degrees of north complete immediately
    pub north_epsilon_deg: f64,
}

impl Default for AzimuthAnimationConfig {
    fn default() -> Self {
        Self {
            align_duration_ms: DEFAULT_ALIGN_DURATION_MS,
            easing: EasingFunction::default(),
            north_epsilon_deg: NORTH_EPSILON_DEG,
        }
    }
}

impl AzimuthAnimationConfig {
    pub fn align_duration(&self) -> Duration {
        Duration::from_millis(self.align_duration_ms)
    }
}

/// A single in-flight rotation towards north. Always targets 0°.
#[derive(Debug, Clone, PartialEq)]
pub struct AzimuthAnimation {
    pub start_azimuth: f64,
    /// Signed rotation along the shorter arc; negative is counter-clockwise
    pub signed_delta: f64,
    pub start_time: Instant,
    pub duration: Duration,
    pub easing: EasingFunction,
}

impl AzimuthAnimation {
    /// Plans the shorter rotation from `start_azimuth` back to north
    pub fn towards_north(
        start_azimuth: f64,
        start_time: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            start_azimuth,
            signed_delta: Interpolation::shortest_angle_delta(start_azimuth, 0.0),
            start_time,
            duration,
            easing,
        }
    }

    pub fn target_azimuth(&self) -> f64 {
        0.0
    }

    pub fn direction(&self) -> RotationDirection {
        Interpolation::direction_of(self.signed_delta)
    }

    /// Raw (un-eased) progress in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Azimuth at `now`, normalized to `[0, 360)`
    pub fn azimuth_at(&self, now: Instant) -> f64 {
        let eased = self.easing.apply(self.progress(now));
        Interpolation::normalize_angle(self.start_azimuth + eased * self.signed_delta)
    }
}

/// What an alignment request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOutcome {
    /// Already north-up (or zero duration); azimuth set to 0 and notified
    Completed,
    /// An animation was started
    Started(RotationDirection),
}

/// Owns the azimuth animation and the azimuth observable.
///
/// Every change made through the controller, animated or manual, is
/// written to the camera and then broadcast. Only the latest alignment
/// request is ever in flight, and manual rotation always wins over it.
pub struct AzimuthController {
    config: AzimuthAnimationConfig,
    observable: Observable<f64>,
    active: Option<AzimuthAnimation>,
}

impl AzimuthController {
    pub fn new(config: AzimuthAnimationConfig) -> Self {
        Self {
            config,
            observable: Observable::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &AzimuthAnimationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AzimuthAnimationConfig) {
        self.config = config;
    }

    /// Observable fed with every azimuth change
    pub fn observable(&self) -> &Observable<f64> {
        &self.observable
    }

    pub fn active_animation(&self) -> Option<&AzimuthAnimation> {
        self.active.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Starts rotating the camera back to north along the shorter arc.
    ///
    /// Any animation already in flight is dropped and the new one starts
    /// from the camera's current azimuth.
    pub fn align_to_north(
        &mut self,
        camera: &mut CameraState,
        duration: Duration,
        now: Instant,
    ) -> AlignOutcome {
        if self.active.take().is_some() {
            log::debug!("superseding in-flight north alignment");
        }

        let current = camera.azimuth();
        if Interpolation::angular_distance(current, 0.0) <= self.config.north_epsilon_deg
            || duration.is_zero()
        {
            self.finish(camera);
            return AlignOutcome::Completed;
        }

        let animation =
            AzimuthAnimation::towards_north(current, now, duration, self.config.easing);
        let direction = animation.direction();
        log::debug!(
            "aligning azimuth {:.2} to north ({:?}, {:?})",
            current,
            direction,
            duration
        );
        self.active = Some(animation);
        AlignOutcome::Started(direction)
    }

    /// Steps the active animation. Returns `true` while it keeps running.
    pub fn advance(&mut self, camera: &mut CameraState, now: Instant) -> bool {
        let Some(animation) = self.active.as_ref() else {
            return false;
        };

        if animation.progress(now) >= 1.0 {
            self.active = None;
            self.finish(camera);
            return false;
        }

        camera.set_azimuth(animation.azimuth_at(now));
        self.observable.notify(&camera.azimuth());
        true
    }

    /// Drops the active animation without touching the camera
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.active.take().is_some();
        if cancelled {
            log::debug!("north alignment cancelled");
        }
        cancelled
    }

    /// Manual rotation to an absolute azimuth; cancels any alignment
    pub fn rotate_to(&mut self, camera: &mut CameraState, azimuth: f64) {
        self.cancel();
        camera.set_azimuth(azimuth);
        self.observable.notify(&camera.azimuth());
    }

    /// Manual rotation by a relative angle; cancels any alignment
    pub fn rotate_by(&mut self, camera: &mut CameraState, delta: f64) {
        let target = camera.azimuth() + delta;
        self.rotate_to(camera, target);
    }

    fn finish(&mut self, camera: &mut CameraState) {
        camera.set_azimuth(0.0);
        self.observable.notify(&0.0);
    }
}

impl Default for AzimuthController {
    fn default() -> Self {
        Self::new(AzimuthAnimationConfig::default())
    }
}
