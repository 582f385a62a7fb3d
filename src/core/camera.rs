use crate::animation::interpolation::Interpolation;
use crate::core::constants::{DEFAULT_MAX_TILT, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_START_ZOOM};
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Engine-declared limits for zoom and tilt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Maximum tilt in degrees; the minimum is always 0
    pub max_tilt: f64,
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            max_tilt: DEFAULT_MAX_TILT,
        }
    }
}

impl CameraBounds {
    pub fn new(min_zoom: f64, max_zoom: f64, max_tilt: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            max_tilt,
        }
    }

    /// Finite, ordered zoom range and a finite, non-negative tilt limit
    pub fn is_valid(&self) -> bool {
        self.min_zoom.is_finite()
            && self.max_zoom.is_finite()
            && self.min_zoom <= self.max_zoom
            && self.max_tilt.is_finite()
            && self.max_tilt >= 0.0
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    pub fn clamp_tilt(&self, tilt: f64) -> f64 {
        tilt.min(self.max_tilt).max(0.0)
    }
}

/// The complete description of the current view, consumed by the
/// rendering engine once per frame.
///
/// Setters never fail: out-of-range values are clamped, azimuths are
/// normalized into `[0, 360)` and non-finite inputs are ignored. Camera
/// input arrives at touch frequency and must never fail a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    azimuth: f64,
    pan: Point,
    zoom: f64,
    tilt: f64,
    bounds: CameraBounds,
}

impl CameraState {
    /// Creates a north-up, untilted camera at the default start zoom
    ///
    /// Invalid bounds fall back to [`CameraBounds::default`].
    pub fn new(bounds: CameraBounds) -> Self {
        let bounds = if bounds.is_valid() {
            bounds
        } else {
            log::warn!("invalid camera bounds {:?}, using defaults", bounds);
            CameraBounds::default()
        };
        Self {
            azimuth: 0.0,
            pan: Point::default(),
            zoom: bounds.clamp_zoom(DEFAULT_START_ZOOM),
            tilt: 0.0,
            bounds,
        }
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn bounds(&self) -> CameraBounds {
        self.bounds
    }

    /// Sets the azimuth, normalized to `[0, 360)`
    pub fn set_azimuth(&mut self, azimuth: f64) {
        if azimuth.is_finite() {
            self.azimuth = Interpolation::normalize_angle(azimuth);
        }
    }

    /// Sets the pan offset in map coordinate space
    pub fn set_pan(&mut self, pan: Point) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    /// Moves the pan offset by a map-space delta
    pub fn translate(&mut self, delta: Point) {
        self.set_pan(self.pan.add(&delta));
    }

    /// Sets the zoom level, clamping to the configured range
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.bounds.clamp_zoom(zoom);
        }
    }

    /// Sets the tilt, clamping to `[0, max_tilt]`
    pub fn set_tilt(&mut self, tilt: f64) {
        if tilt.is_finite() {
            self.tilt = self.bounds.clamp_tilt(tilt);
        }
    }

    /// Replaces the bounds and re-clamps zoom and tilt against them.
    /// Invalid bounds are ignored and the current ones kept.
    pub fn set_bounds(&mut self, bounds: CameraBounds) {
        if !bounds.is_valid() {
            log::warn!("ignoring invalid camera bounds {:?}", bounds);
            return;
        }
        self.bounds = bounds;
        self.zoom = bounds.clamp_zoom(self.zoom);
        self.tilt = bounds.clamp_tilt(self.tilt);
    }

    /// Map units covered by one screen pixel at the current zoom
    pub fn units_per_pixel(&self) -> f64 {
        1.0 / 2_f64.powf(self.zoom)
    }

    /// Converts a screen-relative delta into a map-relative one.
    ///
    /// The screen is rotated by the azimuth relative to the map, so the
    /// delta is rotated by `-azimuth` and scaled by the current zoom.
    pub fn screen_to_map_delta(&self, screen_delta: Point) -> Point {
        screen_delta
            .rotate(-self.azimuth)
            .multiply(self.units_per_pixel())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraBounds::default())
    }
}
