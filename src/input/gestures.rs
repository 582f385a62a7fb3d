use crate::{
    core::{camera::CameraState, constants::DEFAULT_TAP_TIMEOUT_MS, geo::Point},
    input::events::{GestureEvent, GestureKind, GesturePhase},
};
use fxhash::FxHashMap;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-gesture recognition state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    /// Began, but not yet past its movement threshold
    Recognizing,
    Active,
    /// Interrupted; returns to `Idle` on the next `settle` or `Began`
    Cancelled,
}

impl GestureState {
    pub fn in_progress(&self) -> bool {
        matches!(self, GestureState::Recognizing | GestureState::Active)
    }
}

/// Configuration for gesture recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    pub pan_enabled: bool,
    pub pinch_enabled: bool,
    pub rotation_enabled: bool,
    /// Screen distance a pan must travel before it moves the camera
    pub pan_threshold: f64,
    /// Scale change a pinch must reach before it zooms
    pub pinch_threshold: f64,
    /// Rotation in degrees before the map starts turning
    pub rotation_threshold_deg: f64,
    /// How long a tap may stay down before `settle_at` drops it
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
}

fn default_tap_timeout_ms() -> u64 {
    DEFAULT_TAP_TIMEOUT_MS
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_enabled: true,
            pinch_enabled: true,
            rotation_enabled: true,
            pan_threshold: 0.0,
            pinch_threshold: 0.0,
            rotation_threshold_deg: 0.0,
            tap_timeout_ms: DEFAULT_TAP_TIMEOUT_MS,
        }
    }
}

impl GestureConfig {
    pub fn is_enabled(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.pan_enabled,
            GestureKind::Pinch => self.pinch_enabled,
            GestureKind::Rotate => self.rotation_enabled,
            GestureKind::Tap => true,
        }
    }

    pub fn tap_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_timeout_ms)
    }
}

/// Which gestures may be recognized while others are in progress.
///
/// Rules are keyed by `(in-progress kind, candidate kind)`. A candidate is
/// allowed only if every in-progress gesture allows it; pairs without a
/// rule are denied.
#[derive(Debug, Clone, PartialEq)]
pub struct SimultaneityPolicy {
    rules: FxHashMap<(GestureKind, GestureKind), bool>,
}

impl Default for SimultaneityPolicy {
    /// Pan, pinch and rotate combine freely; taps exclude everything
    fn default() -> Self {
        let mut policy = Self::deny_all();
        for active in GestureKind::ALL {
            for candidate in GestureKind::ALL {
                policy.set(
                    active,
                    candidate,
                    active.is_continuous() && candidate.is_continuous(),
                );
            }
        }
        policy
    }
}

impl SimultaneityPolicy {
    pub fn deny_all() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }

    pub fn set(&mut self, active: GestureKind, candidate: GestureKind, allow: bool) {
        self.rules.insert((active, candidate), allow);
    }

    /// Sets the rule in both directions
    pub fn set_symmetric(&mut self, a: GestureKind, b: GestureKind, allow: bool) {
        self.set(a, b, allow);
        self.set(b, a, allow);
    }

    pub fn rule(&self, active: GestureKind, candidate: GestureKind) -> bool {
        self.rules.get(&(active, candidate)).copied().unwrap_or(false)
    }

    pub fn allows<I>(&self, in_progress: I, candidate: GestureKind) -> bool
    where
        I: IntoIterator<Item = GestureKind>,
    {
        in_progress
            .into_iter()
            .filter(|kind| *kind != candidate)
            .all(|kind| self.rule(kind, candidate))
    }
}

/// Result of feeding one gesture event to the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum GestureResponse {
    /// Disabled gesture, or an update for a gesture that never began
    Ignored,
    /// Rejected by the simultaneity policy
    Denied(GestureKind),
    Began(GestureKind),
    /// Still below the movement threshold
    Recognizing(GestureKind),
    /// Map-space pan delta to add to the camera
    Pan(Point),
    /// Factor to multiply the current zoom by
    Zoom(f64),
    /// Degrees to add to the azimuth
    Rotate(f64),
    Tapped(Point),
    /// The gesture finished without further movement. When the final
    /// event still moves, its `Pan`, `Zoom` or `Rotate` is reported
    /// instead and the gesture is idle afterwards.
    Ended(GestureKind),
    Cancelled(GestureKind),
}

impl GestureResponse {
    /// Whether applying this response changes the camera
    pub fn moves(&self) -> bool {
        match self {
            GestureResponse::Pan(delta) => delta.length() > 0.0,
            GestureResponse::Zoom(factor) => *factor != 1.0,
            GestureResponse::Rotate(delta) => *delta != 0.0,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GestureTrack {
    state: GestureState,
    last_translation: Point,
    last_scale: f64,
    last_rotation: f64,
    began_at: Option<Instant>,
}

impl Default for GestureTrack {
    fn default() -> Self {
        Self {
            state: GestureState::Idle,
            last_translation: Point::default(),
            last_scale: 1.0,
            last_rotation: 0.0,
            began_at: None,
        }
    }
}

/// Turns the platform gesture stream into incremental camera changes
/// and polices which gestures may run together.
pub struct GestureCoordinator {
    config: GestureConfig,
    policy: SimultaneityPolicy,
    tracks: FxHashMap<GestureKind, GestureTrack>,
}

impl GestureCoordinator {
    pub fn new(config: GestureConfig) -> Self {
        Self::with_policy(config, SimultaneityPolicy::default())
    }

    pub fn with_policy(config: GestureConfig, policy: SimultaneityPolicy) -> Self {
        Self {
            config,
            policy,
            tracks: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        for kind in GestureKind::ALL {
            if !config.is_enabled(kind) && self.state(kind).in_progress() {
                self.track_mut(kind).state = GestureState::Cancelled;
            }
        }
        self.config = config;
    }

    pub fn policy(&self) -> &SimultaneityPolicy {
        &self.policy
    }

    pub fn state(&self, kind: GestureKind) -> GestureState {
        self.tracks
            .get(&kind)
            .map(|track| track.state)
            .unwrap_or(GestureState::Idle)
    }

    /// Gestures currently recognizing or active
    pub fn in_progress(&self) -> Vec<GestureKind> {
        let mut kinds: Vec<GestureKind> = self
            .tracks
            .iter()
            .filter(|(_, track)| track.state.in_progress())
            .map(|(kind, _)| *kind)
            .collect();
        kinds.sort();
        kinds
    }

    /// Processes one gesture event against the current camera
    pub fn handle(&mut self, event: &GestureEvent, camera: &CameraState) -> GestureResponse {
        let kind = event.kind();
        if !self.config.is_enabled(kind) {
            return GestureResponse::Ignored;
        }

        if let GestureEvent::Tap {
            phase, position, ..
        } = event
        {
            return self.handle_tap(*phase, *position);
        }

        match event.phase() {
            GesturePhase::Began => self.begin(kind),
            GesturePhase::Changed => {
                if !self.state(kind).in_progress() {
                    return GestureResponse::Ignored;
                }
                if event.touches() < kind.min_touches() {
                    log::debug!(
                        "{:?} lost its touches ({} left), cancelling",
                        kind,
                        event.touches()
                    );
                    return self.cancel(kind);
                }
                self.update(event, camera)
            }
            GesturePhase::Ended => {
                if !self.state(kind).in_progress() {
                    return GestureResponse::Ignored;
                }
                let last = self.update(event, camera);
                self.tracks.insert(kind, GestureTrack::default());
                if last.moves() {
                    last
                } else {
                    GestureResponse::Ended(kind)
                }
            }
            GesturePhase::Cancelled => {
                if !self.state(kind).in_progress() {
                    return GestureResponse::Ignored;
                }
                self.cancel(kind)
            }
        }
    }

    /// Moves cancelled gestures back to idle; call once per frame
    pub fn settle(&mut self) {
        self.settle_at(Instant::now());
    }

    /// Like [`settle`](Self::settle), and also drops a tap that has been
    /// down longer than `tap_timeout_ms` without ending. A lost tap would
    /// otherwise deny every continuous gesture.
    pub fn settle_at(&mut self, now: Instant) {
        let tap_timeout = self.config.tap_timeout();
        for (kind, track) in self.tracks.iter_mut() {
            let stale_tap = *kind == GestureKind::Tap
                && track.state.in_progress()
                && track
                    .began_at
                    .map_or(false, |began| now.saturating_duration_since(began) >= tap_timeout);
            if stale_tap {
                log::debug!("tap never ended, dropping it");
            }
            if stale_tap || track.state == GestureState::Cancelled {
                *track = GestureTrack::default();
            }
        }
    }

    /// Cancels everything in progress, e.g. when the view loses focus
    pub fn cancel_all(&mut self) -> Vec<GestureKind> {
        let kinds = self.in_progress();
        for kind in &kinds {
            self.track_mut(*kind).state = GestureState::Cancelled;
        }
        kinds
    }

    fn begin(&mut self, kind: GestureKind) -> GestureResponse {
        if !self.policy.allows(self.in_progress(), kind) {
            log::debug!("{:?} denied while {:?} in progress", kind, self.in_progress());
            return GestureResponse::Denied(kind);
        }
        self.tracks.insert(
            kind,
            GestureTrack {
                state: GestureState::Recognizing,
                began_at: Some(Instant::now()),
                ..GestureTrack::default()
            },
        );
        GestureResponse::Began(kind)
    }

    fn cancel(&mut self, kind: GestureKind) -> GestureResponse {
        self.track_mut(kind).state = GestureState::Cancelled;
        GestureResponse::Cancelled(kind)
    }

    fn handle_tap(&mut self, phase: GesturePhase, position: Point) -> GestureResponse {
        let kind = GestureKind::Tap;
        match phase {
            GesturePhase::Began => self.begin(kind),
            GesturePhase::Changed => GestureResponse::Ignored,
            GesturePhase::Ended => {
                let state = self.state(kind);
                if !state.in_progress() && !self.policy.allows(self.in_progress(), kind) {
                    return GestureResponse::Denied(kind);
                }
                if state == GestureState::Cancelled {
                    return GestureResponse::Ignored;
                }
                self.tracks.insert(kind, GestureTrack::default());
                GestureResponse::Tapped(position)
            }
            GesturePhase::Cancelled => {
                if self.state(kind).in_progress() {
                    self.cancel(kind)
                } else {
                    GestureResponse::Ignored
                }
            }
        }
    }

    fn update(&mut self, event: &GestureEvent, camera: &CameraState) -> GestureResponse {
        let kind = event.kind();
        let config = self.config.clone();
        let track = self.track_mut(kind);

        if track.state == GestureState::Recognizing {
            let past_threshold = match event {
                GestureEvent::Pan { translation, .. } => {
                    translation.length() > config.pan_threshold
                }
                GestureEvent::Pinch { scale, .. } => (scale - 1.0).abs() > config.pinch_threshold,
                GestureEvent::Rotate { rotation, .. } => {
                    rotation.abs() > config.rotation_threshold_deg
                }
                GestureEvent::Tap { .. } => false,
            };
            if !past_threshold {
                return GestureResponse::Recognizing(kind);
            }
            track.state = GestureState::Active;
        }

        match event {
            GestureEvent::Pan { translation, .. } => {
                if !translation.is_finite() {
                    return GestureResponse::Ignored;
                }
                let screen_delta = translation.subtract(&track.last_translation);
                track.last_translation = *translation;
                GestureResponse::Pan(camera.screen_to_map_delta(screen_delta))
            }
            GestureEvent::Pinch { scale, .. } => {
                if !scale.is_finite() || *scale <= 0.0 {
                    return GestureResponse::Ignored;
                }
                let factor = scale / track.last_scale;
                track.last_scale = *scale;
                GestureResponse::Zoom(factor)
            }
            GestureEvent::Rotate { rotation, .. } => {
                if !rotation.is_finite() {
                    return GestureResponse::Ignored;
                }
                let delta = rotation - track.last_rotation;
                track.last_rotation = *rotation;
                GestureResponse::Rotate(delta)
            }
            GestureEvent::Tap { .. } => GestureResponse::Ignored,
        }
    }

    fn track_mut(&mut self, kind: GestureKind) -> &mut GestureTrack {
        self.tracks.entry(kind).or_default()
    }
}

impl Default for GestureCoordinator {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
