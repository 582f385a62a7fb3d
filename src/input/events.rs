use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by the platform gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Gesture families the coordinator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GestureKind {
    Pan,
    Pinch,
    Rotate,
    Tap,
}

impl GestureKind {
    pub const ALL: [GestureKind; 4] = [
        GestureKind::Pan,
        GestureKind::Pinch,
        GestureKind::Rotate,
        GestureKind::Tap,
    ];

    /// Continuous gestures stream updates; discrete ones fire once
    pub fn is_continuous(&self) -> bool {
        !matches!(self, GestureKind::Tap)
    }

    /// Fewest touches the gesture needs to stay alive
    pub fn min_touches(&self) -> usize {
        match self {
            GestureKind::Pan | GestureKind::Tap => 1,
            GestureKind::Pinch | GestureKind::Rotate => 2,
        }
    }
}

/// Abstract gesture stream delivered by the hosting platform.
///
/// Values are cumulative since `Began`, the way platform recognizers
/// report them; the coordinator derives per-tick increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Screen-space translation since the gesture began
    Pan {
        phase: GesturePhase,
        translation: Point,
        touches: usize,
    },
    /// Scale factor since the gesture began (1.0 = unchanged)
    Pinch {
        phase: GesturePhase,
        scale: f64,
        touches: usize,
    },
    /// Rotation in degrees since the gesture began, clockwise positive
    Rotate {
        phase: GesturePhase,
        rotation: f64,
        touches: usize,
    },
    /// Discrete single tap
    Tap {
        phase: GesturePhase,
        position: Point,
        touches: usize,
    },
}

impl GestureEvent {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureEvent::Pan { .. } => GestureKind::Pan,
            GestureEvent::Pinch { .. } => GestureKind::Pinch,
            GestureEvent::Rotate { .. } => GestureKind::Rotate,
            GestureEvent::Tap { .. } => GestureKind::Tap,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        match self {
            GestureEvent::Pan { phase, .. }
            | GestureEvent::Pinch { phase, .. }
            | GestureEvent::Rotate { phase, .. }
            | GestureEvent::Tap { phase, .. } => *phase,
        }
    }

    pub fn touches(&self) -> usize {
        match self {
            GestureEvent::Pan { touches, .. }
            | GestureEvent::Pinch { touches, .. }
            | GestureEvent::Rotate { touches, .. }
            | GestureEvent::Tap { touches, .. } => *touches,
        }
    }
}
