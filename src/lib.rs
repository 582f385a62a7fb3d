//! # mapnav
//!
//! Camera and style coordination for rotatable map views.
//!
//! This library sits between a touch gesture stream and a map-rendering
//! engine. It keeps the camera (azimuth, pan, zoom, tilt) consistent,
//! animates the map back to north-up on request, broadcasts azimuth
//! changes, and swaps the active content source without ever leaving the
//! engine without a style.

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod style;
pub use crate::core::constants;

use std::path::PathBuf;

// Re-export public API
pub use crate::core::{
    camera::{CameraBounds, CameraState},
    config::{MapViewConfig, MapViewProfile},
    geo::Point,
    map::MapViewController,
    observable::{Observable, Subscription, SubscriptionId},
};

pub use crate::animation::azimuth::{AlignOutcome, AzimuthController};

pub use crate::input::{
    events::{GestureEvent, GestureKind, GesturePhase},
    gestures::{GestureCoordinator, GestureResponse},
};

pub use crate::rendering::{engine::RenderEngine, headless::HeadlessEngine};

pub use crate::style::{
    manager::{ActivationEvent, ActivationStatus, MapStyleManager},
    source::{StyleConfiguration, StyleId},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Offline dataset not found: {}", .0.display())]
    DatasetMissing(PathBuf),

    #[error("Offline dataset {} is unusable: {reason}", .path.display())]
    DatasetCorrupt { path: PathBuf, reason: String },

    #[error("Invalid raster provider: {0}")]
    InvalidProvider(String),

    #[error("Style rejected by engine: {0}")]
    StyleRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend. Safe to call repeatedly.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
