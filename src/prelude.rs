//! Prelude module for common mapnav types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapnav::prelude::*;`

pub use crate::core::{
    camera::{CameraBounds, CameraState},
    config::{MapViewConfig, MapViewProfile},
    geo::{Point, TileCoord},
    map::MapViewController,
    observable::{Observable, Subscription, SubscriptionId},
};

pub use crate::animation::{
    azimuth::{AlignOutcome, AzimuthAnimation, AzimuthAnimationConfig, AzimuthController},
    interpolation::{EasingFunction, RotationDirection},
};

pub use crate::input::{
    events::{GestureEvent, GestureKind, GesturePhase},
    gestures::{GestureConfig, GestureCoordinator, GestureResponse, SimultaneityPolicy},
};

pub use crate::rendering::{engine::RenderEngine, headless::HeadlessEngine};

pub use crate::style::{
    loader::{CatalogLoader, StyleCatalog, StyleResourceLoader},
    manager::{ActivationEvent, ActivationStatus, MapStyleManager},
    source::{StyleConfiguration, StyleId, StyleResources, TileSource},
};

pub use crate::runtime::{runtime, spawn_blocking, TaskHandle, TaskSpawner};

pub use crate::{Error as MapError, Result};

pub use instant::Instant;
pub use std::{sync::Arc, time::Duration};
