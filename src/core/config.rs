//! Configuration for a map view session
//!
//! Settings are grouped per component and can be loaded from JSON or
//! resolved from a preset profile.

use crate::animation::{azimuth::AzimuthAnimationConfig, interpolation::EasingFunction};
use crate::core::camera::CameraBounds;
use crate::input::gestures::GestureConfig;
use crate::style::{loader::StyleCatalog, source::StyleId};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum MapViewProfile {
    Default,
    /// Snappier animation, small gesture thresholds
    Responsive,
    /// Reduced motion: no rotation gesture, instant north alignment
    Reduced,
    Custom(MapViewConfig),
}

impl MapViewProfile {
    pub fn resolve(&self) -> MapViewConfig {
        match self {
            Self::Default => MapViewConfig::default(),
            Self::Responsive => MapViewConfig {
                animation: AzimuthAnimationConfig {
                    align_duration_ms: 200,
                    easing: EasingFunction::EaseOutQuad,
                    ..Default::default()
                },
                gestures: GestureConfig {
                    pan_threshold: 2.0,
                    pinch_threshold: 0.02,
                    rotation_threshold_deg: 3.0,
                    ..Default::default()
                },
                ..MapViewConfig::default()
            },
            Self::Reduced => MapViewConfig {
                animation: AzimuthAnimationConfig {
                    align_duration_ms: 0,
                    easing: EasingFunction::Linear,
                    ..Default::default()
                },
                gestures: GestureConfig {
                    rotation_enabled: false,
                    ..Default::default()
                },
                ..MapViewConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

/// Everything a `MapViewController` needs to start a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub camera: CameraBounds,
    pub animation: AzimuthAnimationConfig,
    pub gestures: GestureConfig,
    pub styles: StyleCatalog,
    pub initial_style: StyleId,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            camera: CameraBounds::default(),
            animation: AzimuthAnimationConfig::default(),
            gestures: GestureConfig::default(),
            styles: StyleCatalog::default(),
            initial_style: StyleId::OnlineRasterProviderA,
        }
    }
}

impl MapViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !camera.min_zoom.is_finite() || !camera.max_zoom.is_finite() {
            return Err(MapError::Config("zoom bounds must be finite".to_string()));
        }
        if camera.min_zoom > camera.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                camera.min_zoom, camera.max_zoom
            )));
        }
        if camera.max_tilt.is_nan() || camera.max_tilt < 0.0 {
            return Err(MapError::Config(format!(
                "max_tilt must be non-negative, got {}",
                camera.max_tilt
            )));
        }
        let epsilon = self.animation.north_epsilon_deg;
        if epsilon.is_nan() || epsilon < 0.0 {
            return Err(MapError::Config(
                "north_epsilon_deg must be non-negative".to_string(),
            ));
        }
        self.styles.validate()
    }
}

impl Default for MapViewProfile {
    fn default() -> Self {
        Self::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MapViewConfig::default().validate().is_ok());
        for profile in [
            MapViewProfile::Default,
            MapViewProfile::Responsive,
            MapViewProfile::Reduced,
        ] {
            assert!(profile.resolve().validate().is_ok(), "{:?}", profile);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MapViewConfig::from_json_str(
            r#"{ "camera": { "min_zoom": 2.0, "max_zoom": 16.0, "max_tilt": 45.0 },
                 "initial_style": "OnlineRasterProviderB" }"#,
        )
        .unwrap();
        assert_eq!(config.camera.max_zoom, 16.0);
        assert_eq!(config.initial_style, StyleId::OnlineRasterProviderB);
        assert_eq!(config.animation, AzimuthAnimationConfig::default());
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let mut config = MapViewConfig::default();
        config.camera.min_zoom = 10.0;
        config.camera.max_zoom = 5.0;
        assert!(matches!(config.validate(), Err(MapError::Config(_))));
    }

    #[test]
    fn test_bad_provider_template_rejected() {
        let mut config = MapViewConfig::default();
        config.styles.provider_b.url_template = "https://example.com/{z}.png".to_string();
        assert!(matches!(config.validate(), Err(MapError::InvalidProvider(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_profile() {
        let config = MapViewProfile::Reduced.resolve();
        let json = config.to_json_string().unwrap();
        assert_eq!(MapViewConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MapViewConfig::from_json_str("{ not json"),
            Err(MapError::Serialization(_))
        ));
    }
}
