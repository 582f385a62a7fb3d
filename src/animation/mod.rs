pub mod azimuth;
pub mod interpolation;

// Re-export commonly used types and functions for convenience
pub use azimuth::{AlignOutcome, AzimuthAnimation, AzimuthAnimationConfig, AzimuthController};
pub use interpolation::{EasingFunction, Interpolation, RotationDirection};
