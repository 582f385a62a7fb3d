//! Core constants for camera bounds, azimuth animation and the built-in providers.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level the camera accepts by default.
pub const DEFAULT_MIN_ZOOM: f64 = 1.0;

/// Highest zoom level the camera accepts by default.
pub const DEFAULT_MAX_ZOOM: f64 = 22.0;

/// Maximum camera tilt in degrees.
pub const DEFAULT_MAX_TILT: f64 = 60.0;

/// Zoom used when a camera session starts.
pub const DEFAULT_START_ZOOM: f64 = 3.0;

/// Duration of `animated_align_azimuth_to_north`.
pub const DEFAULT_ALIGN_DURATION_MS: u64 = 300;

/// A tap that never reports its end is dropped after this long.
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 1_000;

/// Azimuths closer than this to 0° are treated as already north-up.
pub const NORTH_EPSILON_DEG: f64 = 0.01;

/// Full turn in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Standard OpenStreetMap raster server.
pub const PROVIDER_A_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Cycle-map raster server.
pub const PROVIDER_B_URL_TEMPLATE: &str = "https://{s}.tile.opencyclemap.org/cycle/{z}/{x}/{y}.png";

/// Subdomains rotated across tile requests for both built-in providers.
pub const DEFAULT_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Where the offline vector dataset is looked up when nothing else is configured.
pub const DEFAULT_OFFLINE_DATASET: &str = "offline/world.obf";
