//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Runtime overrides are read in `logic::config`.

// ============================================================================
// BUFFER & LOG
// ============================================================================

/// Maximum number of merged samples held in the rolling buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 3000;

/// Maximum number of detections retained in memory
pub const DEFAULT_LOG_CAPACITY: usize = 100;

// ============================================================================
// FEATURE WINDOWS (in samples)
// ============================================================================

/// Lookback used for the velocity jump (deltaV)
pub const DEFAULT_DELTA_WINDOW: usize = 30;

/// Window summed for the southward Bz integral
pub const DEFAULT_BZ_WINDOW: usize = 60;

/// Trailing window used for z-score statistics (current sample excluded)
pub const ANOMALY_WINDOW: usize = 60;

/// Minimum non-null values required in the trailing window
pub const ANOMALY_MIN_SAMPLES: usize = 8;

/// Floor applied to the standard deviation
pub const ANOMALY_STD_EPSILON: f64 = 1e-5;

/// |z| above this marks a metric as triggered
pub const ANOMALY_Z_THRESHOLD: f64 = 3.0;

// ============================================================================
// RULE THRESHOLDS
// ============================================================================

/// km/s
pub const DEFAULT_SPEED_HIGH: f64 = 500.0;

/// particles/cm³
pub const DEFAULT_DENSITY_HIGH: f64 = 10.0;

/// nT, strictly below fires
pub const DEFAULT_BZ_SOUTH: f64 = -10.0;

/// km/s over `DEFAULT_DELTA_WINDOW` samples
pub const DEFAULT_DELTA_V_MIN: f64 = 100.0;

// ============================================================================
// FORECAST
// ============================================================================

pub const DEFAULT_FORECAST_ALPHA: f64 = 0.25;
pub const DEFAULT_FORECAST_STEPS: usize = 6;

// ============================================================================
// PHYSICS
// ============================================================================

/// Proton mass factor: density [cm⁻³] · speed² [km²/s²] → nPa
pub const DYNAMIC_PRESSURE_K: f64 = 1.6726e-6;

/// 1 AU in km
pub const AU_KM: f64 = 149_597_870.7;

// ============================================================================
// QUERY LIMITS
// ============================================================================

/// Samples returned by `latest`/`predict` when no count is given
pub const DEFAULT_QUERY_COUNT: usize = 120;

pub const DEFAULT_EXPORT_LIMIT: usize = 10_000;
pub const MAX_EXPORT_LIMIT: usize = 50_000;

// ============================================================================
// UPSTREAM
// ============================================================================

/// NOAA SWPC real-time solar wind plasma product
pub const DEFAULT_PLASMA_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/plasma-1-day.json";

/// NOAA SWPC real-time solar wind magnetometer product
pub const DEFAULT_MAG_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/mag-1-day.json";

/// NASA DONKI CME catalog
pub const DEFAULT_DONKI_URL: &str = "https://api.nasa.gov/DONKI/CME";

/// api.nasa.gov shared demo key (rate limited)
pub const DEFAULT_NASA_API_KEY: &str = "DEMO_KEY";

/// Fetch timeout (seconds)
pub const DEFAULT_UPSTREAM_TIMEOUT: u64 = 20;

/// Ingestion trigger interval (seconds)
pub const DEFAULT_POLL_INTERVAL: u64 = 60;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
