//! Shared constants for fluxcat.
//!
//! Centralizes the tunables of the generation and selection pipelines.

/// Default number of observations generated per source (one per day).
pub const OBSERVATIONS_PER_SOURCE: usize = 365;

/// Upper bound on the random jitter added to each daily timestamp, hours.
pub const JITTER_HOURS: i64 = 6;

/// Number of sources accumulated between storage flushes during a build.
pub const BUILD_BATCH_SIZE: usize = 100;

/// Trailing window inspected by flare selection queries, days.
pub const FLARE_WINDOW_DAYS: i64 = 7;

/// Trailing window fetched for per-source light curves, days.
pub const LIGHT_CURVE_WINDOW_DAYS: i64 = 30;
