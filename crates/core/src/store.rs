//! Storage backend abstraction
//!
//! Provides a common interface for the relational (`SQLite`) and flat
//! tabular (CSV) observation stores. Enables mocking, testing, and
//! backend-agnostic selection code.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Band, Observation, Result};

/// Derived quantity evaluated by threshold queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Raw flux value in the queried band
    Flux,
    /// Flux divided by its reported uncertainty
    SignalToNoise,
}

/// Closed absolute time interval, optionally unbounded on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Interval `[start, end]`.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Trailing interval `[now - days, now]`.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self::between(now - Duration::days(days), now)
    }

    /// Unbounded interval covering the full history.
    pub fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether `time` falls inside the interval.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| time >= s) && self.end.is_none_or(|e| time <= e)
    }
}

/// Constant per-source sky position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension, degrees
    pub ra: f64,
    /// Declination, degrees
    pub dec: f64,
}

/// Common interface over the interchangeable observation stores.
///
/// The store is write-once/read-many per source: `append` is the only
/// mutation and rows are never updated in place. All operations are
/// synchronous blocking calls; the generation and read phases do not
/// overlap in the intended usage.
pub trait ObservationStore: Send + Sync {
    /// Durably add a batch of rows. Safe to call repeatedly; each call is
    /// one durability checkpoint.
    fn append(&self, observations: &[Observation]) -> Result<()>;

    /// Distinct sources with at least one observation inside `window`
    /// where `metric` in `band` exceeds `threshold`. Set semantics: the
    /// iteration order carries no meaning.
    fn query_by_threshold(
        &self,
        band: Band,
        metric: Metric,
        threshold: f64,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>>;

    /// All observations of one source inside `window`, ascending by time
    /// when `ordered`. Unknown sources yield an empty series, not an error.
    fn fetch_series(
        &self,
        source: &str,
        window: TimeWindow,
        ordered: bool,
    ) -> Result<Vec<Observation>>;

    /// Constant per-source position, `None` when the source is unknown or
    /// the backing form does not persist positions.
    fn fetch_metadata(&self, source: &str) -> Result<Option<SkyPosition>>;
}
