//! Flare selection queries
//!
//! The two standing analytic queries over a store: sources crossing a flux
//! threshold and sources crossing a signal-to-noise threshold, both within
//! a trailing window, feeding a per-source light-curve fetch.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fluxcat_core::constants::{FLARE_WINDOW_DAYS, LIGHT_CURVE_WINDOW_DAYS};
use fluxcat_core::{Band, Metric, Observation, ObservationStore, Result, TimeWindow};

/// A per-source light curve selected for follow-up.
#[derive(Debug, Clone)]
pub struct LightCurve {
    /// Source identifier
    pub source: String,
    /// Observations of the trailing light-curve window, ascending by time
    pub observations: Vec<Observation>,
}

/// Standing flare-selection query anchored at `now`.
///
/// The set of flaring sources carries no defined order; consumers must not
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlareSearch {
    /// Band the metric is evaluated in
    pub band: Band,
    /// Quantity compared against the threshold
    pub metric: Metric,
    /// Selection threshold
    pub threshold: f64,
    /// Anchor of the trailing windows
    pub now: DateTime<Utc>,
}

impl FlareSearch {
    /// Sources whose reference-band flux crossed `threshold` in the last week.
    pub fn above_flux(threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            band: Band::REFERENCE,
            metric: Metric::Flux,
            threshold,
            now,
        }
    }

    /// Sources whose reference-band signal-to-noise crossed `threshold` in
    /// the last week.
    pub fn above_snr(threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            band: Band::REFERENCE,
            metric: Metric::SignalToNoise,
            threshold,
            now,
        }
    }

    /// Distinct sources matching the selection.
    pub fn flaring_sources(&self, store: &impl ObservationStore) -> Result<BTreeSet<String>> {
        store.query_by_threshold(
            self.band,
            self.metric,
            self.threshold,
            TimeWindow::trailing_days(self.now, FLARE_WINDOW_DAYS),
        )
    }

    /// The trailing 30-day light curve of every matching source.
    pub fn light_curves(&self, store: &impl ObservationStore) -> Result<Vec<LightCurve>> {
        let window = TimeWindow::trailing_days(self.now, LIGHT_CURVE_WINDOW_DAYS);
        self.flaring_sources(store)?
            .into_iter()
            .map(|source| {
                let observations = store.fetch_series(&source, window, true)?;
                Ok(LightCurve {
                    source,
                    observations,
                })
            })
            .collect()
    }
}
