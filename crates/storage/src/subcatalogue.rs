//! Hierarchical sub-catalogue export
//!
//! Read-only projection over a relational store: sources selected by
//! signal-to-noise are re-shaped from observation rows into per-source
//! groups of columnar band arrays, with the selection parameters recorded
//! as root attributes. The artifact is serialized as JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use fluxcat_core::{Band, Observation, ObservationStore, Result, SkyPosition, TimeWindow};
use serde::Serialize;

use crate::flatfile::epoch_seconds;
use crate::FlareSearch;

/// Root of the export artifact.
#[derive(Debug, Serialize)]
pub struct SubCatalogue {
    /// Selection threshold the sources were chosen by
    pub signal_to_noise_threshold: f64,
    /// Generation timestamp, ISO-8601
    pub time: String,
    /// Number of exported source groups
    pub number_of_sources: usize,
    /// One named group per source
    pub sources: BTreeMap<String, SourceGroup>,
}

/// One per-source group: position attributes plus equal-length columnar
/// arrays, time as fractional epoch seconds.
#[derive(Debug, Serialize)]
pub struct SourceGroup {
    pub ra: f64,
    pub dec: f64,

    pub time: Vec<f64>,

    pub flux_027: Vec<f64>,
    pub uncertainty_027: Vec<f64>,

    pub flux_039: Vec<f64>,
    pub uncertainty_039: Vec<f64>,

    pub flux_093: Vec<f64>,
    pub uncertainty_093: Vec<f64>,

    pub flux_145: Vec<f64>,
    pub uncertainty_145: Vec<f64>,

    pub flux_225: Vec<f64>,
    pub uncertainty_225: Vec<f64>,

    pub flux_280: Vec<f64>,
    pub uncertainty_280: Vec<f64>,
}

impl SourceGroup {
    fn from_series(position: SkyPosition, series: &[Observation]) -> Self {
        let band_column = |band: Band| series.iter().map(|o| o.flux(band)).collect::<Vec<_>>();
        let uncertainty_column =
            |band: Band| series.iter().map(|o| o.uncertainty(band)).collect::<Vec<_>>();
        Self {
            ra: position.ra,
            dec: position.dec,
            time: series.iter().map(|o| epoch_seconds(o.time)).collect(),
            flux_027: band_column(Band::F027),
            uncertainty_027: uncertainty_column(Band::F027),
            flux_039: band_column(Band::F039),
            uncertainty_039: uncertainty_column(Band::F039),
            flux_093: band_column(Band::F093),
            uncertainty_093: uncertainty_column(Band::F093),
            flux_145: band_column(Band::F145),
            uncertainty_145: uncertainty_column(Band::F145),
            flux_225: band_column(Band::F225),
            uncertainty_225: uncertainty_column(Band::F225),
            flux_280: band_column(Band::F280),
            uncertainty_280: uncertainty_column(Band::F280),
        }
    }
}

impl SubCatalogue {
    /// Project the sources crossing `snr_threshold` within the trailing
    /// flare window into a hierarchical sub-catalogue.
    ///
    /// An empty selection is not an error; it yields a root-only artifact
    /// with `number_of_sources = 0`.
    pub fn extract(
        store: &impl ObservationStore,
        snr_threshold: f64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let names = FlareSearch::above_snr(snr_threshold, now).flaring_sources(store)?;

        let mut sources = BTreeMap::new();
        for name in names {
            tracing::info!(source = %name, "Fetching source for sub-catalogue");
            let Some(position) = store.fetch_metadata(&name)? else {
                tracing::warn!(source = %name, "No position metadata, skipping source");
                continue;
            };
            let series = store.fetch_series(&name, TimeWindow::all(), true)?;
            sources.insert(name, SourceGroup::from_series(position, &series));
        }

        Ok(Self {
            signal_to_noise_threshold: snr_threshold,
            time: now.to_rfc3339(),
            number_of_sources: sources.len(),
            sources,
        })
    }

    /// Write the artifact as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
