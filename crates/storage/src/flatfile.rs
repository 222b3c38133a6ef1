//! Flat CSV observation store
//!
//! Tabular realization of the storage contract. The persisted form carries
//! exactly the columns `source, time, flux_027, …, uncertainty_280` with
//! time as fractional epoch seconds; positions are not part of this form,
//! so `fetch_metadata` answers `None` and rehydrated rows hold NaN ra/dec.
//! Every query materializes the whole table and filters client-side.

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fluxcat_core::{
    Band, CatalogueError, Metric, Observation, ObservationStore, Result, SkyPosition, TimeWindow,
};
use serde::{Deserialize, Serialize};

use crate::backend::CatalogueStats;

pub(crate) fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1e6
}

fn from_epoch_seconds(secs: f64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros((secs * 1e6).round() as i64)
        .ok_or_else(|| CatalogueError::InvalidInput(format!("timestamp out of range: {secs}")))
}

/// One row of the flat tabular form.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    source: String,
    time: f64,
    flux_027: f64,
    uncertainty_027: f64,
    flux_039: f64,
    uncertainty_039: f64,
    flux_093: f64,
    uncertainty_093: f64,
    flux_145: f64,
    uncertainty_145: f64,
    flux_225: f64,
    uncertainty_225: f64,
    flux_280: f64,
    uncertainty_280: f64,
}

impl CsvRow {
    fn from_observation(obs: &Observation) -> Self {
        Self {
            source: obs.source.clone(),
            time: epoch_seconds(obs.time),
            flux_027: obs.flux_027,
            uncertainty_027: obs.uncertainty_027,
            flux_039: obs.flux_039,
            uncertainty_039: obs.uncertainty_039,
            flux_093: obs.flux_093,
            uncertainty_093: obs.uncertainty_093,
            flux_145: obs.flux_145,
            uncertainty_145: obs.uncertainty_145,
            flux_225: obs.flux_225,
            uncertainty_225: obs.uncertainty_225,
            flux_280: obs.flux_280,
            uncertainty_280: obs.uncertainty_280,
        }
    }

    fn into_observation(self) -> Result<Observation> {
        Ok(Observation {
            source: self.source,
            ra: f64::NAN,
            dec: f64::NAN,
            time: from_epoch_seconds(self.time)?,
            flux_027: self.flux_027,
            uncertainty_027: self.uncertainty_027,
            flux_039: self.flux_039,
            uncertainty_039: self.uncertainty_039,
            flux_093: self.flux_093,
            uncertainty_093: self.uncertainty_093,
            flux_145: self.flux_145,
            uncertainty_145: self.uncertainty_145,
            flux_225: self.flux_225,
            uncertainty_225: self.uncertainty_225,
            flux_280: self.flux_280,
            uncertainty_280: self.uncertainty_280,
        })
    }
}

/// Flat-file observation store.
#[derive(Clone, Debug)]
pub struct CsvCatalogue {
    path: PathBuf,
}

impl CsvCatalogue {
    /// Store backed by the CSV file at `path`; the file is created on the
    /// first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Materialize the whole table.
    fn load(&self) -> Result<Vec<Observation>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path).map_err(CatalogueError::storage)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            rows.push(row.map_err(CatalogueError::storage)?.into_observation()?);
        }
        Ok(rows)
    }

    /// Row and distinct-source counts.
    pub fn stats(&self) -> Result<CatalogueStats> {
        let rows = self.load()?;
        let sources: BTreeSet<&str> = rows.iter().map(|o| o.source.as_str()).collect();
        Ok(CatalogueStats {
            observations: rows.len(),
            sources: sources.len(),
        })
    }
}

impl ObservationStore for CsvCatalogue {
    fn append(&self, observations: &[Observation]) -> Result<()> {
        let write_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(write_header).from_writer(file);
        for obs in observations {
            writer
                .serialize(CsvRow::from_observation(obs))
                .map_err(CatalogueError::storage)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn query_by_threshold(
        &self,
        band: Band,
        metric: Metric,
        threshold: f64,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|obs| window.contains(obs.time))
            .filter(|obs| {
                let value = match metric {
                    Metric::Flux => obs.flux(band),
                    Metric::SignalToNoise => obs.signal_to_noise(band),
                };
                value > threshold
            })
            .map(|obs| obs.source)
            .collect())
    }

    fn fetch_series(
        &self,
        source: &str,
        window: TimeWindow,
        ordered: bool,
    ) -> Result<Vec<Observation>> {
        let mut series: Vec<Observation> = self
            .load()?
            .into_iter()
            .filter(|obs| obs.source == source && window.contains(obs.time))
            .collect();
        if ordered {
            series.sort_by_key(|obs| obs.time);
        }
        Ok(series)
    }

    /// The flat form does not persist positions.
    fn fetch_metadata(&self, _source: &str) -> Result<Option<SkyPosition>> {
        Ok(None)
    }
}
