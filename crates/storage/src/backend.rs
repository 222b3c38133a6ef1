//! Unified storage backend with enum dispatch.

use std::collections::BTreeSet;
use std::path::Path;

use fluxcat_core::{
    Band, Metric, Observation, ObservationStore, Result, SkyPosition, TimeWindow,
};

use crate::{CsvCatalogue, SqliteCatalogue};

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            CatalogueBackend::Sqlite(s) => s.$method($($arg),*),
            CatalogueBackend::Csv(s) => s.$method($($arg),*),
        }
    };
}

/// Row and distinct-source counts of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueStats {
    pub observations: usize,
    pub sources: usize,
}

/// Observation store selected at construction time.
#[derive(Clone, Debug)]
pub enum CatalogueBackend {
    Sqlite(SqliteCatalogue),
    Csv(CsvCatalogue),
}

impl CatalogueBackend {
    /// Relational store at `db_path`.
    pub fn open_sqlite(db_path: &Path) -> Result<Self> {
        Ok(Self::Sqlite(SqliteCatalogue::open(db_path)?))
    }

    /// Flat tabular store at `path`.
    pub fn open_csv(path: &Path) -> Self {
        Self::Csv(CsvCatalogue::open(path))
    }

    /// Row and distinct-source counts.
    pub fn stats(&self) -> Result<CatalogueStats> {
        dispatch!(self, stats())
    }
}

impl ObservationStore for CatalogueBackend {
    fn append(&self, observations: &[Observation]) -> Result<()> {
        dispatch!(self, append(observations))
    }

    fn query_by_threshold(
        &self,
        band: Band,
        metric: Metric,
        threshold: f64,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>> {
        dispatch!(self, query_by_threshold(band, metric, threshold, window))
    }

    fn fetch_series(
        &self,
        source: &str,
        window: TimeWindow,
        ordered: bool,
    ) -> Result<Vec<Observation>> {
        dispatch!(self, fetch_series(source, window, ordered))
    }

    fn fetch_metadata(&self, source: &str) -> Result<Option<SkyPosition>> {
        dispatch!(self, fetch_metadata(source))
    }
}
