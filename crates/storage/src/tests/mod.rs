//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, TimeZone, Utc};
use fluxcat_core::Observation;
use tempfile::TempDir;

use crate::{CsvCatalogue, SqliteCatalogue};

pub fn create_test_sqlite() -> (SqliteCatalogue, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteCatalogue::open(&db_path).unwrap();
    (store, temp_dir)
}

pub fn create_test_csv() -> (CsvCatalogue, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = CsvCatalogue::open(temp_dir.path().join("test.csv"));
    (store, temp_dir)
}

pub fn test_anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
}

/// Observation with a flat spectrum at `flux` and error bars at `uncertainty`.
pub fn observation_at(
    source: &str,
    time: DateTime<Utc>,
    flux: f64,
    uncertainty: f64,
) -> Observation {
    Observation::from_band_arrays(
        source.to_owned(),
        120.5,
        -45.25,
        time,
        [flux; 6],
        [uncertainty; 6],
    )
}

mod selection_tests;
