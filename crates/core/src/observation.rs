use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Band;

/// One multi-band flux measurement of a transient source.
///
/// Rows are append-only: a source's full observation set is written in one
/// batch and never mutated afterwards. Positions are denormalized onto every
/// row at generation time. Uncertainties are strictly positive; fluxes may
/// go negative when the noise realization dominates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Source identifier this row belongs to
    pub source: String,
    /// Right ascension, degrees in [0, 360)
    pub ra: f64,
    /// Declination, degrees in [-90, 90]
    pub dec: f64,
    /// Absolute timestamp of the measurement
    pub time: DateTime<Utc>,

    pub flux_027: f64,
    pub uncertainty_027: f64,

    pub flux_039: f64,
    pub uncertainty_039: f64,

    pub flux_093: f64,
    pub uncertainty_093: f64,

    pub flux_145: f64,
    pub uncertainty_145: f64,

    pub flux_225: f64,
    pub uncertainty_225: f64,

    pub flux_280: f64,
    pub uncertainty_280: f64,
}

impl Observation {
    /// Assemble a row from per-band arrays ordered as [`Band::ALL`].
    pub fn from_band_arrays(
        source: String,
        ra: f64,
        dec: f64,
        time: DateTime<Utc>,
        fluxes: [f64; 6],
        uncertainties: [f64; 6],
    ) -> Self {
        Self {
            source,
            ra,
            dec,
            time,
            flux_027: fluxes[0],
            uncertainty_027: uncertainties[0],
            flux_039: fluxes[1],
            uncertainty_039: uncertainties[1],
            flux_093: fluxes[2],
            uncertainty_093: uncertainties[2],
            flux_145: fluxes[3],
            uncertainty_145: uncertainties[3],
            flux_225: fluxes[4],
            uncertainty_225: uncertainties[4],
            flux_280: fluxes[5],
            uncertainty_280: uncertainties[5],
        }
    }

    /// Measured flux in the given band.
    pub fn flux(&self, band: Band) -> f64 {
        match band {
            Band::F027 => self.flux_027,
            Band::F039 => self.flux_039,
            Band::F093 => self.flux_093,
            Band::F145 => self.flux_145,
            Band::F225 => self.flux_225,
            Band::F280 => self.flux_280,
        }
    }

    /// Reported error bar in the given band.
    pub fn uncertainty(&self, band: Band) -> f64 {
        match band {
            Band::F027 => self.uncertainty_027,
            Band::F039 => self.uncertainty_039,
            Band::F093 => self.uncertainty_093,
            Band::F145 => self.uncertainty_145,
            Band::F225 => self.uncertainty_225,
            Band::F280 => self.uncertainty_280,
        }
    }

    /// Flux divided by its reported uncertainty in the given band.
    pub fn signal_to_noise(&self, band: Band) -> f64 {
        self.flux(band) / self.uncertainty(band)
    }
}
