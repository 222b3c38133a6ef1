use fluxcat_core::Band;
use rand::Rng;

/// Power-law spectral flux model anchored at an explicit reference band.
///
/// `flux_at` is pure and deterministic; the sampling methods draw from the
/// caller's rng handle. Noise draws are independent for every band and
/// every observation: bands are deliberately uncorrelated with each other
/// and across time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluxModel {
    reference_band: Band,
}

impl Default for FluxModel {
    fn default() -> Self {
        Self::new(Band::REFERENCE)
    }
}

impl FluxModel {
    /// Model anchored at `reference_band`.
    pub fn new(reference_band: Band) -> Self {
        Self { reference_band }
    }

    /// The anchor frequency of the power law.
    pub fn reference_band(&self) -> Band {
        self.reference_band
    }

    /// Spectral scaling: `reference_flux * (band / reference_band)^index`.
    ///
    /// The reference band is the identity point: for any index,
    /// `flux_at(reference_band, f, index) == f`.
    pub fn flux_at(&self, band: Band, reference_flux: f64, spectral_index: f64) -> f64 {
        reference_flux
            * (band.frequency_ghz() / self.reference_band.frequency_ghz()).powf(spectral_index)
    }

    /// One noise draw: `U(0, 1) * sqrt(noise_floor)`.
    pub fn uncertainty_sample(&self, rng: &mut impl Rng, noise_floor: f64) -> f64 {
        rng.random_range(0.0..1.0) * noise_floor.sqrt()
    }

    /// Measured flux: the power-law value plus a noise realization plus the
    /// noise floor. The realization folded in here and the error bar a
    /// caller stores alongside are separate draws and will not match
    /// numerically.
    pub fn observed_flux(
        &self,
        rng: &mut impl Rng,
        band: Band,
        reference_flux: f64,
        spectral_index: f64,
        noise_floor: f64,
    ) -> f64 {
        self.flux_at(band, reference_flux, spectral_index)
            + self.uncertainty_sample(rng, noise_floor)
            + noise_floor
    }
}
