use chrono::{DateTime, Duration, Utc};
use fluxcat_core::{Band, Observation, TransientParameters};
use rand::Rng;

use crate::FluxModel;
use fluxcat_core::constants::JITTER_HOURS;

/// Produces the bounded observation sequence for one transient.
///
/// Timestamps walk backwards from the anchor one day at a time with a
/// uniform jitter in `[0, 6h)`, so the returned sequence is unordered by
/// construction: adjacent days can interleave. Callers needing order must
/// sort explicitly.
///
/// The generator is total over the documented parameter ranges. It does
/// not guard pathological inputs: a zero `duration` divides by zero and
/// propagates degenerate or non-finite fluxes rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientGenerator {
    model: FluxModel,
}

impl TransientGenerator {
    /// Generator using `model` for spectral scaling and noise.
    pub fn new(model: FluxModel) -> Self {
        Self { model }
    }

    /// Generate `n` observations of `params`, anchored at `anchor`.
    ///
    /// The reference-band flux follows a single-peaked Gaussian profile
    /// centered at `anchor - time_since_peak` with scale `duration`; all
    /// six band fluxes and their error bars derive from that value per
    /// observation.
    pub fn observations(
        &self,
        params: &TransientParameters,
        n: usize,
        anchor: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Vec<Observation> {
        let peak_time = anchor - params.time_since_peak;
        let duration_secs = params.duration.num_milliseconds() as f64 / 1e3;

        (0..n)
            .map(|i| {
                let jitter_secs = rng.random_range(0.0..(JITTER_HOURS * 3600) as f64);
                let time = anchor - Duration::days(i as i64)
                    + Duration::milliseconds((jitter_secs * 1e3) as i64);

                let offset_secs = (time - peak_time).num_milliseconds() as f64 / 1e3;
                let x = offset_secs / duration_secs;
                let reference_flux = params.peak_flux_ref * (-x * x).exp();

                let mut fluxes = [0.0_f64; 6];
                let mut uncertainties = [0.0_f64; 6];
                for (slot, band) in Band::ALL.iter().enumerate() {
                    fluxes[slot] = self.model.observed_flux(
                        rng,
                        *band,
                        reference_flux,
                        params.spectral_index,
                        params.noise_floor,
                    );
                    uncertainties[slot] = self.model.uncertainty_sample(rng, params.noise_floor);
                }

                Observation::from_band_arrays(
                    params.source.clone(),
                    params.ra,
                    params.dec,
                    time,
                    fluxes,
                    uncertainties,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn test_params() -> TransientParameters {
        TransientParameters {
            source: "test".to_owned(),
            ra: 0.0,
            dec: 0.0,
            spectral_index: 0.21,
            time_since_peak: Duration::days(99),
            peak_flux_ref: 5.0,
            noise_floor: 0.1,
            duration: Duration::days(10),
        }
    }

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_observation_count() {
        let mut rng = SmallRng::seed_from_u64(42);
        let obs = TransientGenerator::default().observations(&test_params(), 365, anchor(), &mut rng);
        assert_eq!(obs.len(), 365);
    }

    #[test]
    fn test_uncertainties_strictly_positive() {
        let mut rng = SmallRng::seed_from_u64(7);
        let obs = TransientGenerator::default().observations(&test_params(), 365, anchor(), &mut rng);
        for o in &obs {
            for band in Band::ALL {
                assert!(o.uncertainty(band) > 0.0);
            }
        }
    }

    #[test]
    fn test_peak_lands_within_one_sampling_interval() {
        let mut rng = SmallRng::seed_from_u64(42);
        // Low noise floor so the Gaussian profile dominates every draw and
        // the brightest sample is forced into the peak's sampling interval.
        let params = TransientParameters {
            noise_floor: 0.01,
            ..test_params()
        };
        let obs = TransientGenerator::default().observations(&params, 365, anchor(), &mut rng);

        let peak_time = anchor() - params.time_since_peak;
        let brightest = obs
            .iter()
            .max_by(|a, b| a.flux_093.partial_cmp(&b.flux_093).unwrap())
            .unwrap();

        // One sampling interval: a day of spacing plus up to 6h jitter.
        let miss = (brightest.time - peak_time).num_seconds().abs();
        assert!(miss <= 30 * 3600, "peak missed by {miss}s");
    }

    #[test]
    fn test_flare_scenario_peak_window() {
        // peak_flux_ref=5.0, noise_floor=0.1, duration=10d, peak 99d ago.
        let mut rng = SmallRng::seed_from_u64(42);
        let params = test_params();
        let obs = TransientGenerator::default().observations(&params, 365, anchor(), &mut rng);

        let peak_time = anchor() - params.time_since_peak;
        let brightest = obs
            .iter()
            .max_by(|a, b| a.flux_093.partial_cmp(&b.flux_093).unwrap())
            .unwrap();

        // With a 0.1 noise floor the draw can promote a sample up to two
        // days off-peak above the on-peak sample, never one further out.
        let miss = (brightest.time - peak_time).num_seconds().abs();
        assert!(miss <= 3 * 24 * 3600, "peak missed by {miss}s");
    }

    #[test]
    fn test_bands_scale_by_power_law_at_matching_timestamps() {
        let mut rng = SmallRng::seed_from_u64(42);
        let params = test_params();
        let obs = TransientGenerator::default().observations(&params, 365, anchor(), &mut rng);
        let model = FluxModel::default();

        // Noise (one U(0,1)*sqrt(0.1) draw plus the 0.1 floor) bounds how
        // far a measured flux can sit from the pure power-law value.
        let noise_bound = params.noise_floor.sqrt() + params.noise_floor + 1e-9;
        for o in &obs {
            // Recover the underlying reference flux bound from the stored
            // band-93 measurement, then check every other band against it.
            for band in Band::ALL {
                let clean_ref = {
                    let peak_time = anchor() - params.time_since_peak;
                    let x = (o.time - peak_time).num_milliseconds() as f64
                        / 1e3
                        / (params.duration.num_milliseconds() as f64 / 1e3);
                    params.peak_flux_ref * (-x * x).exp()
                };
                let clean = model.flux_at(band, clean_ref, params.spectral_index);
                assert!(
                    (o.flux(band) - clean).abs() <= noise_bound,
                    "band {band} at {}: {} vs {}",
                    o.time,
                    o.flux(band),
                    clean
                );
            }
        }
    }

    #[test]
    fn test_unordered_by_construction_spans_expected_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        let obs = TransientGenerator::default().observations(&test_params(), 30, anchor(), &mut rng);
        let earliest = obs.iter().map(|o| o.time).min().unwrap();
        let latest = obs.iter().map(|o| o.time).max().unwrap();
        assert!(earliest >= anchor() - Duration::days(30));
        assert!(latest <= anchor() + Duration::hours(6));
    }
}
