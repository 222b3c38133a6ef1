use chrono::Duration;
use fluxcat_core::{Metric, ObservationStore};

use super::{create_test_sqlite, observation_at, test_anchor};
use crate::FlareSearch;

#[test]
fn test_flare_above_flux_selects_recent_crossing() {
    let now = test_anchor();
    let (store, _temp_dir) = create_test_sqlite();
    store
        .append(&[
            observation_at("flaring", now - Duration::days(2), 8.0, 0.1),
            observation_at("quiet", now - Duration::days(2), 1.0, 0.1),
            // Above threshold, but outside the trailing week.
            observation_at("past_flare", now - Duration::days(20), 8.0, 0.1),
        ])
        .unwrap();

    let search = FlareSearch::above_flux(3.6, now);
    assert_eq!(search.metric, Metric::Flux);

    let flaring = search.flaring_sources(&store).unwrap();
    assert_eq!(flaring.len(), 1);
    assert!(flaring.contains("flaring"));
}

#[test]
fn test_flare_above_snr_selects_recent_crossing() {
    let now = test_anchor();
    let (store, _temp_dir) = create_test_sqlite();
    store
        .append(&[
            // snr 8.0 / 0.05 = 160
            observation_at("significant", now - Duration::days(1), 8.0, 0.05),
            // snr 8.0 / 1.0 = 8: bright but noisy
            observation_at("noisy", now - Duration::days(1), 8.0, 1.0),
        ])
        .unwrap();

    let flaring = FlareSearch::above_snr(50.0, now).flaring_sources(&store).unwrap();
    assert_eq!(flaring.len(), 1);
    assert!(flaring.contains("significant"));
}

#[test]
fn test_light_curves_fetch_trailing_month_ordered() {
    let now = test_anchor();
    let (store, _temp_dir) = create_test_sqlite();
    store
        .append(&[
            observation_at("flaring", now - Duration::days(2), 8.0, 0.1),
            observation_at("flaring", now - Duration::days(25), 0.5, 0.1),
            // Older than the light-curve window: selected source, dropped row.
            observation_at("flaring", now - Duration::days(45), 0.5, 0.1),
            observation_at("quiet", now - Duration::days(2), 1.0, 0.1),
        ])
        .unwrap();

    let curves = FlareSearch::above_flux(3.6, now).light_curves(&store).unwrap();
    assert_eq!(curves.len(), 1);

    let curve = &curves[0];
    assert_eq!(curve.source, "flaring");
    assert_eq!(curve.observations.len(), 2);
    assert!(curve.observations[0].time < curve.observations[1].time);
}

#[test]
fn test_empty_store_selects_nothing() {
    let now = test_anchor();
    let (store, _temp_dir) = create_test_sqlite();
    assert!(FlareSearch::above_flux(1.0, now).flaring_sources(&store).unwrap().is_empty());
    assert!(FlareSearch::above_snr(1.0, now).light_curves(&store).unwrap().is_empty());
}
