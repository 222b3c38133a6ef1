//! Transient flux model and catalogue generation
//!
//! The pipeline runs leaves-first: [`FluxModel`] maps parameters and a time
//! offset to per-band fluxes, [`TransientGenerator`] turns one
//! [`fluxcat_core::TransientParameters`] into a year of multi-band
//! observations, and [`CatalogueBuilder`] drives the generator over N
//! randomly drawn sources, flushing batches into an observation store.
//!
//! Every random draw goes through an explicitly passed [`rand::Rng`] handle
//! so seeded builds are reproducible.

mod builder;
mod flux;
mod generator;

pub use builder::{sample_parameters, BuildReport, CatalogueBuilder};
pub use flux::FluxModel;
pub use generator::TransientGenerator;
