//! Storage layer for fluxcat
//!
//! Two interchangeable observation stores — a relational `SQLite` store
//! with server-side filtering and a flat CSV store that materializes the
//! whole table and filters client-side — unified behind
//! [`fluxcat_core::ObservationStore`] and an enum-dispatch
//! [`CatalogueBackend`]. On top sit the flare selection queries and the
//! hierarchical sub-catalogue export.

mod backend;
mod flatfile;
mod migrations;
mod selection;
mod sqlite;
mod subcatalogue;
#[cfg(test)]
mod tests;

pub use backend::{CatalogueBackend, CatalogueStats};
pub use flatfile::CsvCatalogue;
pub use selection::{FlareSearch, LightCurve};
pub use sqlite::SqliteCatalogue;
pub use subcatalogue::{SourceGroup, SubCatalogue};
