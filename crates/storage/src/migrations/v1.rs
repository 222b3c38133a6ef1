//! Migration v1: observations table with source and time indexes

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    ra REAL NOT NULL,
    dec REAL NOT NULL,
    time TEXT NOT NULL,

    flux_027 REAL NOT NULL,
    uncertainty_027 REAL NOT NULL,

    flux_039 REAL NOT NULL,
    uncertainty_039 REAL NOT NULL,

    flux_093 REAL NOT NULL,
    uncertainty_093 REAL NOT NULL,

    flux_145 REAL NOT NULL,
    uncertainty_145 REAL NOT NULL,

    flux_225 REAL NOT NULL,
    uncertainty_225 REAL NOT NULL,

    flux_280 REAL NOT NULL,
    uncertainty_280 REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_observations_source ON observations(source);
CREATE INDEX IF NOT EXISTS idx_observations_time ON observations(time);
";
