//! `SQLite` observation store
//!
//! Relational realization of the storage contract: predicates are pushed
//! down into SQL so threshold and range queries filter server-side, with
//! indexes on `source` and `time`. Timestamps are stored as RFC 3339 text,
//! which compares correctly under SQLite's string ordering.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use fluxcat_core::{
    Band, CatalogueError, Metric, Observation, ObservationStore, Result, SkyPosition, TimeWindow,
};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, ToSql};

use crate::backend::CatalogueStats;
use crate::migrations;

/// Type alias for pooled connection
pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

const OBSERVATION_COLUMNS: &str = "source, ra, dec, time, \
     flux_027, uncertainty_027, flux_039, uncertainty_039, \
     flux_093, uncertainty_093, flux_145, uncertainty_145, \
     flux_225, uncertainty_225, flux_280, uncertainty_280";

/// Relational observation store wrapping a `SQLite` connection pool.
#[derive(Clone, Debug)]
pub struct SqliteCatalogue {
    pool: Pool<SqliteConnectionManager>,
}

/// Get a connection from the pool
fn get_conn(pool: &Pool<SqliteConnectionManager>) -> Result<PooledConn> {
    pool.get()
        .map_err(|e| CatalogueError::Storage(format!("Failed to get connection from pool: {e}")))
}

/// Log row read errors and filter them out
fn log_row_error<T>(result: rusqlite::Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Row read error: {}", e);
            None
        }
    }
}

fn encode_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        .map(|t| t.with_timezone(&Utc))
}

fn row_to_observation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Observation> {
    let time = decode_time(&row.get::<_, String>(3)?)?;
    Ok(Observation {
        source: row.get(0)?,
        ra: row.get(1)?,
        dec: row.get(2)?,
        time,
        flux_027: row.get(4)?,
        uncertainty_027: row.get(5)?,
        flux_039: row.get(6)?,
        uncertainty_039: row.get(7)?,
        flux_093: row.get(8)?,
        uncertainty_093: row.get(9)?,
        flux_145: row.get(10)?,
        uncertainty_145: row.get(11)?,
        flux_225: row.get(12)?,
        uncertainty_225: row.get(13)?,
        flux_280: row.get(14)?,
        uncertainty_280: row.get(15)?,
    })
}

/// Custom connection initializer for concurrency settings
fn init_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 30000;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

fn db_pool_size() -> u32 {
    std::env::var("FLUXCAT_DB_POOL_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(8)
}

impl SqliteCatalogue {
    /// Open (creating if needed) a catalogue database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);

        let pool_size = db_pool_size();
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(CatalogueError::storage)?;

        let conn = pool.get().map_err(CatalogueError::storage)?;
        migrations::run_migrations(&conn).map_err(CatalogueError::database)?;
        drop(conn);

        tracing::info!(pool_size = pool_size, "Catalogue store initialized with connection pool");

        Ok(Self { pool })
    }

    /// Row and distinct-source counts.
    pub fn stats(&self) -> Result<CatalogueStats> {
        let conn = get_conn(&self.pool)?;
        let observations: i64 = conn
            .query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))
            .map_err(CatalogueError::database)?;
        let sources: i64 = conn
            .query_row("SELECT COUNT(DISTINCT source) FROM observations", [], |row| row.get(0))
            .map_err(CatalogueError::database)?;
        Ok(CatalogueStats {
            observations: observations as usize,
            sources: sources as usize,
        })
    }
}

impl ObservationStore for SqliteCatalogue {
    fn append(&self, observations: &[Observation]) -> Result<()> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction().map_err(CatalogueError::database)?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO observations \
                       (source, ra, dec, time, \
                        flux_027, uncertainty_027, flux_039, uncertainty_039, \
                        flux_093, uncertainty_093, flux_145, uncertainty_145, \
                        flux_225, uncertainty_225, flux_280, uncertainty_280) \
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                )
                .map_err(CatalogueError::database)?;
            for obs in observations {
                stmt.execute(params![
                    obs.source,
                    obs.ra,
                    obs.dec,
                    encode_time(obs.time),
                    obs.flux_027,
                    obs.uncertainty_027,
                    obs.flux_039,
                    obs.uncertainty_039,
                    obs.flux_093,
                    obs.uncertainty_093,
                    obs.flux_145,
                    obs.uncertainty_145,
                    obs.flux_225,
                    obs.uncertainty_225,
                    obs.flux_280,
                    obs.uncertainty_280,
                ])
                .map_err(CatalogueError::database)?;
            }
        }
        tx.commit().map_err(CatalogueError::database)?;
        Ok(())
    }

    fn query_by_threshold(
        &self,
        band: Band,
        metric: Metric,
        threshold: f64,
        window: TimeWindow,
    ) -> Result<BTreeSet<String>> {
        let value_expr = match metric {
            Metric::Flux => band.flux_column().to_owned(),
            Metric::SignalToNoise => {
                format!("{} / {}", band.flux_column(), band.uncertainty_column())
            }
        };

        let start = window.start.map(encode_time);
        let end = window.end.map(encode_time);

        let mut sql = format!("SELECT DISTINCT source FROM observations WHERE {value_expr} > ?1");
        let mut bind: Vec<&dyn ToSql> = vec![&threshold];
        if let Some(ref s) = start {
            bind.push(s);
            sql.push_str(&format!(" AND time >= ?{}", bind.len()));
        }
        if let Some(ref e) = end {
            bind.push(e);
            sql.push_str(&format!(" AND time <= ?{}", bind.len()));
        }

        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(&sql).map_err(CatalogueError::database)?;
        let sources = stmt
            .query_map(bind.as_slice(), |row| row.get::<_, String>(0))
            .map_err(CatalogueError::database)?
            .filter_map(log_row_error)
            .collect();
        Ok(sources)
    }

    fn fetch_series(
        &self,
        source: &str,
        window: TimeWindow,
        ordered: bool,
    ) -> Result<Vec<Observation>> {
        let start = window.start.map(encode_time);
        let end = window.end.map(encode_time);

        let mut sql =
            format!("SELECT {OBSERVATION_COLUMNS} FROM observations WHERE source = ?1");
        let mut bind: Vec<&dyn ToSql> = vec![&source];
        if let Some(ref s) = start {
            bind.push(s);
            sql.push_str(&format!(" AND time >= ?{}", bind.len()));
        }
        if let Some(ref e) = end {
            bind.push(e);
            sql.push_str(&format!(" AND time <= ?{}", bind.len()));
        }
        if ordered {
            sql.push_str(" ORDER BY time");
        }

        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(&sql).map_err(CatalogueError::database)?;
        let series = stmt
            .query_map(bind.as_slice(), row_to_observation)
            .map_err(CatalogueError::database)?
            .filter_map(log_row_error)
            .collect();
        Ok(series)
    }

    fn fetch_metadata(&self, source: &str) -> Result<Option<SkyPosition>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT ra, dec FROM observations WHERE source = ?1 LIMIT 1")
            .map_err(CatalogueError::database)?;
        let mut rows = stmt.query(params![source]).map_err(CatalogueError::database)?;
        if let Some(row) = rows.next().map_err(CatalogueError::database)? {
            Ok(Some(SkyPosition {
                ra: row.get(0).map_err(CatalogueError::database)?,
                dec: row.get(1).map_err(CatalogueError::database)?,
            }))
        } else {
            Ok(None)
        }
    }
}
