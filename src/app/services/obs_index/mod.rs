//! Priority/dedup observation index
//!
//! One SQLite file per observation cycle backs the index: a `meta` table
//! holding the cycle window and scanner progress, and an `observations` table
//! with one winning record per (header bucket, station identity) key. All
//! columns are named and read by name. A unique index enforces the
//! one-row-per-key invariant; [`IndexStore::upsert`] still verifies it and
//! treats a violation as fatal rather than silently picking a row.
//!
//! Every mutation is a single SQLite statement and therefore individually
//! atomic; a file's batch of upserts is deliberately not one transaction.

pub mod priority;

#[cfg(test)]
pub mod tests;

pub use priority::retains_priority;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::app::models::{CycleWindow, ObservationRecord};
use crate::constants::{BUCKET_TIMESTAMP_FORMAT, META_DATETIME_FORMAT};
use crate::{Error, Result};

/// Result of offering a candidate record to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First sighting of the key
    Inserted,
    /// Candidate won over the stored record
    Replaced,
    /// Stored record kept its priority
    Retained,
}

/// A winning record as read back for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub source_file: PathBuf,
    /// 1-based subset number within the source file's bulletin
    pub subset: usize,
    pub amendment: String,
    pub station_identity: String,
}

/// Handle on one per-cycle index store.
pub struct IndexStore {
    conn: Connection,
    path: PathBuf,
}

impl IndexStore {
    /// Open a per-cycle store, creating the file and schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("opening {}", path.display()), e))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                 cycle_date TEXT NOT NULL,
                 min_date   TEXT NOT NULL,
                 max_date   TEXT NOT NULL,
                 last_dir   TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS observations (
                 data_type       TEXT NOT NULL,
                 region          TEXT NOT NULL,
                 bulletin_number TEXT NOT NULL,
                 origin_center   TEXT NOT NULL,
                 timestamp       TEXT NOT NULL,
                 amendment       TEXT NOT NULL,
                 station_id      TEXT NOT NULL,
                 source_file     TEXT NOT NULL,
                 subset          INTEGER NOT NULL
             );
             CREATE UNIQUE INDEX IF NOT EXISTS obs_identity ON observations
                 (data_type, region, bulletin_number, origin_center, timestamp, station_id);",
        )?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing store; the extraction pass never creates one.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::store_missing(path.display().to_string()));
        }
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cycle window, creating it on the first run of a cycle.
    pub fn load_or_init_window(
        &self,
        cycle: NaiveDateTime,
        window_minutes: u32,
    ) -> Result<CycleWindow> {
        let existing = self
            .conn
            .query_row(
                "SELECT cycle_date, min_date, max_date, last_dir FROM meta",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>("cycle_date")?,
                        row.get::<_, String>("min_date")?,
                        row.get::<_, String>("max_date")?,
                        row.get::<_, String>("last_dir")?,
                    ))
                },
            )
            .optional()?;

        if let Some((cycle_s, min_s, max_s, last_dir)) = existing {
            return Ok(CycleWindow {
                cycle: parse_meta_datetime(&cycle_s)?,
                min_accept: parse_meta_datetime(&min_s)?,
                max_accept: parse_meta_datetime(&max_s)?,
                last_scanned_dir: last_dir,
            });
        }

        let window = CycleWindow::for_cycle(cycle, window_minutes);
        self.conn.execute(
            "INSERT INTO meta (cycle_date, min_date, max_date, last_dir)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                format_meta_datetime(window.cycle),
                format_meta_datetime(window.min_accept),
                format_meta_datetime(window.max_accept),
                window.last_scanned_dir,
            ],
        )?;
        Ok(window)
    }

    /// Persist scanner progress. Called on entering a directory, before any
    /// of its files are processed, so a crash mid-directory never rescans
    /// earlier directories on resume.
    pub fn advance_progress(&self, dir_name: &str) -> Result<()> {
        self.conn
            .execute("UPDATE meta SET last_dir = ?1", params![dir_name])?;
        Ok(())
    }

    /// Offer a candidate record to the index.
    ///
    /// Inserts on first sighting of the key, otherwise applies the amendment
    /// priority rule and replaces the stored row only on a candidate win.
    /// More than one stored row under the key is a fatal consistency
    /// violation.
    pub fn upsert(&self, record: &ObservationRecord) -> Result<UpsertOutcome> {
        let timestamp = record.bucket.timestamp_key();

        let mut stmt = self.conn.prepare(
            "SELECT amendment FROM observations
             WHERE data_type = ?1 AND region = ?2 AND bulletin_number = ?3
               AND origin_center = ?4 AND timestamp = ?5 AND station_id = ?6",
        )?;
        let stored: Vec<String> = stmt
            .query_map(
                params![
                    record.bucket.data_type,
                    record.bucket.region,
                    record.bucket.bulletin_number,
                    record.bucket.origin_center,
                    timestamp,
                    record.station_identity,
                ],
                |row| row.get("amendment"),
            )?
            .collect::<std::result::Result<_, _>>()?;

        match stored.as_slice() {
            [] => {
                self.conn.execute(
                    "INSERT INTO observations
                         (data_type, region, bulletin_number, origin_center,
                          timestamp, amendment, station_id, source_file, subset)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        record.bucket.data_type,
                        record.bucket.region,
                        record.bucket.bulletin_number,
                        record.bucket.origin_center,
                        timestamp,
                        record.amendment,
                        record.station_identity,
                        record.source_file.to_string_lossy(),
                        record.subset as i64,
                    ],
                )?;
                debug!("indexed {}", record.key());
                Ok(UpsertOutcome::Inserted)
            }
            [stored_tag] => {
                if retains_priority(stored_tag, &record.amendment) {
                    Ok(UpsertOutcome::Retained)
                } else {
                    self.conn.execute(
                        "UPDATE observations
                         SET amendment = ?7, source_file = ?8, subset = ?9
                         WHERE data_type = ?1 AND region = ?2 AND bulletin_number = ?3
                           AND origin_center = ?4 AND timestamp = ?5 AND station_id = ?6",
                        params![
                            record.bucket.data_type,
                            record.bucket.region,
                            record.bucket.bulletin_number,
                            record.bucket.origin_center,
                            timestamp,
                            record.station_identity,
                            record.amendment,
                            record.source_file.to_string_lossy(),
                            record.subset as i64,
                        ],
                    )?;
                    debug!("replaced {} ({} -> {})", record.key(), stored_tag, record.amendment);
                    Ok(UpsertOutcome::Replaced)
                }
            }
            rows => Err(Error::index_consistency(record.key(), rows.len())),
        }
    }

    /// Retention sweep: delete records whose bulletin timestamp predates the
    /// cutoff. The key timestamp format sorts lexicographically in
    /// chronological order.
    pub fn cleanup_before(&self, cutoff: NaiveDateTime) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM observations WHERE timestamp < ?1",
            params![cutoff.format(BUCKET_TIMESTAMP_FORMAT).to_string()],
        )?;
        Ok(removed)
    }

    /// All winning records, in index-read (insertion) order.
    pub fn winning_records(&self) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_file, subset, amendment, station_id
             FROM observations ORDER BY rowid",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    source_file: PathBuf::from(row.get::<_, String>("source_file")?),
                    subset: row.get::<_, i64>("subset")? as usize,
                    amendment: row.get("amendment")?,
                    station_identity: row.get("station_id")?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        Ok(records)
    }

    /// Number of records currently indexed.
    pub fn record_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) AS n FROM observations", [], |row| {
                    row.get("n")
                })?;
        Ok(count as usize)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn format_meta_datetime(value: NaiveDateTime) -> String {
    value.format(META_DATETIME_FORMAT).to_string()
}

fn parse_meta_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, META_DATETIME_FORMAT)
        .map_err(|e| Error::datetime_parsing(format!("meta column value {value:?}"), e))
}
