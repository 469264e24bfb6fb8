//! Telemetry store: append-only SQLite table of accepted readings.
//!
//! ```text
//!  readings(id INTEGER PK AUTOINCREMENT, timestamp TEXT,
//!           temperature REAL, humidity REAL, light INTEGER)
//! ```
//!
//! Rows are only ever inserted.  Reads are "latest N" (newest first) and a
//! full dump (oldest first) used by the CSV export.

use core::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use rusqlite::{Connection, params};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::app::ports::ReadingSink;
use crate::protocol::SensorReading;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS readings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT    NOT NULL,
    temperature REAL    NOT NULL,
    humidity    REAL    NOT NULL,
    light       INTEGER NOT NULL
)";

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "id,timestamp,temperature,humidity,light";

// ───────────────────────────────────────────────────────────────
// Types
// ───────────────────────────────────────────────────────────────

/// One persisted row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub id: i64,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub temperature: f32,
    pub humidity: f32,
    pub light: u16,
}

impl StoredReading {
    fn csv_row(&self) -> String {
        format!(
            "{},{},{:.2},{:.2},{}",
            self.id, self.timestamp, self.temperature, self.humidity, self.light
        )
    }
}

/// One column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    Timestamp(time::error::Format),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "sqlite: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Timestamp(e) => write!(f, "timestamp: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Timestamp(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<time::error::Format> for StoreError {
    fn from(e: time::error::Format) -> Self {
        Self::Timestamp(e)
    }
}

// ───────────────────────────────────────────────────────────────
// SqliteStore
// ───────────────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::init(Connection::open(path)?)?;
        info!("store: opened {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert with an explicit timestamp.
    pub fn append_at(&mut self, reading: &SensorReading, timestamp: &str) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO readings (timestamp, temperature, humidity, light)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                timestamp,
                f64::from(reading.temperature),
                f64::from(reading.humidity),
                reading.light_raw
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("store: row {} at {}", id, timestamp);
        Ok(id)
    }

    /// The `limit` most recent rows, newest first.
    pub fn latest(&self, limit: usize) -> Result<Vec<StoredReading>, StoreError> {
        self.query(
            "SELECT id, timestamp, temperature, humidity, light
             FROM readings ORDER BY id DESC LIMIT ?1",
            params![limit as i64],
        )
    }

    /// Every row, oldest first.
    pub fn all(&self) -> Result<Vec<StoredReading>, StoreError> {
        self.query(
            "SELECT id, timestamp, temperature, humidity, light
             FROM readings ORDER BY id ASC",
            params![],
        )
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Column layout of the `readings` table.
    pub fn schema(&self) -> Result<Vec<ColumnInfo>, StoreError> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(readings)")?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Dump the whole table to `path` as CSV.  Returns the row count.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        let rows = self.export_to(&mut out)?;
        out.flush()?;
        info!("store: exported {} rows to {}", rows, path.display());
        Ok(rows)
    }

    /// CSV export to any writer.
    pub fn export_to(&self, out: &mut impl Write) -> Result<usize, StoreError> {
        let rows = self.all()?;
        writeln!(out, "{CSV_HEADER}")?;
        for row in &rows {
            writeln!(out, "{}", row.csv_row())?;
        }
        Ok(rows.len())
    }

    fn query(
        &self,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<StoredReading>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, |row| {
                Ok(StoredReading {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    temperature: row.get::<_, f64>(2)? as f32,
                    humidity: row.get::<_, f64>(3)? as f32,
                    light: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl ReadingSink for SqliteStore {
    type Error = StoreError;

    fn append(&mut self, reading: &SensorReading) -> Result<i64, StoreError> {
        let timestamp = local_timestamp()?;
        self.append_at(reading, &timestamp)
    }
}

/// Local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
///
/// Falls back to UTC when the local offset cannot be determined (the
/// `time` crate refuses to read it once other threads are running).
pub fn local_timestamp() -> Result<String, StoreError> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?)
}
