use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::NaiveDateTime;
use sqlx::{
    ConnectOptions as _, Connection as _, FromRow,
    sqlite::{SqliteConnectOptions, SqliteConnection},
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::garden::{ActuatorState, Reading};

pub const DEFAULT_DATABASE_PATH: &str = "data/Neutrino.db";

const CREATE_SENSORS_DATA: &str = r#"
    CREATE TABLE IF NOT EXISTS sensors_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        temperature REAL NOT NULL,
        gas REAL NOT NULL,
        humidity REAL NOT NULL,
        pressure REAL NOT NULL,
        altitude REAL NOT NULL,
        luminosity REAL NOT NULL,
        soil_moisture REAL,
        soil_temperature REAL,
        light_on BOOLEAN,
        pump_on BOOLEAN
    )
"#;

/// Appends one row per reading. Rows are never updated or deleted.
#[allow(async_fn_in_trait)]
pub trait PersistenceSink {
    async fn append(
        &mut self,
        reading: &Reading,
        state: &ActuatorState,
    ) -> Result<(), PersistenceError>;
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to insert reading: {0}")]
    Insert(#[source] sqlx::Error),
}

/// Row as stored, newest first from [`fetch_readings`].
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StoredReading {
    pub id: i64,

    /// UTC, in SQLite's `CURRENT_TIMESTAMP` layout.
    pub timestamp: NaiveDateTime,

    pub temperature: f64,

    pub gas: f64,

    pub humidity: f64,

    pub pressure: f64,

    pub altitude: f64,

    pub luminosity: f64,

    pub soil_moisture: Option<f64>,

    pub soil_temperature: Option<f64>,

    pub light_on: Option<bool>,

    pub pump_on: Option<bool>,
}

/// SQLite file store. Each append opens a connection, inserts exactly one
/// row and closes the connection again.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    options: SqliteConnectOptions,
}

impl SqliteStore {
    pub fn new(path: &Path) -> Self {
        Self {
            options: connect_options(path, false),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.options.get_filename().to_path_buf()
    }
}

impl PersistenceSink for SqliteStore {
    #[instrument(skip_all)]
    async fn append(
        &mut self,
        reading: &Reading,
        state: &ActuatorState,
    ) -> Result<(), PersistenceError> {
        let mut conn = self
            .options
            .connect()
            .await
            .map_err(PersistenceError::Connect)?;

        let inserted = insert_reading(&mut conn, reading, state).await;
        let closed = conn.close().await;

        let id = settle(inserted, closed)?;
        debug!("Stored reading as row {id}.");
        Ok(())
    }
}

/// A failed close after a successful insert still leaves the row committed,
/// so it only warns.
fn settle(
    inserted: std::result::Result<i64, sqlx::Error>,
    closed: std::result::Result<(), sqlx::Error>,
) -> Result<i64, PersistenceError> {
    let id = inserted.map_err(PersistenceError::Insert)?;

    if let Err(e) = closed {
        warn!("Stored row {id} but failed to close the connection. Error: {}", e);
    }

    Ok(id)
}

pub fn connect_options(path: &Path, create_if_missing: bool) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create_if_missing)
}

pub async fn open(path: &Path, create_if_missing: bool) -> Result<SqliteConnection> {
    connect_options(path, create_if_missing)
        .connect()
        .await
        .with_context(|| format!("failed to open database: {path:?}"))
}

pub async fn create_schema(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(CREATE_SENSORS_DATA)
        .execute(&mut *conn)
        .await
        .context("failed to create sensors_data table")?;

    Ok(())
}

/// Inserts one reading and returns the new row id. The timestamp is stored
/// in UTC so it sorts alongside rows stamped by `CURRENT_TIMESTAMP`.
pub async fn insert_reading(
    conn: &mut SqliteConnection,
    reading: &Reading,
    state: &ActuatorState,
) -> std::result::Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO sensors_data (timestamp, temperature, gas, humidity, pressure, altitude, luminosity, soil_moisture, soil_temperature, light_on, pump_on)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(reading.taken_at.naive_utc())
    .bind(reading.temperature)
    .bind(reading.gas)
    .bind(reading.humidity)
    .bind(reading.pressure)
    .bind(reading.altitude)
    .bind(reading.luminosity)
    .bind(reading.soil_moisture())
    .bind(reading.soil_temperature())
    .bind(state.light)
    .bind(state.pump)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Inserts a fixed test row, letting the database assign the timestamp.
pub async fn insert_seed_row(conn: &mut SqliteConnection) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO sensors_data (temperature, gas, humidity, pressure, altitude, luminosity)
        VALUES (75, 100, 50, 1000, 1000, 1000)
        "#,
    )
    .execute(&mut *conn)
    .await
    .context("failed to insert seed row")?;

    Ok(result.last_insert_rowid())
}

pub async fn count_readings(conn: &mut SqliteConnection) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM sensors_data")
        .fetch_one(&mut *conn)
        .await
        .context("failed to count readings")
}

pub async fn fetch_readings(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<StoredReading>> {
    sqlx::query_as(
        r#"
        SELECT id, timestamp, temperature, gas, humidity, pressure, altitude, luminosity, soil_moisture, soil_temperature, light_on, pump_on
        FROM sensors_data
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await
    .context("failed to fetch readings")
}
