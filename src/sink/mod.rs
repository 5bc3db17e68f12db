use std::{fmt, sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, Settings};

pub mod memory;
pub mod postgres;

pub use memory::MemorySink;
pub use postgres::PostgresSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl From<bool> for PowerState {
    fn from(power: bool) -> Self {
        if power {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One summary row, as handed to the stored procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitRecord {
    pub circuit_name: String,
    pub theme: String,
    pub component_count: usize,
    pub power_state: PowerState,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not connect to the database: {0}")]
    Connection(String),

    #[error("database rejected the call: {0}")]
    Sql(String),

    #[error("database did not answer within {0:?}")]
    Timeout(Duration),

    #[error("could not start the database runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("component count {0} does not fit the database column")]
    CountOverflow(usize),

    #[error("save worker stopped without reporting")]
    WorkerLost,
}

impl From<sqlx::Error> for SinkError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                SinkError::Connection(err.to_string())
            }
            sqlx::Error::Configuration(_) => SinkError::Connection(err.to_string()),
            other => SinkError::Sql(other.to_string()),
        }
    }
}

/// Where saved circuits go. Called from a worker thread, so implementations
/// may block.
pub trait RecordSink: Send + Sync {
    /// Short human-readable description of the destination.
    fn describe(&self) -> String;

    fn insert(&self, record: &CircuitRecord) -> Result<(), SinkError>;
}

/// Picks the sink the settings ask for: PostgreSQL when a database is
/// configured, otherwise an in-memory sink.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn RecordSink>, SinkError> {
    let sink: Arc<dyn RecordSink> = match &settings.database {
        Some(db) => Arc::new(PostgresSink::new(db, settings.database_password.as_deref())?),
        None => Arc::new(MemorySink::default()),
    };
    info!(sink = %sink.describe(), "record sink ready");
    Ok(sink)
}
