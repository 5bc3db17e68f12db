use std::{str::FromStr, time::Duration};

use sqlx::{
    postgres::{PgConnectOptions, PgConnection},
    Connection,
};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use super::{CircuitRecord, RecordSink, SinkError};
use crate::config::DatabaseSettings;

/// Writes records through a stored procedure:
/// `CALL <procedure>(name, theme, count, power_state, ts)`.
///
/// Opens one connection per call. The procedure commits on its own.
pub struct PostgresSink {
    options: PgConnectOptions,
    statement: String,
    timeout: Duration,
    target: String,
    runtime: Runtime,
}

impl PostgresSink {
    pub fn new(settings: &DatabaseSettings, password: Option<&str>) -> Result<Self, SinkError> {
        let url = settings.validated_url()?;
        settings.validate_procedure()?;

        let mut options = PgConnectOptions::from_str(url.as_str())?;
        if let Some(password) = password {
            options = options.password(password);
        }

        let target = format!(
            "postgres {}{}",
            url.host_str().unwrap_or_default(),
            url.path()
        );

        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(Self {
            options,
            statement: format!("CALL {}($1, $2, $3, $4, $5)", settings.procedure),
            timeout: settings.timeout(),
            target,
            runtime,
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    async fn call(&self, record: &CircuitRecord, count: i32) -> Result<(), SinkError> {
        let mut conn = tokio::time::timeout(self.timeout, PgConnection::connect_with(&self.options))
            .await
            .map_err(|_| SinkError::Timeout(self.timeout))??;

        let query = sqlx::query(&self.statement)
            .bind(&record.circuit_name)
            .bind(&record.theme)
            .bind(count)
            .bind(record.power_state.as_str())
            .bind(record.timestamp);

        let result = tokio::time::timeout(self.timeout, query.execute(&mut conn))
            .await
            .map_err(|_| SinkError::Timeout(self.timeout));

        if let Err(err) = conn.close().await {
            warn!(%err, "closing database connection failed");
        }

        result??;
        Ok(())
    }
}

impl RecordSink for PostgresSink {
    fn describe(&self) -> String {
        self.target.clone()
    }

    fn insert(&self, record: &CircuitRecord) -> Result<(), SinkError> {
        let count = i32::try_from(record.component_count).map_err(|_| SinkError::CountOverflow(record.component_count))?;
        debug!(statement = %self.statement, target = %self.target, "calling stored procedure");
        self.runtime.block_on(self.call(record, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ConfigError, sink::PowerState};

    fn settings(url: &str, procedure: &str) -> DatabaseSettings {
        DatabaseSettings {
            url: url.into(),
            procedure: procedure.into(),
            connect_timeout_secs: 1,
        }
    }

    #[test]
    fn builds_call_statement() {
        let sink = PostgresSink::new(&settings("postgres://circuit@localhost:5432/circuits", "audit.insert_circuit_log"), Some("pw")).unwrap();
        assert_eq!(sink.statement(), "CALL audit.insert_circuit_log($1, $2, $3, $4, $5)");
        assert_eq!(sink.describe(), "postgres localhost/circuits");
    }

    #[test]
    fn rejects_bad_settings_before_connecting() {
        let err = PostgresSink::new(&settings("postgres://circuit@localhost/circuits", "drop table"), None).err();
        assert!(matches!(err, Some(SinkError::Config(ConfigError::Procedure(_)))));
    }

    #[test]
    fn unreachable_server_is_a_connection_error() {
        // port 1 on loopback refuses immediately
        let sink = PostgresSink::new(&settings("postgres://circuit@127.0.0.1:1/circuits", "insert_circuit_log"), None).unwrap();
        let record = CircuitRecord {
            circuit_name: "c".into(),
            theme: "t".into(),
            component_count: 0,
            power_state: PowerState::Off,
            timestamp: chrono::Local::now().naive_local(),
        };
        let err = sink.insert(&record).unwrap_err();
        assert!(matches!(err, SinkError::Connection(_) | SinkError::Timeout(_)), "{err}");
    }
}
