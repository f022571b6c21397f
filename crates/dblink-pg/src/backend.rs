//! PostgreSQL backend implementation

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::{debug, error, info};

use dblink_core::{Column, DriverError, ResultSet, SqlBackend, Stopwatch};

use crate::config::PgConfig;
use crate::escape::escape_literal;

/// PostgreSQL implementation of [`SqlBackend`]
///
/// Statements run over the simple (text) protocol so every value arrives in
/// its textual wire form; declared column types come from preparing the
/// statement first. Coercion to typed values happens in the result set.
pub struct PgBackend {
    config: PgConfig,
    client: RwLock<Option<Client>>,
    last_error: parking_lot::RwLock<Option<String>>,
}

impl PgBackend {
    /// Create a backend without touching the network.
    ///
    /// Call [`connect`](SqlBackend::connect) explicitly, or set
    /// [`PgConfig::on_demand`] to connect on first use.
    pub fn new(config: PgConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            last_error: parking_lot::RwLock::new(None),
        }
    }

    pub fn config(&self) -> &PgConfig {
        &self.config
    }

    async fn ensure_connected(&self) -> Result<(), DriverError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }
        if self.config.on_demand {
            self.establish().await
        } else {
            Err(DriverError::NotConnected)
        }
    }

    async fn establish(&self) -> Result<(), DriverError> {
        let mut slot = self.client.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let (client, connection) = tokio_postgres::connect(&self.config.dsn(), NoTls)
            .await
            .map_err(|e| self.record(DriverError::Connect(e.to_string())))?;

        // The connection object drives the socket until the client drops.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection task ended: {}", e);
            }
        });

        info!(
            host = %self.config.host,
            dbname = %self.config.dbname,
            "connected to PostgreSQL"
        );
        *slot = Some(client);
        Ok(())
    }

    fn record(&self, err: DriverError) -> DriverError {
        *self.last_error.write() = Some(err.to_string());
        err
    }

    fn record_query(&self, err: tokio_postgres::Error) -> DriverError {
        self.record(DriverError::Query(err.to_string()))
    }
}

#[async_trait]
impl SqlBackend for PgBackend {
    async fn connect(&self) -> Result<(), DriverError> {
        self.establish().await
    }

    async fn disconnect(&self) -> Result<(), DriverError> {
        let mut slot = self.client.write().await;
        if slot.take().is_some() {
            info!("disconnected from PostgreSQL");
        }
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<ResultSet, DriverError> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(DriverError::NotConnected)?;

        let timer = Stopwatch::start();

        // Prepare first: the statement metadata carries the declared name
        // and type of every result column.
        let statement = client.prepare(sql).await.map_err(|e| self.record_query(e))?;
        let columns: Vec<Column> = statement
            .columns()
            .iter()
            .map(|c| Column::new(c.name(), c.type_().name()))
            .collect();

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut affected = 0;
        for message in client
            .simple_query(sql)
            .await
            .map_err(|e| self.record_query(e))?
        {
            match message {
                SimpleQueryMessage::Row(row) => rows.push(
                    (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect(),
                ),
                SimpleQueryMessage::CommandComplete(count) => affected = count,
                _ => {}
            }
        }

        debug!(
            rows = rows.len(),
            elapsed = timer.elapsed_secs(),
            "query completed"
        );
        Ok(ResultSet::new(columns, rows, affected))
    }

    async fn execute(&self, sql: &str) -> Result<u64, DriverError> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(DriverError::NotConnected)?;

        let timer = Stopwatch::start();
        let affected = client
            .execute(sql, &[])
            .await
            .map_err(|e| self.record_query(e))?;

        debug!(
            affected,
            elapsed = timer.elapsed_secs(),
            "statement executed"
        );
        Ok(affected)
    }

    fn escape(&self, value: Option<&str>) -> String {
        escape_literal(value)
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_query_without_connection_fails() {
        let backend = PgBackend::new(PgConfig::new("localhost", "postgres"));
        let err = backend.query("SELECT 1").await.unwrap_err();
        assert!(matches!(err, DriverError::NotConnected));
    }

    #[tokio::test]
    async fn test_disconnect_when_not_connected_is_ok() {
        let backend = PgBackend::new(PgConfig::new("localhost", "postgres"));
        assert!(backend.disconnect().await.is_ok());
    }

    #[test]
    fn test_escape_delegates_to_literal_quoting() {
        let backend = PgBackend::new(PgConfig::new("localhost", "postgres"));
        assert_eq!(backend.escape(None), "NULL");
        assert_eq!(backend.escape(Some("o'brien")), "'o''brien'");
    }

    #[test]
    fn test_last_error_starts_empty() {
        let backend = PgBackend::new(PgConfig::new("localhost", "postgres"));
        assert_eq!(backend.last_error(), None);
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL server"]
    async fn test_round_trip_against_server() {
        let mut config = PgConfig::new("localhost", "postgres");
        config.user = Some("postgres".to_string());
        config.on_demand = true;

        let backend = PgBackend::new(config);
        let mut result = backend
            .query("SELECT 1::int4 AS n, 2.5::numeric AS x, 'a'::text AS s")
            .await
            .unwrap();

        assert_eq!(result.column_types(), vec!["int4", "numeric", "text"]);
        let row = result.fetch_typed().unwrap().unwrap();
        assert_eq!(row[0].as_int(), Some(1));
        assert_eq!(row[1].as_float(), Some(2.5));
        assert_eq!(row[2].as_text(), Some("a"));
    }
}
