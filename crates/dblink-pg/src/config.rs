//! PostgreSQL connection configuration

use serde::{Deserialize, Serialize};

/// Connection settings for a [`PgBackend`](crate::PgBackend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PgConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub dbname: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Reported to the server for `pg_stat_activity`.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Defer connecting until the first statement runs.
    #[serde(default)]
    pub on_demand: bool,
}

fn default_port() -> u16 {
    5432
}

fn default_application_name() -> String {
    "dblink".to_string()
}

impl PgConfig {
    pub fn new(host: impl Into<String>, dbname: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            dbname: dbname.into(),
            user: None,
            password: None,
            application_name: default_application_name(),
            on_demand: false,
        }
    }

    /// Render the libpq-style key/value connection string.
    ///
    /// Credentials are skipped when unset so the server-side defaults
    /// (peer auth, `PGUSER`) still apply.
    pub fn dsn(&self) -> String {
        let mut dsn = format!("host={} ", self.host);
        dsn.push_str(&format!("dbname={} ", self.dbname));
        if let Some(user) = &self.user {
            dsn.push_str(&format!("user={} ", user));
        }
        if let Some(password) = &self.password {
            dsn.push_str(&format!("password={} ", password));
        }
        dsn.push_str(&format!("port={} ", self.port));
        dsn.push_str(&format!("application_name={}", self.application_name));
        dsn
    }
}
