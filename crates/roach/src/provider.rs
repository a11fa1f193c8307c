//! Opening connections to a CockroachDB cluster.

use crate::traced::{BoxFuture, Connection};
use crate::{Error, Result, tls};
use roach_config::{Config, SslMode};
use std::time::Duration;
use tracing::{debug, error};

/// Hands out connections scoped to a database.
///
/// Every operation asks for a fresh connection and drops it when done.
pub trait ConnectionProvider: Send + Sync {
    type Conn: Connection;

    /// Connect to `database`. An empty name means the configured default.
    fn connect<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<Self::Conn>>;
}

/// Connects to a real cluster with tokio-postgres.
#[derive(Debug, Clone)]
pub struct CockroachProvider {
    config: Config,
}

impl CockroachProvider {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn pg_config(&self, database: &str) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.config.host)
            .port(self.config.port())
            .user(&self.config.user)
            .dbname(self.config.resolve_database(database))
            .application_name("roach");
        if let Some(secs) = self.config.connect_timeout_secs {
            pg.connect_timeout(Duration::from_secs(secs));
        }
        pg.ssl_mode(match self.config.ssl_mode() {
            SslMode::Disable => tokio_postgres::config::SslMode::Disable,
            _ => tokio_postgres::config::SslMode::Require,
        });
        pg
    }

    async fn open(&self, database: &str) -> Result<tokio_postgres::Client> {
        let pg = self.pg_config(database);
        debug!(url = %self.config.connection_url(database), "connecting");

        let client = match &self.config.sslconfig {
            Some(ssl) if ssl.mode != SslMode::Disable => {
                let connector = tls::make_tls(ssl).map_err(Error::connection)?;
                let (client, connection) = pg.connect(connector).await.map_err(Error::connection)?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        error!("database connection error: {e}");
                    }
                });
                client
            }
            _ => {
                let (client, connection) = pg
                    .connect(tokio_postgres::NoTls)
                    .await
                    .map_err(Error::connection)?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        error!("database connection error: {e}");
                    }
                });
                client
            }
        };

        client
            .simple_query("SELECT 1")
            .await
            .map_err(Error::connection)?;
        debug!("connected");
        Ok(client)
    }
}

impl ConnectionProvider for CockroachProvider {
    type Conn = tokio_postgres::Client;

    fn connect<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<Self::Conn>> {
        Box::pin(self.open(database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "db.internal".into(),
            user: "admin".into(),
            port: Some(26000),
            database: Some("shop".into()),
            connect_timeout_secs: Some(5),
            sslconfig: None,
        }
    }

    #[test]
    fn builds_pg_config() {
        let provider = CockroachProvider::new(config());
        let pg = provider.pg_config("inventory");
        assert_eq!(pg.get_user(), Some("admin"));
        assert_eq!(pg.get_dbname(), Some("inventory"));
        assert_eq!(pg.get_ports(), &[26000]);
        assert_eq!(pg.get_connect_timeout(), Some(&Duration::from_secs(5)));
        assert_eq!(
            pg.get_ssl_mode(),
            tokio_postgres::config::SslMode::Disable
        );
    }

    #[test]
    fn empty_database_uses_configured_default() {
        let provider = CockroachProvider::new(config());
        assert_eq!(provider.pg_config("").get_dbname(), Some("shop"));
    }
}
