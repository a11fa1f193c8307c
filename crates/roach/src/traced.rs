//! Database connection abstraction and its traced wrapper.
//!
//! Reconciliation code only ever talks to a [`Connection`]: execute a
//! statement, or run a query and get [`Row`]s back. Every call made through
//! [`TracedConn`] is logged via tracing.

use crate::row::Row;
use crate::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use tracing::Instrument;

/// Boxed future returned by [`Connection`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for database connections that can execute statements.
///
/// This is implemented for `tokio_postgres::Client`. Errors are reported as
/// [`Error::Execution`] carrying the server's message verbatim.
pub trait Connection: Send + Sync {
    /// Execute a statement, returning the number of rows affected.
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<u64>>;

    /// Execute a query, returning all rows.
    fn query<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<Vec<Row>>>;
}

impl Connection for tokio_postgres::Client {
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            tokio_postgres::Client::execute(self, sql, &[])
                .await
                .map_err(Error::execution)
        })
    }

    fn query<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<Vec<Row>>> {
        Box::pin(async move {
            let rows = tokio_postgres::Client::query(self, sql, &[])
                .await
                .map_err(Error::execution)?;
            Ok(rows.iter().map(Row::from_pg).collect())
        })
    }
}

/// A wrapper around a database connection that logs all queries via tracing.
///
/// This is a thin wrapper that delegates to the underlying connection but adds
/// `tracing::debug_span!` around each query/execute call.
///
/// # Example
///
/// ```ignore
/// use roach::ConnectionExt;
///
/// let conn = provider.connect("defaultdb").await?;
/// let traced = conn.traced();
///
/// traced.execute("GRANT ALL ON DATABASE \"defaultdb\" TO \"r\"").await?;
/// let rows = traced.query("SHOW GRANTS FOR \"r\"").await?;
/// ```
pub struct TracedConn<'a, C: Connection> {
    conn: &'a C,
}

impl<'a, C: Connection> TracedConn<'a, C> {
    /// Create a new traced connection wrapper.
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Execute a statement, returning the number of rows affected.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        self.execute_as(sql, sql).await
    }

    /// Like [`execute`](Self::execute), but logs `shown` in place of the
    /// statement. Used for statements carrying secrets.
    pub async fn execute_as(&self, sql: &str, shown: &str) -> Result<u64> {
        let span = tracing::debug_span!(
            "db.execute",
            sql = %shown,
            affected = tracing::field::Empty,
        );
        let affected = self.conn.execute(sql).instrument(span.clone()).await?;
        span.record("affected", affected);
        Ok(affected)
    }

    /// Execute a query, returning all rows.
    pub async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %sql,
            rows = tracing::field::Empty,
        );
        let rows = self.conn.query(sql).instrument(span.clone()).await?;
        span.record("rows", rows.len());
        Ok(rows)
    }
}

/// Extension trait to get a traced wrapper from a connection.
pub trait ConnectionExt: Connection + Sized {
    /// Wrap this connection in a `TracedConn` for query logging.
    fn traced(&self) -> TracedConn<'_, Self> {
        TracedConn::new(self)
    }
}

impl<C: Connection> ConnectionExt for C {}
