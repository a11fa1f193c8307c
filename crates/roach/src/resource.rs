//! The lifecycle every managed object goes through.

use crate::Result;
use crate::traced::{Connection, TracedConn};
use std::future::Future;
use tracing::info;

/// A kind of object reconciled against the database.
///
/// `create`, `read` and `update` return the record as the database reports
/// it afterwards; `delete` returns nothing. Each operation opens its own
/// connection and runs its statements one after the other.
pub trait Resource {
    /// The declared shape of the object.
    type Record;

    /// Name used in logs and errors, e.g. `grant`.
    const KIND: &'static str;

    fn create(&self, desired: &Self::Record) -> impl Future<Output = Result<Self::Record>>;

    fn read(&self, id: &str) -> impl Future<Output = Result<Self::Record>>;

    fn update(
        &self,
        state: &Self::Record,
        desired: &Self::Record,
    ) -> impl Future<Output = Result<Self::Record>>;

    fn delete(&self, state: &Self::Record) -> impl Future<Output = Result<()>>;
}

/// Run one statement on behalf of a resource operation.
pub(crate) async fn exec<C: Connection>(conn: &TracedConn<'_, C>, sql: &str) -> Result<()> {
    exec_as(conn, sql, sql).await
}

/// Run a statement that must not show up in logs verbatim, logging `shown`
/// instead.
pub(crate) async fn exec_as<C: Connection>(
    conn: &TracedConn<'_, C>,
    sql: &str,
    shown: &str,
) -> Result<()> {
    info!("{shown}");
    conn.execute_as(sql, shown).await?;
    Ok(())
}
