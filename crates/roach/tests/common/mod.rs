//! In-memory connection provider that records every call.

#![allow(dead_code)]

use roach::{BoxFuture, Connection, ConnectionProvider, Error, Result, Row, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    transcript: Vec<String>,
    responses: Vec<(String, Vec<Row>)>,
    failures: Vec<(String, String)>,
    connect_error: Option<String>,
}

/// Hands out [`MockConn`]s sharing one transcript.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<State>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries starting with `prefix` with `rows`.
    pub fn respond(&self, prefix: &str, rows: Vec<Row>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push((prefix.to_string(), rows));
        self
    }

    /// Fail statements starting with `prefix` with `message`.
    pub fn fail_statement(&self, prefix: &str, message: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((prefix.to_string(), message.to_string()));
        self
    }

    /// Fail every connection attempt with `message`.
    pub fn fail_connect(&self, message: &str) -> &Self {
        self.state.lock().unwrap().connect_error = Some(message.to_string());
        self
    }

    /// Everything that happened so far, one line per call.
    pub fn transcript(&self) -> Vec<String> {
        self.state.lock().unwrap().transcript.clone()
    }
}

pub struct MockConn {
    database: String,
    state: Arc<Mutex<State>>,
}

impl ConnectionProvider for MockProvider {
    type Conn = MockConn;

    fn connect<'a>(&'a self, database: &'a str) -> BoxFuture<'a, Result<MockConn>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.transcript.push(format!("connect {database}"));
            if let Some(message) = &state.connect_error {
                return Err(Error::Connection(message.clone()));
            }
            Ok(MockConn {
                database: database.to_string(),
                state: self.state.clone(),
            })
        })
    }
}

impl MockConn {
    fn run(&self, verb: &str, sql: &str) -> Result<Vec<Row>> {
        let mut state = self.state.lock().unwrap();
        state.transcript.push(format!("{verb} {sql}"));
        if let Some((_, message)) = state.failures.iter().find(|(p, _)| sql.starts_with(p)) {
            return Err(Error::Execution(message.clone()));
        }
        Ok(state
            .responses
            .iter()
            .find(|(p, _)| sql.starts_with(p))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Connection for MockConn {
    fn execute<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move { self.run("execute", sql).map(|_| 0) })
    }

    fn query<'a>(&'a self, sql: &'a str) -> BoxFuture<'a, Result<Vec<Row>>> {
        Box::pin(async move { self.run("query", sql) })
    }
}

/// A `SHOW GRANTS` row.
pub fn grant_row(
    database: &str,
    schema: Option<&str>,
    relation: Option<&str>,
    privilege: &str,
) -> Row {
    Row::new([
        ("database_name", Value::from(database)),
        ("schema_name", Value::from(schema)),
        ("relation_name", Value::from(relation)),
        ("grantee", Value::from("r")),
        ("privilege_type", Value::from(privilege)),
        ("is_grantable", Value::from(false)),
    ])
}
