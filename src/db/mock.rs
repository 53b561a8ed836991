//! Mock database client for testing.
//!
//! Returns scripted results or failures and records every connect, query and
//! close so tests can check the connection lifecycle.

use super::{Connector, DatabaseClient, QueryResult};
use crate::config::ConnectionConfig;
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// What a mock connection answers to `execute_query`.
#[derive(Debug, Clone)]
enum Response {
    Rows(QueryResult),
    QueryError(String),
    FetchError(String),
}

/// Shared record of what mock connections were asked to do.
#[derive(Debug, Clone, Default)]
pub struct ClientProbe {
    inner: Arc<Mutex<ProbeState>>,
}

#[derive(Debug, Default)]
struct ProbeState {
    connects: usize,
    closes: usize,
    executed: Vec<String>,
}

impl ClientProbe {
    fn state(&self) -> MutexGuard<'_, ProbeState> {
        // A poisoned probe only means a test already panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of connections opened.
    pub fn connects(&self) -> usize {
        self.state().connects
    }

    /// Number of connections closed.
    pub fn closes(&self) -> usize {
        self.state().closes
    }

    /// SQL statements executed, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state().executed.clone()
    }
}

/// A mock database client that returns predefined results.
pub struct MockDatabaseClient {
    response: Response,
    probe: ClientProbe,
    open: bool,
}

impl MockDatabaseClient {
    /// Creates a client that answers every query with an empty result.
    pub fn new() -> Self {
        Self::with_result(QueryResult::default())
    }

    /// Creates a client that answers every query with `result`.
    pub fn with_result(result: QueryResult) -> Self {
        Self::from_response(Response::Rows(result), ClientProbe::default())
    }

    fn from_response(response: Response, probe: ClientProbe) -> Self {
        Self {
            response,
            probe,
            open: true,
        }
    }

    /// Returns the probe recording this client's activity.
    pub fn probe(&self) -> ClientProbe {
        self.probe.clone()
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        if !self.open {
            return Err(ReportError::connection("Connection is already closed"));
        }
        self.probe.state().executed.push(sql.to_string());

        match &self.response {
            Response::Rows(result) => Ok(result.clone()),
            Response::QueryError(msg) => Err(ReportError::query(msg.clone())),
            Response::FetchError(msg) => Err(ReportError::fetch(msg.clone())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.probe.state().closes += 1;
        }
        Ok(())
    }
}

/// Connector handing out [`MockDatabaseClient`]s with a shared probe.
#[derive(Debug, Clone)]
pub struct MockConnector {
    response: Response,
    connect_error: Option<String>,
    probe: ClientProbe,
}

impl MockConnector {
    /// Connections answer every query with `result`.
    pub fn returning(result: QueryResult) -> Self {
        Self::with_response(Response::Rows(result))
    }

    /// Connections fail every query with a query error.
    pub fn failing_query(msg: impl Into<String>) -> Self {
        Self::with_response(Response::QueryError(msg.into()))
    }

    /// Connections fail every query with a fetch error.
    pub fn failing_fetch(msg: impl Into<String>) -> Self {
        Self::with_response(Response::FetchError(msg.into()))
    }

    /// Every connection attempt fails.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self {
            connect_error: Some(msg.into()),
            ..Self::with_response(Response::Rows(QueryResult::default()))
        }
    }

    fn with_response(response: Response) -> Self {
        Self {
            response,
            connect_error: None,
            probe: ClientProbe::default(),
        }
    }

    /// Returns the probe shared by every connection this connector opens.
    pub fn probe(&self) -> ClientProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
        if let Some(msg) = &self.connect_error {
            return Err(ReportError::connection(msg.clone()));
        }
        self.probe.state().connects += 1;
        Ok(Box::new(MockDatabaseClient::from_response(
            self.response.clone(),
            self.probe.clone(),
        )))
    }
}
