//! Database abstraction layer.
//!
//! Provides a trait-based interface for the one-shot connections the
//! report executor opens, so the executor can be exercised without a server.

mod mock;
mod postgres;
mod types;

pub use mock::{ClientProbe, MockConnector, MockDatabaseClient};
pub use postgres::{PostgresClient, PostgresConnector};
pub use types::{QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// A single open connection to the data store.
///
/// Implementations own exactly one server connection; callers must call
/// [`DatabaseClient::close`] when finished, on success and failure alike.
#[async_trait]
pub trait DatabaseClient: Send {
    /// Executes a SQL query and returns all of its rows.
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Closes the connection. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Opens new [`DatabaseClient`] connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a fresh connection for the given configuration.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>>;
}
