//! Runs a catalog entry and prints its rows.
//!
//! Each run opens its own connection, reads the whole result set, closes
//! the connection, and only then writes the rows, so a failed report never
//! prints a partial table.

use std::io::Write;

use tracing::{debug, info, warn};

use super::catalog::ReportDefinition;
use crate::config::ConnectionConfig;
use crate::db::{Connector, PostgresConnector, QueryResult, Row};
use crate::error::Result;
use crate::safety::ensure_read_only;

/// Text placed between the columns of a printed row.
pub const COLUMN_SEPARATOR: &str = " - ";

/// Executes report queries against the configured database.
pub struct ReportExecutor {
    config: ConnectionConfig,
    connector: Box<dyn Connector>,
}

impl ReportExecutor {
    /// Creates an executor that connects to PostgreSQL.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(config, Box::new(PostgresConnector))
    }

    /// Creates an executor that opens connections through `connector`.
    pub fn with_connector(config: ConnectionConfig, connector: Box<dyn Connector>) -> Self {
        Self { config, connector }
    }

    /// Returns the connection settings used for every run.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Runs one report and writes its rows to `out`.
    ///
    /// Returns the number of rows printed.
    pub async fn run<W: Write>(&self, report: &ReportDefinition, out: &mut W) -> Result<usize> {
        info!("Running report {}", report.name);
        let row_count = self.run_sql(report.sql, out).await?;
        info!("Report {} printed {} rows", report.name, row_count);
        Ok(row_count)
    }

    /// Runs a read-only query and writes its rows to `out`, bracketed by
    /// blank lines.
    ///
    /// The leading blank line is written before anything else happens; on
    /// failure nothing else is written.
    pub async fn run_sql<W: Write>(&self, sql: &str, out: &mut W) -> Result<usize> {
        writeln!(out)?;
        out.flush()?;

        ensure_read_only(sql)?;
        let result = self.fetch(sql).await?;
        debug!(
            "Fetched {} rows in {:?}",
            result.row_count, result.execution_time
        );

        out.write_all(format_rows(&result.rows).as_bytes())?;
        writeln!(out)?;
        out.flush()?;

        Ok(result.row_count)
    }

    /// Opens a connection, runs `sql`, and closes the connection whatever
    /// the outcome.
    async fn fetch(&self, sql: &str) -> Result<QueryResult> {
        let mut client = self.connector.connect(&self.config).await?;
        let result = client.execute_query(sql).await;

        if let Err(e) = client.close().await {
            // The rows are already in memory; a failed close does not void them.
            warn!("Failed to close connection: {e}");
        }

        result
    }
}

/// Renders one row as its values joined by [`COLUMN_SEPARATOR`].
pub fn format_row(row: &Row) -> String {
    row.iter()
        .map(|value| value.to_display_string())
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}

/// Renders rows one per line, each line ending in `\n`.
pub fn format_rows(rows: &[Row]) -> String {
    let mut text = String::new();
    for row in rows {
        text.push_str(&format_row(row));
        text.push('\n');
    }
    text
}
