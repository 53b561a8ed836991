//! Error types for news-report.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for report operations.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, schema drift, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Errors while transferring or decoding result rows.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A statement was refused because it is not a read-only query.
    #[error("Refused statement: {0}")]
    ReadOnly(String),

    /// Reading the menu selection or writing the report failed.
    #[error("Console error: {0}")]
    Console(#[from] std::io::Error),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Menu selection errors (non-numeric or out of range).
    #[error("Input error: {0}")]
    Input(String),
}

impl ReportError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a fetch error with the given message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Creates a read-only violation error with the given message.
    pub fn read_only(msg: impl Into<String>) -> Self {
        Self::ReadOnly(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an input error with the given message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Fetch(_) => "Fetch Error",
            Self::ReadOnly(_) => "Read-Only Violation",
            Self::Console(_) => "Console Error",
            Self::Config(_) => "Configuration Error",
            Self::Input(_) => "Input Error",
        }
    }
}

/// Result type alias using ReportError.
pub type Result<T> = std::result::Result<T, ReportError>;
