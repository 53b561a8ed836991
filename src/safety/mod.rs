//! Read-only statement guard.
//!
//! Parses SQL and classifies it so the executor only ever sends read
//! queries to the data store.

mod parser;

pub use parser::{classify_sql, SqlClassifier};

use crate::error::{ReportError, Result};
use std::fmt;

/// Safety level classification for SQL statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Read-only queries (SELECT, VALUES, plain EXPLAIN).
    Safe,
    /// Statements that modify rows or take row locks.
    Mutating,
    /// Schema changes, deletes, and anything unparseable or unrecognised.
    Destructive,
}

impl SafetyLevel {
    /// Returns true if statements at this level may be executed.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Priority used to pick the most dangerous level among several statements.
    fn priority(&self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Mutating => 1,
            Self::Destructive => 2,
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Mutating => write!(f, "Mutating"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// The type of SQL statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Explain,
    Insert,
    Update,
    Delete,
    Merge,
    /// `SELECT ... INTO`, which creates a table.
    SelectInto,
    /// `SELECT ... FOR UPDATE` and similar locking reads.
    LockingSelect,
    /// CREATE, ALTER, DROP, TRUNCATE, GRANT, REVOKE.
    Ddl,
    /// Multiple statements detected; contains the most dangerous type.
    Multiple(Box<StatementType>),
    /// Statement type could not be determined.
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Merge => write!(f, "MERGE"),
            Self::SelectInto => write!(f, "SELECT INTO"),
            Self::LockingSelect => write!(f, "SELECT FOR UPDATE/SHARE"),
            Self::Ddl => write!(f, "DDL"),
            Self::Multiple(inner) => write!(f, "Multiple ({})", inner),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// The determined safety level.
    pub level: SafetyLevel,
    /// The type of statement(s) detected.
    pub statement_type: StatementType,
    /// Why the statement was not recognised, if it wasn't.
    pub warning: Option<String>,
}

impl ClassificationResult {
    /// Creates a new classification result.
    pub fn new(level: SafetyLevel, statement_type: StatementType) -> Self {
        Self {
            level,
            statement_type,
            warning: None,
        }
    }

    /// Creates a classification result with a warning message.
    pub fn with_warning(
        level: SafetyLevel,
        statement_type: StatementType,
        warning: impl Into<String>,
    ) -> Self {
        Self {
            level,
            statement_type,
            warning: Some(warning.into()),
        }
    }
}

/// Fails with [`ReportError::ReadOnly`] unless `sql` is a read-only query.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let classification = classify_sql(sql);
    if classification.level.is_read_only() {
        return Ok(());
    }

    let mut msg = format!(
        "{} statement is not a read-only query ({})",
        classification.statement_type, classification.level
    );
    if let Some(warning) = classification.warning {
        msg.push_str(": ");
        msg.push_str(&warning);
    }
    Err(ReportError::read_only(msg))
}
