//! Errors raised by the query gateway.
//!
//! Engine failures are carried as-is so the calling layer can classify them.
//! The only recovery the gateway performs itself is skipping schema steps
//! whose target already exists, see [`GatewayError::is_already_exists`].

use tokio_postgres::error::SqlState;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Column '{0}' is missing from the result row")]
    MissingColumn(String),

    #[error("Column '{column}' holds '{found}', expected {expected}")]
    InvalidColumn {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("Column '{column}' has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },

    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Statement returned no rows")]
    NoRowsReturned,

    #[error("Database configuration error: {0}")]
    Config(String),

    #[error("Schema step '{step}' failed: {source}")]
    Schema {
        step: String,
        #[source]
        source: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Whether the engine refused a DDL statement because its table, column
    /// or index is already present.
    pub fn is_already_exists(&self) -> bool {
        match self {
            GatewayError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(message))) => {
                let message = message.to_lowercase();
                message.contains("duplicate column name") || message.contains("already exists")
            }
            GatewayError::Postgres(err) => matches!(
                err.code(),
                Some(code) if *code == SqlState::DUPLICATE_COLUMN
                    || *code == SqlState::DUPLICATE_TABLE
                    || *code == SqlState::DUPLICATE_OBJECT
            ),
            _ => false,
        }
    }
}
