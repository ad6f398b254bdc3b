use crate::db::error::GatewayError;

/// Failures surfaced by [`Logbook`](super::logbook::Logbook) operations.
#[derive(Debug, thiserror::Error)]
pub enum LogbookError {
    /// No activity with this id belongs to the acting user.
    #[error("Activity {0} not found")]
    NotFound(i64),

    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
