//! The single statement-execution boundary over the configured engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sportlog::db::gateway::QueryGateway;
//! use sportlog::db::value::Value;
//!
//! # async fn example(gateway: &dyn QueryGateway) -> Result<(), sportlog::db::error::GatewayError> {
//! let result = gateway
//!     .execute("SELECT * FROM activities WHERE user_id = $1", &[Value::Integer(1)])
//!     .await?;
//! println!("{} activities", result.affected);
//! # Ok(())
//! # }
//! ```

use super::dialect::Engine;
use super::error::GatewayError;
use super::value::{QueryResult, Value};
use async_trait::async_trait;
use std::sync::Arc;

/// Statement execution contract shared by both engines.
///
/// Statements always use `$N` placeholders. Implementations translate them
/// to their native syntax, return generated keys requested with
/// `RETURNING <column>` in `rows[0]`, and pass engine errors through without
/// reclassifying them.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Engine behind this gateway.
    fn engine(&self) -> Engine;

    async fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult, GatewayError>;
}

/// Process-wide gateway handle injected into every consumer.
pub type SharedGateway = Arc<dyn QueryGateway>;
