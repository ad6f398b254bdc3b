//! Database layer for sportlog.
//!
//! All persistence goes through a single [`QueryGateway`](gateway::QueryGateway)
//! chosen once per process. Repositories write their SQL once, with `$N`
//! placeholders, and the gateway adapts it to SQLite or PostgreSQL.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sportlog::db::{connect, schema};
//! use sportlog::libs::config::DatabaseConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let gateway = connect(&DatabaseConfig::sqlite("sportlog.db".into())).await?;
//! schema::initialize(gateway.as_ref()).await?;
//! # Ok(())
//! # }
//! ```

/// Activity repository.
pub mod activities;

/// Connection setup and the process-wide `Db` handle.
pub mod db;

/// Placeholder rewriting, statement classification and engine column types.
pub mod dialect;

pub mod error;

/// The `QueryGateway` trait shared by both engines.
pub mod gateway;

pub mod postgres;

/// Idempotent schema bootstrap.
pub mod schema;

pub mod sqlite;

/// User repository.
pub mod users;

/// Engine-neutral parameters, rows and results.
pub mod value;

pub use db::connect;
