//! # Sportlog
//!
//! A command-line logbook for sport activities (skydiving, indoor skydiving,
//! scuba diving, running) with cumulative career statistics.
//!
//! ## Features
//!
//! - **Dual engine**: the same statements run on SQLite or PostgreSQL through
//!   one query gateway
//! - **Career statistics**: running totals and jump or dive numbers derived
//!   when an activity is logged
//! - **Idempotent schema**: bootstrapped on every start, safe to repeat
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sportlog::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
