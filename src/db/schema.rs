//! Idempotent schema bootstrap for both engines.
//!
//! The schema is an ordered list of named steps: table creation, the
//! additive columns the tables grew over time, and supporting indexes.
//! Every step is applied on every startup. A step whose target already
//! exists is logged and skipped; any other failure aborts initialization.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sportlog::db::schema::initialize;
//! use sportlog::db::sqlite::SqliteGateway;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let gateway = SqliteGateway::open_in_memory()?;
//! let report = initialize(&gateway).await?;
//! println!("{} applied, {} skipped", report.applied, report.skipped);
//! # Ok(())
//! # }
//! ```

use super::dialect::Engine;
use super::error::GatewayError;
use super::gateway::QueryGateway;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};

/// A single bootstrap statement.
#[derive(Debug, Clone)]
struct SchemaStep {
    /// Stable name used in logs and fatal errors
    name: String,
    /// Native DDL for the active engine
    sql: String,
}

/// Outcome of a bootstrap run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub applied: usize,
    pub skipped: usize,
}

/// Ordered registry of schema steps for one engine.
pub struct SchemaManager {
    engine: Engine,
    steps: Vec<SchemaStep>,
}

impl SchemaManager {
    pub fn new(engine: Engine) -> Self {
        let mut manager = Self { engine, steps: Vec::new() };
        manager.register_steps();
        manager
    }

    /// Registers every step in application order.
    ///
    /// Base tables come first, then the columns older databases lack. On a
    /// fresh database the column steps all report "already exists" and are
    /// skipped.
    fn register_steps(&mut self) {
        let id = self.engine.id_column();
        let timestamp = self.engine.timestamp_column();
        let timestamp_type = self.engine.timestamp_type();
        let real = self.engine.real_type();

        self.add_step(
            "create_users_table",
            format!(
                "CREATE TABLE IF NOT EXISTS users (
                    id {id},
                    username VARCHAR(255),
                    name VARCHAR(255),
                    phone_number VARCHAR(50) UNIQUE,
                    password VARCHAR(255) NOT NULL,
                    language VARCHAR(10) DEFAULT 'en',
                    role VARCHAR(20) DEFAULT 'user',
                    otp VARCHAR(10),
                    otp_expiry {timestamp_type},
                    created_at {timestamp}
                )"
            ),
        );

        self.add_step(
            "create_activities_table",
            format!(
                "CREATE TABLE IF NOT EXISTS activities (
                    id {id},
                    user_id INTEGER NOT NULL REFERENCES users(id),
                    date VARCHAR(50) NOT NULL,
                    time VARCHAR(50) NOT NULL,
                    location TEXT,
                    latitude {real},
                    longitude {real},
                    height {real},
                    depth {real},
                    distance {real},
                    total_distance {real},
                    sport_type VARCHAR(50) NOT NULL,
                    notes TEXT,
                    jump_number INTEGER,
                    total_jumps INTEGER,
                    freefall_time INTEGER,
                    total_freefall_time INTEGER,
                    tunnel_time INTEGER,
                    total_tunnel_time INTEGER,
                    skill_level VARCHAR(50),
                    dive_number INTEGER,
                    visibility VARCHAR(50),
                    bottom_time INTEGER,
                    total_bottom_time INTEGER,
                    signature TEXT,
                    created_at {timestamp}
                )"
            ),
        );

        // Columns added after the first release of each table
        let user_columns = [
            ("phone_number", "VARCHAR(50)"),
            ("name", "VARCHAR(255)"),
            ("otp", "VARCHAR(10)"),
            ("otp_expiry", timestamp_type),
        ];
        for (column, definition) in user_columns {
            self.add_column("users", column, definition);
        }

        let activity_columns = [
            ("freefall_time", "INTEGER"),
            ("total_freefall_time", "INTEGER"),
            ("tunnel_time", "INTEGER"),
            ("skill_level", "VARCHAR(50)"),
            ("dive_number", "INTEGER"),
            ("visibility", "VARCHAR(50)"),
            ("bottom_time", "INTEGER"),
            ("signature", "TEXT"),
            ("total_distance", real),
            ("total_tunnel_time", "INTEGER"),
            ("total_bottom_time", "INTEGER"),
        ];
        for (column, definition) in activity_columns {
            self.add_column("activities", column, definition);
        }

        self.add_step(
            "index_users_phone_number",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_phone ON users(phone_number)".to_string(),
        );
        // History lookups filter on user and sport and read the highest id
        self.add_step(
            "index_activities_user_sport",
            "CREATE INDEX IF NOT EXISTS idx_activities_user_sport ON activities(user_id, sport_type, id)".to_string(),
        );
    }

    fn add_step(&mut self, name: &str, sql: String) {
        self.steps.push(SchemaStep { name: name.to_string(), sql });
    }

    fn add_column(&mut self, table: &str, column: &str, definition: &str) {
        self.add_step(
            &format!("add_{}_{}", table, column),
            format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition),
        );
    }

    /// Step names in application order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name.as_str()).collect()
    }

    /// Applies every step through the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Schema`] naming the first step that failed for
    /// any reason other than its target already existing.
    pub async fn apply(&self, gateway: &dyn QueryGateway) -> Result<SchemaReport, GatewayError> {
        msg_debug!(Message::SchemaInitializing(self.engine.to_string()));
        let mut report = SchemaReport::default();

        for step in &self.steps {
            match gateway.execute(&step.sql, &[]).await {
                Ok(_) => {
                    report.applied += 1;
                    tracing::debug!(step = %step.name, "Schema step applied");
                }
                Err(e) if e.is_already_exists() => {
                    report.skipped += 1;
                    tracing::info!(step = %step.name, reason = %e, "Schema step skipped");
                }
                Err(e) => {
                    msg_error!(Message::SchemaStepFailed(step.name.clone(), e.to_string()));
                    return Err(GatewayError::Schema {
                        step: step.name.clone(),
                        source: Box::new(e),
                    });
                }
            }
        }

        msg_debug!(Message::SchemaReady(report.applied, report.skipped));
        Ok(report)
    }
}

/// Bootstraps the schema on the gateway's engine.
pub async fn initialize(gateway: &dyn QueryGateway) -> Result<SchemaReport, GatewayError> {
    SchemaManager::new(gateway.engine()).apply(gateway).await
}
