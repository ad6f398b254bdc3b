use super::error::GatewayError;
use super::gateway::SharedGateway;
use super::postgres::PostgresGateway;
use super::schema::{self, SchemaReport};
use super::sqlite::SqliteGateway;
use crate::db::dialect::Engine;
use crate::libs::config::{Config, DatabaseConfig};
use anyhow::Result;
use std::sync::Arc;

pub const DB_FILE_NAME: &str = "sportlog.db";

/// Opens the gateway for the configured engine. The schema is left as is.
pub async fn connect(config: &DatabaseConfig) -> Result<SharedGateway, GatewayError> {
    config.validate()?;
    tracing::debug!(engine = %config.engine, target = %config.target(), "Connecting to database");

    let gateway: SharedGateway = match config.engine {
        Engine::Sqlite => Arc::new(SqliteGateway::open(&config.sqlite_path()?)?),
        Engine::Postgres => {
            let url = config.url.as_deref().unwrap_or_default();
            Arc::new(PostgresGateway::connect(url).await?)
        }
    };
    Ok(gateway)
}

/// Process-wide database handle: one gateway, schema already bootstrapped.
pub struct Db {
    pub gateway: SharedGateway,
    pub schema: SchemaReport,
}

impl Db {
    /// Opens the database named by the stored configuration and environment.
    pub async fn new() -> Result<Db> {
        let database = Config::read()?.database()?;
        Ok(Self::open(&database).await?)
    }

    pub async fn open(config: &DatabaseConfig) -> Result<Db, GatewayError> {
        let gateway = connect(config).await?;
        Self::with_gateway(gateway).await
    }

    /// Wraps an existing gateway, bootstrapping its schema first.
    pub async fn with_gateway(gateway: SharedGateway) -> Result<Db, GatewayError> {
        let schema = schema::initialize(gateway.as_ref()).await?;
        Ok(Db { gateway, schema })
    }

    pub fn engine(&self) -> Engine {
        self.gateway.engine()
    }
}
