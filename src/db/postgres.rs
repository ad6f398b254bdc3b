//! PostgreSQL engine behind the query gateway.

use super::dialect::{self, Engine, Mode};
use super::error::GatewayError;
use super::gateway::QueryGateway;
use super::value::{QueryResult, Row, Value};
use async_trait::async_trait;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use tokio_postgres::{Client, NoTls};

/// Timestamp rendering shared with SQLite's `CURRENT_TIMESTAMP` text.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Gateway over a single PostgreSQL client connection.
pub struct PostgresGateway {
    client: Client,
}

impl PostgresGateway {
    /// Connects and spawns the connection driver on the current runtime.
    pub async fn connect(url: &str) -> Result<Self, GatewayError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection terminated");
            }
        });
        tracing::debug!("Connected to PostgreSQL");

        Ok(Self { client })
    }
}

#[async_trait]
impl QueryGateway for PostgresGateway {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    async fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult, GatewayError> {
        tracing::trace!(statement, params = params.len(), "postgres execute");
        let dispatch = dialect::plan(Engine::Postgres, statement);
        let bound: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        match dispatch.mode {
            Mode::Execute => {
                let affected = self.client.execute(dispatch.sql.as_str(), &bound).await?;
                Ok(QueryResult {
                    rows: Vec::new(),
                    affected,
                })
            }
            Mode::Rows | Mode::ExecuteReturningKey(_) => {
                let records = self.client.query(dispatch.sql.as_str(), &bound).await?;
                let rows = records.iter().map(convert_row).collect::<Result<Vec<_>, _>>()?;
                let affected = rows.len() as u64;
                Ok(QueryResult { rows, affected })
            }
        }
    }
}

fn convert_row(record: &tokio_postgres::Row) -> Result<Row, GatewayError> {
    let mut columns = Vec::with_capacity(record.len());
    for (index, column) in record.columns().iter().enumerate() {
        let ty = column.type_();
        let value = match *ty {
            Type::INT2 => record.try_get::<_, Option<i16>>(index)?.map(|v| Value::Integer(v.into())),
            Type::INT4 => record.try_get::<_, Option<i32>>(index)?.map(|v| Value::Integer(v.into())),
            Type::INT8 => record.try_get::<_, Option<i64>>(index)?.map(Value::Integer),
            Type::FLOAT4 => record.try_get::<_, Option<f32>>(index)?.map(|v| Value::Real(v.into())),
            Type::FLOAT8 => record.try_get::<_, Option<f64>>(index)?.map(Value::Real),
            Type::BOOL => record.try_get::<_, Option<bool>>(index)?.map(|v| Value::Integer(v.into())),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => record.try_get::<_, Option<String>>(index)?.map(Value::Text),
            Type::TIMESTAMP => record
                .try_get::<_, Option<NaiveDateTime>>(index)?
                .map(|v| Value::Text(v.format(TIMESTAMP_FORMAT).to_string())),
            Type::TIMESTAMPTZ => record
                .try_get::<_, Option<DateTime<Utc>>>(index)?
                .map(|v| Value::Text(v.naive_utc().format(TIMESTAMP_FORMAT).to_string())),
            Type::DATE => record.try_get::<_, Option<NaiveDate>>(index)?.map(|v| Value::Text(v.to_string())),
            _ => {
                return Err(GatewayError::UnsupportedType {
                    column: column.name().to_string(),
                    type_name: ty.name().to_string(),
                })
            }
        };
        columns.push((column.name().to_string(), value.unwrap_or(Value::Null)));
    }
    Ok(Row::new(columns))
}

/// Binds a neutral value to whatever type PostgreSQL inferred for the
/// parameter, so `$1` can be an `int4` key in one statement and an `int8`
/// limit in the next.
impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Integer(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                Type::INT8 => v.to_sql(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                Type::BOOL => (*v != 0).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => v.to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Value::Real(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => v.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 if v.fract() == 0.0 => Value::Integer(*v as i64).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => v.to_string().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Value::Text(s) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => s.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => Value::Integer(s.trim().parse()?).to_sql(ty, out),
                Type::FLOAT4 | Type::FLOAT8 => Value::Real(s.trim().parse()?).to_sql(ty, out),
                Type::TIMESTAMP => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?.to_sql(ty, out),
                Type::DATE => s.parse::<NaiveDate>()?.to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn mismatch(value: &Value, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind '{}' to PostgreSQL type {}", value, ty.name()).into()
}
