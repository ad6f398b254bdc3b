//! SQLite engine behind the query gateway.

use super::dialect::{self, Engine, Mode};
use super::error::GatewayError;
use super::gateway::QueryGateway;
use super::value::{QueryResult, Row, Value};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::Path;
use std::sync::Arc;

/// Gateway over a single SQLite connection.
///
/// Statements run on tokio's blocking pool. The connection mutex is held
/// only for the duration of one statement, inside the blocking task.
pub struct SqliteGateway {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGateway {
    pub fn open(path: &Path) -> Result<Self, GatewayError> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "Opened SQLite database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, GatewayError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, GatewayError> {
        // Match PostgreSQL, which always enforces foreign keys.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Runs one statement on the calling thread.
fn run(conn: &Mutex<Connection>, statement: &str, params: &[Value]) -> Result<QueryResult, GatewayError> {
    let dispatch = dialect::plan(Engine::Sqlite, statement);
    let conn = conn.lock();
    let mut stmt = conn.prepare(&dispatch.sql)?;

    match dispatch.mode {
        Mode::Rows => {
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut cursor = stmt.query(params_from_iter(params.iter()))?;
            let mut rows = Vec::new();
            while let Some(record) = cursor.next()? {
                let mut columns = Vec::with_capacity(names.len());
                for (index, name) in names.iter().enumerate() {
                    columns.push((name.clone(), from_value_ref(name, record.get_ref(index)?)?));
                }
                rows.push(Row::new(columns));
            }
            let affected = rows.len() as u64;
            Ok(QueryResult { rows, affected })
        }
        Mode::Execute => {
            let changed = stmt.execute(params_from_iter(params.iter()))?;
            Ok(QueryResult {
                rows: Vec::new(),
                affected: changed as u64,
            })
        }
        Mode::ExecuteReturningKey(column) => {
            let changed = stmt.execute(params_from_iter(params.iter()))?;
            let rows = if changed > 0 {
                vec![Row::new(vec![(column, Value::Integer(conn.last_insert_rowid()))])]
            } else {
                Vec::new()
            };
            Ok(QueryResult {
                rows,
                affected: changed as u64,
            })
        }
    }
}

#[async_trait]
impl QueryGateway for SqliteGateway {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    async fn execute(&self, statement: &str, params: &[Value]) -> Result<QueryResult, GatewayError> {
        tracing::trace!(statement, params = params.len(), "sqlite execute");
        let conn = Arc::clone(&self.conn);
        let statement = statement.to_string();
        let params = params.to_vec();

        tokio::task::spawn_blocking(move || run(&conn, &statement, &params)).await?
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Integer(v) => ToSqlOutput::from(*v),
            Value::Real(v) => ToSqlOutput::from(*v),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

fn from_value_ref(column: &str, value: ValueRef<'_>) -> Result<Value, GatewayError> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::Integer(v)),
        ValueRef::Real(v) => Ok(Value::Real(v)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(GatewayError::UnsupportedType {
            column: column.to_string(),
            type_name: "BLOB".to_string(),
        }),
    }
}
