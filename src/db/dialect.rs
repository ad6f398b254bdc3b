//! SQL dialect handling for the two supported engines.
//!
//! Statements are written once using PostgreSQL-style `$1, $2, ...`
//! placeholders and an optional trailing `RETURNING <column>` on inserts.
//! This module decides how each engine has to run such a statement and
//! rewrites the text where SQLite needs something different. It also owns
//! the engine-specific column types used by the schema bootstrap.
//!
//! ## Rewriting rules
//!
//! - `$N` becomes `?N` for SQLite. Numbered native placeholders keep
//!   repeated and out-of-order references bound to the right argument.
//! - Text inside `'...'`, `"..."` and `--` comments is never touched.
//! - A trailing `RETURNING <column>` on an SQLite insert is stripped; the
//!   gateway reads the key back through `last_insert_rowid` instead.
//! - A statement is a read or a write by its main verb, so
//!   `WITH ... DELETE` reports changed rows like a plain `DELETE`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keywords that open a row-producing statement.
const READ_KEYWORDS: &[&str] = &["SELECT", "WITH", "PRAGMA", "VALUES", "SHOW", "EXPLAIN"];

/// Verbs that can follow the common table expressions of a `WITH`.
const MAIN_VERBS: &[&str] = &["SELECT", "VALUES", "INSERT", "UPDATE", "DELETE"];

/// Storage engine backing the gateway for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Sqlite,
    Postgres,
}

impl Engine {
    /// Column definition for an auto-incrementing surrogate key.
    pub fn id_column(&self) -> &'static str {
        match self {
            Engine::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
            Engine::Postgres => "SERIAL PRIMARY KEY",
        }
    }

    /// Column definition for a creation timestamp.
    pub fn timestamp_column(&self) -> &'static str {
        match self {
            Engine::Sqlite => "DATETIME DEFAULT CURRENT_TIMESTAMP",
            Engine::Postgres => "TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
        }
    }

    /// Bare timestamp type without a default.
    pub fn timestamp_type(&self) -> &'static str {
        match self {
            Engine::Sqlite => "DATETIME",
            Engine::Postgres => "TIMESTAMP",
        }
    }

    /// Eight-byte floating point type. PostgreSQL `REAL` is only four bytes.
    pub fn real_type(&self) -> &'static str {
        match self {
            Engine::Sqlite => "REAL",
            Engine::Postgres => "DOUBLE PRECISION",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Sqlite => "SQLite",
            Engine::Postgres => "PostgreSQL",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Engine::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Engine::Postgres),
            other => Err(format!("unknown database engine '{}'", other)),
        }
    }
}

/// Broad statement category, decided by the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

/// How a gateway has to run a statement on its engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Collect every produced row; `affected` is the row count.
    Rows,
    /// Run for its side effects; `affected` is the changed row count.
    Execute,
    /// Run for its side effects, then report the generated key under the
    /// given column name.
    ExecuteReturningKey(String),
}

/// Native statement text plus dispatch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub sql: String,
    pub mode: Mode,
}

/// Works out the native form of a neutral statement for `engine`.
pub fn plan(engine: Engine, statement: &str) -> Dispatch {
    let kind = classify(statement);
    match engine {
        Engine::Postgres => {
            let mode = if kind == StatementKind::Read || has_returning(statement) { Mode::Rows } else { Mode::Execute };
            Dispatch {
                sql: statement.to_string(),
                mode,
            }
        }
        Engine::Sqlite => {
            let sql = numbered_placeholders(statement);
            if kind == StatementKind::Read {
                return Dispatch { sql, mode: Mode::Rows };
            }
            if leading_keyword(&sql).as_deref() == Some("INSERT") {
                if let Some((stripped, column)) = split_returning(&sql) {
                    return Dispatch {
                        sql: stripped,
                        mode: Mode::ExecuteReturningKey(column),
                    };
                }
            }
            let mode = if has_returning(&sql) { Mode::Rows } else { Mode::Execute };
            Dispatch { sql, mode }
        }
    }
}

/// Classifies a statement by its main verb. For a `WITH` statement that is
/// the first verb after the common table expressions.
pub fn classify(statement: &str) -> StatementKind {
    match main_keyword(statement) {
        Some(keyword) if READ_KEYWORDS.contains(&keyword.as_str()) => StatementKind::Read,
        _ => StatementKind::Write,
    }
}

/// Rewrites `$N` placeholders to SQLite's numbered `?N` form.
pub fn numbered_placeholders(statement: &str) -> String {
    let mask = code_mask(statement);
    let bytes = statement.as_bytes();
    let mut out = String::with_capacity(statement.len());
    let mut copied = 0;

    for i in 0..bytes.len() {
        if mask[i] && bytes[i] == b'$' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            out.push_str(&statement[copied..i]);
            out.push('?');
            copied = i + 1;
        }
    }
    out.push_str(&statement[copied..]);
    out
}

/// Whether the statement carries a `RETURNING` clause outside literals.
pub fn has_returning(statement: &str) -> bool {
    find_keyword(statement, "RETURNING").is_some()
}

/// Splits a trailing `RETURNING <column>` off a statement.
///
/// Returns `None` when there is no such clause or when it returns anything
/// other than a single plain column.
pub fn split_returning(statement: &str) -> Option<(String, String)> {
    let position = find_keyword(statement, "RETURNING")?;
    let tail = statement[position + "RETURNING".len()..].trim();
    let column = tail.strip_suffix(';').unwrap_or(tail).trim();

    let mut chars = column.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return None;
    }

    Some((statement[..position].trim_end().to_string(), column.to_string()))
}

/// First keyword of the statement, upper-cased.
fn leading_keyword(statement: &str) -> Option<String> {
    let mask = code_mask(statement);
    let bytes = statement.as_bytes();
    let start = (0..bytes.len()).find(|&i| mask[i] && bytes[i].is_ascii_alphabetic())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_alphabetic())
        .map_or(bytes.len(), |len| start + len);
    Some(statement[start..end].to_ascii_uppercase())
}

/// Leading keyword, or for `WITH` the first top-level verb after it.
fn main_keyword(statement: &str) -> Option<String> {
    let leading = leading_keyword(statement)?;
    if leading != "WITH" {
        return Some(leading);
    }

    let mask = code_mask(statement);
    let bytes = statement.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        if !mask[i] {
            i += 1;
            continue;
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b if b.is_ascii_alphabetic() && (i == 0 || !is_word_byte(bytes[i - 1])) => {
                let end = bytes[i..]
                    .iter()
                    .position(|b| !is_word_byte(*b))
                    .map_or(bytes.len(), |len| i + len);
                let word = statement[i..end].to_ascii_uppercase();
                if depth == 0 && MAIN_VERBS.contains(&word.as_str()) {
                    return Some(word);
                }
                i = end;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    Some(leading)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offset of the last standalone occurrence of `keyword` in code.
fn find_keyword(statement: &str, keyword: &str) -> Option<usize> {
    let mask = code_mask(statement);
    let bytes = statement.as_bytes();

    statement
        .to_ascii_uppercase()
        .match_indices(keyword)
        .map(|(position, _)| position)
        .filter(|&position| {
            let end = position + keyword.len();
            mask[position]
                && (position == 0 || !is_word_byte(bytes[position - 1]))
                && (end == bytes.len() || !is_word_byte(bytes[end]))
        })
        .last()
}

/// Marks every byte that is SQL code, as opposed to a quoted literal,
/// quoted identifier or line comment.
fn code_mask(statement: &str) -> Vec<bool> {
    let bytes = statement.as_bytes();
    let mut mask = vec![true; bytes.len()];
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                let end = (i + 1).min(bytes.len());
                mask[start..end].fill(false);
                i = end;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                mask[start..i].fill(false);
            }
            _ => i += 1,
        }
    }

    mask
}
