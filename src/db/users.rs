//! User persistence.
//!
//! Accounts are created locally from the CLI and carry a locked password
//! marker; authentication is not handled by this crate.

use super::error::GatewayError;
use super::gateway::SharedGateway;
use super::value::Row;
use serde::Serialize;

/// Password hash stored for accounts that cannot log in.
pub const LOCKED_PASSWORD: &str = "!";

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_GUEST: &str = "guest";
pub const ROLE_USER: &str = "user";

const INSERT_USER: &str =
    "INSERT INTO users (username, name, phone_number, password, language, role) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = $1";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = $1 ORDER BY id LIMIT 1";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY id";
const DELETE_GUESTS: &str = "DELETE FROM users WHERE role = $1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub language: String,
    pub role: String,
    pub created_at: Option<String>,
}

impl User {
    /// Administrators see and reset every user's data.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.username.as_deref() == Some(ROLE_ADMIN)
    }

    pub fn is_guest(&self) -> bool {
        self.role == ROLE_GUEST
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| format!("user #{}", self.id))
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        Ok(User {
            id: row.get_i64("id")?.ok_or_else(|| GatewayError::MissingColumn("id".to_string()))?,
            username: row.get_text("username")?,
            name: row.get_text("name")?,
            phone_number: row.get_text("phone_number")?,
            language: row.get_text("language")?.unwrap_or_else(|| "en".to_string()),
            role: row.get_text("role")?.unwrap_or_else(|| ROLE_USER.to_string()),
            created_at: row.get_text("created_at")?,
        })
    }
}

/// Input for a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub language: String,
    pub role: String,
}

impl NewUser {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            name: None,
            phone_number: None,
            language: "en".to_string(),
            role: ROLE_USER.to_string(),
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }
}

pub struct Users {
    gateway: SharedGateway,
}

impl Users {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, user: &NewUser) -> Result<i64, GatewayError> {
        let result = self
            .gateway
            .execute(
                INSERT_USER,
                &[
                    user.username.as_str().into(),
                    user.name.clone().into(),
                    user.phone_number.clone().into(),
                    LOCKED_PASSWORD.into(),
                    user.language.as_str().into(),
                    user.role.as_str().into(),
                ],
            )
            .await?;
        result.returned_id("id")
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>, GatewayError> {
        let result = self.gateway.execute(SELECT_BY_ID, &[id.into()]).await?;
        result.first().map(User::from_row).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, GatewayError> {
        let result = self.gateway.execute(SELECT_BY_USERNAME, &[username.into()]).await?;
        result.first().map(User::from_row).transpose()
    }

    pub async fn list(&self) -> Result<Vec<User>, GatewayError> {
        let result = self.gateway.execute(SELECT_ALL, &[]).await?;
        result.rows.iter().map(User::from_row).collect()
    }

    /// Removes every guest account. Their activities must be gone first.
    pub async fn delete_guests(&self) -> Result<u64, GatewayError> {
        Ok(self.gateway.execute(DELETE_GUESTS, &[ROLE_GUEST.into()]).await?.affected)
    }
}
