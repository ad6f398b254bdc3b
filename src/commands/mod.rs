pub mod activity;
pub mod init;
pub mod reset;
pub mod schema;
pub mod stats;
pub mod user;

use crate::db::db::Db;
use crate::db::users::User;
use crate::libs::config::Config;
use crate::libs::logbook::Logbook;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage users")]
    User(user::UserArgs),
    #[command(about = "Log a new activity")]
    Add(activity::AddArgs),
    #[command(about = "List logged activities")]
    List(activity::ListArgs),
    #[command(about = "Show one activity")]
    Show(activity::ShowArgs),
    #[command(about = "Edit an activity")]
    Edit(activity::EditArgs),
    #[command(about = "Delete an activity")]
    Delete(activity::DeleteArgs),
    #[command(about = "Show career statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Delete logged data")]
    Reset(reset::ResetArgs),
    #[command(about = "Bootstrap the database schema")]
    Schema(schema::SchemaArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(args).await,
            Commands::Add(args) => activity::add(args).await,
            Commands::List(args) => activity::list(args).await,
            Commands::Show(args) => activity::show(args).await,
            Commands::Edit(args) => activity::edit(args).await,
            Commands::Delete(args) => activity::delete(args).await,
            Commands::Stats(args) => stats::cmd(args).await,
            Commands::Reset(args) => reset::cmd(args).await,
            Commands::Schema(args) => schema::cmd(args).await,
        }
    }
}

/// Opened database plus the user a command acts for.
pub(crate) struct Session {
    pub logbook: Logbook,
    pub user: User,
}

impl Session {
    /// Opens the configured database and resolves the acting user from
    /// `--user`, falling back to the configured default.
    pub async fn open(user: Option<i64>) -> Result<Session> {
        let config = Config::read()?;
        let db = Db::open(&config.database()?).await?;
        let logbook = Logbook::new(db.gateway);

        let Some(user_id) = user.or(config.default_user) else {
            msg_bail_anyhow!(Message::UserNotSelected);
        };
        let Some(user) = logbook.users().get(user_id).await? else {
            msg_bail_anyhow!(Message::UserNotFound(user_id));
        };

        Ok(Session { logbook, user })
    }
}
