use crate::{
    db::{
        db::Db,
        users::{NewUser, Users, ROLE_ADMIN, ROLE_GUEST, ROLE_USER},
    },
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Role {
    User,
    Guest,
    Admin,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Guest => ROLE_GUEST,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Create a user
    Add {
        username: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long, value_enum, default_value = "user")]
        role: Role,
        #[arg(short, long, default_value = "en")]
        language: String,
    },
    /// List users
    List,
}

pub async fn cmd(args: UserArgs) -> Result<()> {
    let database = Config::read()?.database()?;
    let users = Users::new(Db::open(&database).await?.gateway);

    match args.command {
        UserCommand::Add {
            username,
            name,
            phone,
            role,
            language,
        } => {
            if users.get_by_username(&username).await?.is_some() {
                msg_error!(Message::UserAlreadyExists(username));
                return Ok(());
            }

            let user = NewUser {
                name,
                phone_number: phone,
                language,
                ..NewUser::new(&username).with_role(role.as_str())
            };
            let id = users.create(&user).await?;
            msg_success!(Message::UserCreated(username, id));
        }
        UserCommand::List => {
            let all = users.list().await?;
            if all.is_empty() {
                msg_info!(Message::UsersNotFound);
                return Ok(());
            }
            msg_print!(Message::UsersHeader, true);
            View::users(&all);
        }
    }
    Ok(())
}
