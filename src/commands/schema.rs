use crate::{
    db::{db::Db, schema::SchemaManager},
    libs::{config::Config, messages::Message},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// List the bootstrap steps without connecting
    #[arg(long)]
    steps: bool,
}

pub async fn cmd(args: SchemaArgs) -> Result<()> {
    let database = Config::read()?.database()?;

    if args.steps {
        msg_print!(Message::SchemaHeader(database.engine.to_string()), true);
        for (index, name) in SchemaManager::new(database.engine).step_names().iter().enumerate() {
            println!("{:>3}. {}", index + 1, name);
        }
        return Ok(());
    }

    msg_info!(Message::ConfigCurrentDatabase(database.engine.to_string(), database.target()));
    let db = Db::open(&database).await?;
    msg_success!(Message::SchemaReady(db.schema.applied, db.schema.skipped));
    Ok(())
}
