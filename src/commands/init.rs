//! Interactive configuration setup.

use crate::{
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Print the effective database settings instead of running the wizard
    #[arg(short, long)]
    show: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.show {
        let database = Config::read()?.database()?;
        msg_info!(Message::ConfigCurrentDatabase(database.engine.to_string(), database.target()));
        return Ok(());
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
