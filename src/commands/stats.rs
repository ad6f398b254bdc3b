use super::Session;
use crate::{
    libs::{activity::SportType, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only this sport
    #[arg(short, long, value_enum)]
    sport: Option<SportType>,
    #[arg(short, long)]
    user: Option<i64>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub async fn cmd(args: StatsArgs) -> Result<()> {
    let session = Session::open(args.user).await?;

    let stats = match args.sport {
        Some(sport) => vec![session.logbook.career(session.user.id, sport).await?],
        None => session.logbook.career_all(session.user.id).await?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    if stats.iter().all(|career| career.activities == 0) {
        msg_info!(Message::StatsNotFound);
        return Ok(());
    }

    msg_print!(Message::StatsHeader(session.user.display_name()), true);
    View::stats(&stats);
    Ok(())
}
