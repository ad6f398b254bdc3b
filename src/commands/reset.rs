//! Bulk deletion of logged data.
//!
//! Guests clear their own activities. Administrators clear every activity
//! and remove guest accounts. Regular accounts are refused.

use super::Session;
use crate::{
    libs::{
        logbook::{ResetScope, ResetSummary},
        messages::Message,
    },
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ResetArgs {
    #[arg(short, long)]
    user: Option<i64>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: ResetArgs) -> Result<()> {
    let session = Session::open(args.user).await?;
    let Some(scope) = ResetScope::for_user(&session.user) else {
        msg_bail_anyhow!(Message::ResetNotAllowed(session.user.display_name()));
    };

    let prompt = match scope {
        ResetScope::Own(_) => Message::ConfirmResetOwn,
        ResetScope::Everything => Message::ConfirmResetEverything,
    };
    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let ResetSummary { activities, users } = session.logbook.reset(scope).await?;
    msg_success!(Message::ResetCompleted(activities, users));
    Ok(())
}
