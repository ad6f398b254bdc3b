//! Activity commands: add, list, show, edit and delete.

use super::Session;
use crate::{
    libs::{
        activity::{ActivityDraft, RawNumber, SportType},
        error::LogbookError,
        messages::Message,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Optional activity fields shared by `add` and `edit`.
///
/// Numbers are taken as text and normalized like form input, so a blank or
/// malformed value is stored as empty instead of being rejected.
#[derive(Debug, Default, Args)]
pub struct ActivityFields {
    /// Time of day, HH:MM
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    skill_level: Option<String>,
    #[arg(long)]
    visibility: Option<String>,
    #[arg(long)]
    signature: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<String>,
    /// Exit altitude in metres
    #[arg(long)]
    height: Option<String>,
    /// Maximum depth in metres
    #[arg(long)]
    depth: Option<String>,
    /// Distance in kilometres
    #[arg(long)]
    distance: Option<String>,
    /// Explicit jump number; continues from the previous jump when omitted
    #[arg(long)]
    jump_number: Option<String>,
    /// Freefall time in seconds
    #[arg(long)]
    freefall_time: Option<String>,
    /// Tunnel time in minutes
    #[arg(long)]
    tunnel_time: Option<String>,
    /// Explicit dive number; continues from the previous dive when omitted
    #[arg(long)]
    dive_number: Option<String>,
    /// Bottom time in minutes
    #[arg(long)]
    bottom_time: Option<String>,
}

impl ActivityFields {
    fn is_empty(&self) -> bool {
        [
            &self.time,
            &self.location,
            &self.notes,
            &self.skill_level,
            &self.visibility,
            &self.signature,
            &self.latitude,
            &self.longitude,
            &self.height,
            &self.depth,
            &self.distance,
            &self.jump_number,
            &self.freefall_time,
            &self.tunnel_time,
            &self.dive_number,
            &self.bottom_time,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    /// Overwrites the draft fields that were given on the command line.
    fn apply(self, draft: &mut ActivityDraft) {
        let number = |v: String| Some(RawNumber::Text(v));

        if let Some(v) = self.time {
            draft.time = Some(v);
        }
        if let Some(v) = self.location {
            draft.location = Some(v);
        }
        if let Some(v) = self.notes {
            draft.notes = Some(v);
        }
        if let Some(v) = self.skill_level {
            draft.skill_level = Some(v);
        }
        if let Some(v) = self.visibility {
            draft.visibility = Some(v);
        }
        if let Some(v) = self.signature {
            draft.signature = Some(v);
        }
        if let Some(v) = self.latitude {
            draft.latitude = number(v);
        }
        if let Some(v) = self.longitude {
            draft.longitude = number(v);
        }
        if let Some(v) = self.height {
            draft.height = number(v);
        }
        if let Some(v) = self.depth {
            draft.depth = number(v);
        }
        if let Some(v) = self.distance {
            draft.distance = number(v);
        }
        if let Some(v) = self.jump_number {
            draft.jump_number = number(v);
        }
        if let Some(v) = self.freefall_time {
            draft.freefall_time = number(v);
        }
        if let Some(v) = self.tunnel_time {
            draft.tunnel_time = number(v);
        }
        if let Some(v) = self.dive_number {
            draft.dive_number = number(v);
        }
        if let Some(v) = self.bottom_time {
            draft.bottom_time = number(v);
        }
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(value_enum)]
    sport: SportType,
    /// Activity date, YYYY-MM-DD; today when omitted
    #[arg(short, long)]
    date: Option<String>,
    /// Acting user id; defaults to the configured user
    #[arg(short, long)]
    user: Option<i64>,
    /// Read the remaining fields from a JSON object
    #[arg(long)]
    json: Option<String>,
    #[command(flatten)]
    fields: ActivityFields,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(short, long, value_enum)]
    sport: Option<SportType>,
    #[arg(short, long)]
    user: Option<i64>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: i64,
    #[arg(short, long)]
    user: Option<i64>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,
    #[arg(short, long)]
    date: Option<String>,
    #[arg(short, long)]
    user: Option<i64>,
    #[command(flatten)]
    fields: ActivityFields,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: i64,
    #[arg(short, long)]
    user: Option<i64>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn add(args: AddArgs) -> Result<()> {
    let session = Session::open(args.user).await?;

    let mut draft = match &args.json {
        Some(json) => serde_json::from_str::<ActivityDraft>(json)?,
        None => ActivityDraft::default(),
    };
    draft.sport_type = Some(args.sport);
    if let Some(date) = args.date {
        draft.date = date;
    }
    if draft.date.trim().is_empty() {
        draft.date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    }
    args.fields.apply(&mut draft);

    let activity = session.logbook.create(session.user.id, &draft).await?;
    msg_success!(Message::ActivityCreated(activity.id));
    View::activity(&activity);
    Ok(())
}

pub async fn list(args: ListArgs) -> Result<()> {
    let session = Session::open(args.user).await?;
    let activities = session.logbook.list(session.user.id, args.sport).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }
    if activities.is_empty() {
        msg_info!(Message::ActivitiesNotFound);
        return Ok(());
    }

    msg_print!(Message::ActivitiesHeader(session.user.display_name()), true);
    View::activities(&activities);
    Ok(())
}

pub async fn show(args: ShowArgs) -> Result<()> {
    let session = Session::open(args.user).await?;

    match session.logbook.get(session.user.id, args.id).await {
        Ok(activity) if args.json => println!("{}", serde_json::to_string_pretty(&activity)?),
        Ok(activity) => {
            msg_print!(Message::ActivityHeader(activity.id), true);
            View::activity(&activity);
        }
        Err(LogbookError::NotFound(id)) => msg_error!(Message::ActivityNotFound(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Edits the given fields, or prompts for the common ones when none are
/// given. Derived totals are kept as stored.
pub async fn edit(args: EditArgs) -> Result<()> {
    let session = Session::open(args.user).await?;

    let current = match session.logbook.get(session.user.id, args.id).await {
        Ok(activity) => activity,
        Err(LogbookError::NotFound(id)) => {
            msg_error!(Message::ActivityNotFound(id));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut draft = ActivityDraft::from(&current);
    if args.date.is_none() && args.fields.is_empty() {
        msg_print!(Message::ActivityEditing(current.id), true);
        prompt_common_fields(&mut draft)?;
    } else {
        if let Some(date) = args.date {
            draft.date = date;
        }
        args.fields.apply(&mut draft);
    }

    let activity = session.logbook.update(session.user.id, current.id, &draft).await?;
    msg_success!(Message::ActivityUpdated(activity.id));
    View::activity(&activity);
    Ok(())
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let session = Session::open(args.user).await?;

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteActivity(args.id).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    match session.logbook.delete(session.user.id, args.id).await {
        Ok(()) => msg_success!(Message::ActivityDeleted(args.id)),
        Err(LogbookError::NotFound(id)) => msg_error!(Message::ActivityNotFound(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn prompt_common_fields(draft: &mut ActivityDraft) -> Result<()> {
    draft.date = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptDate.to_string())
        .default(draft.date.clone())
        .interact_text()?;
    draft.time = Some(
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTime.to_string())
            .default(draft.time_or_default())
            .interact_text()?,
    );
    draft.location = optional_text(Message::PromptLocation, draft.location.take())?;
    draft.notes = optional_text(Message::PromptNotes, draft.notes.take())?;
    Ok(())
}

fn optional_text(prompt: Message, current: Option<String>) -> Result<Option<String>> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(current.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(value).filter(|v| !v.trim().is_empty()))
}
