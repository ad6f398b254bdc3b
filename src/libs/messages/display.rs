//! Display implementation for sportlog messages.
//!
//! All user-facing text lives here, so wording changes never touch the
//! command code.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigDatabaseUrlMissing => {
                "PostgreSQL needs a connection URL. Set it with 'sportlog init' or the DATABASE_URL variable.".to_string()
            }
            Message::ConfigCurrentDatabase(engine, target) => format!("Using {} database: {}", engine, target),
            Message::PromptSelectEngine => "Select the storage engine".to_string(),
            Message::PromptDatabasePath => "Enter the SQLite database file".to_string(),
            Message::PromptDatabaseUrl => "Enter the PostgreSQL connection URL".to_string(),
            Message::PromptDefaultUser => "Enter the default user id (empty for none)".to_string(),

            // === SCHEMA MESSAGES ===
            Message::SchemaInitializing(engine) => format!("Initializing {} schema", engine),
            Message::SchemaStepFailed(step, error) => format!("Schema step '{}' failed: {}", step, error),
            Message::SchemaReady(applied, skipped) => {
                format!("Schema ready: {} step(s) applied, {} already present", applied, skipped)
            }
            Message::SchemaHeader(engine) => format!("{} schema steps:", engine),

            // === USER MESSAGES ===
            Message::UserCreated(username, id) => format!("User '{}' created with ID {}", username, id),
            Message::UserAlreadyExists(username) => format!("User '{}' already exists", username),
            Message::UserNotFound(id) => format!("User with ID {} not found", id),
            Message::UserNotSelected => {
                "No user selected. Pass --user or set a default user with 'sportlog init'.".to_string()
            }
            Message::UsersHeader => "Users:".to_string(),
            Message::UsersNotFound => "No users found. Create one with 'sportlog user add'.".to_string(),

            // === ACTIVITY MESSAGES ===
            Message::ActivityCreated(id) => format!("Activity {} logged", id),
            Message::ActivityUpdated(id) => format!("Activity {} updated", id),
            Message::ActivityDeleted(id) => format!("Activity {} deleted", id),
            Message::ActivityNotFound(id) => format!("Activity with ID {} not found", id),
            Message::ActivitiesHeader(user) => format!("Activities of {}:", user),
            Message::ActivitiesNotFound => "No activities logged yet.".to_string(),
            Message::ActivityHeader(id) => format!("Activity {}:", id),
            Message::ActivityEditing(id) => format!("Editing activity {}", id),
            Message::ConfirmDeleteActivity(id) => format!("Are you sure you want to delete activity {}?", id),
            Message::PromptDate => "Date (YYYY-MM-DD)".to_string(),
            Message::PromptTime => "Time (HH:MM)".to_string(),
            Message::PromptLocation => "Location".to_string(),
            Message::PromptNotes => "Notes".to_string(),

            // === STATISTICS MESSAGES ===
            Message::StatsHeader(user) => format!("Career statistics of {}:", user),
            Message::StatsNotFound => "No statistics yet. Log an activity first.".to_string(),

            // === RESET MESSAGES ===
            Message::ConfirmResetOwn => "Delete ALL of your activities? This cannot be undone.".to_string(),
            Message::ConfirmResetEverything => {
                "Delete ALL activities of every user and all guest accounts? This cannot be undone.".to_string()
            }
            Message::ResetNotAllowed(user) => {
                format!("{} may not reset data: only guests and administrators can", user)
            }
            Message::ResetCompleted(activities, users) => {
                format!("Reset complete: {} activities and {} guest user(s) removed", activities, users)
            }

            // === GENERIC MESSAGES ===
            Message::OperationCancelled => "Operation cancelled.".to_string(),
            Message::DatabaseError(error) => format!("Database error: {}", error),
        };
        write!(f, "{}", text)
    }
}
