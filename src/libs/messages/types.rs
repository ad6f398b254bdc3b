#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleDatabase,
    ConfigDatabaseUrlMissing,
    ConfigCurrentDatabase(String, String), // engine, target
    PromptSelectEngine,
    PromptDatabasePath,
    PromptDatabaseUrl,
    PromptDefaultUser,

    // === SCHEMA MESSAGES ===
    SchemaInitializing(String),       // engine
    SchemaStepFailed(String, String), // step, error
    SchemaReady(usize, usize),        // applied, skipped
    SchemaHeader(String),             // engine

    // === USER MESSAGES ===
    UserCreated(String, i64), // username, id
    UserAlreadyExists(String),
    UserNotFound(i64),
    UserNotSelected,
    UsersHeader,
    UsersNotFound,

    // === ACTIVITY MESSAGES ===
    ActivityCreated(i64),
    ActivityUpdated(i64),
    ActivityDeleted(i64),
    ActivityNotFound(i64),
    ActivitiesHeader(String), // user
    ActivitiesNotFound,
    ActivityHeader(i64),
    ActivityEditing(i64),
    ConfirmDeleteActivity(i64),
    PromptDate,
    PromptTime,
    PromptLocation,
    PromptNotes,

    // === STATISTICS MESSAGES ===
    StatsHeader(String), // user
    StatsNotFound,

    // === RESET MESSAGES ===
    ConfirmResetOwn,
    ConfirmResetEverything,
    ResetCompleted(u64, u64), // activities, users
    ResetNotAllowed(String),

    // === GENERIC MESSAGES ===
    OperationCancelled,
    DatabaseError(String),
}
