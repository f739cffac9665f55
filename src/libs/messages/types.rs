#[derive(Debug, Clone)]
pub enum Message {
    // === SCHEMA MESSAGES ===
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    StorageUnavailable(String),

    // === FEEDING MESSAGES ===
    FeedingLogged(i64, String), // id, time

    // === SLEEP MESSAGES ===
    SleepTrackingStarted(String),        // start time
    SleepTrackingStopped(String),        // duration label
    SleepTrackingRunning(String, String), // start time, elapsed
    SleepTrackingIdle,
    SleepLogged(i64),
    MultipleOpenSleepSessions(usize),
    SleepReminder(String), // baby name

    // === GROWTH MESSAGES ===
    GrowthRecorded(String), // id

    // === RECORD MESSAGES ===
    RecordUpdated(String, String), // kind, id
    RecordDeleted(String, String), // kind, id
    RecordsNotFound(String),       // kind
    RecordsHeader(String, String), // kind, view
    ChartHeader(String, String),   // series, view
    ConfirmDeleteRecord(String, String),
    OperationCancelled,
    NoChangesProvided,

    // === ANOMALY MESSAGES ===
    UnrecognizedAmount(String),
    NegativeSleepDuration(String, String), // start, end

    // === PROFILE MESSAGES ===
    ProfileName(String),
    ProfileNameNotSet,
    ProfileSaved,
    PromptProfileName,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String), // path
    ConfigDeleted,
    ConfigFileNotFound,
}
