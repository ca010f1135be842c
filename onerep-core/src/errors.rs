use thiserror::Error;

/// Failures reported by a log store or profile service.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("malformed row {id}: {reason}")]
    MalformedRow { id: i32, reason: String },
    #[error("store lock poisoned")]
    Poisoned,
    #[error("store rejected write: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue receiver closed")]
    Closed,
    #[error("cue sink unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown phase `{0}`")]
    UnknownPhase(String),
    #[error("phase `{0}` has no configurable duration")]
    Untimed(String),
}
