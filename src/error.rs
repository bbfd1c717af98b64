use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} must be a date in YYYY-MM-DD format (got '{value}')")]
    InvalidDate { field: String, value: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("{name} has no follow-up task")]
    NoFollowUp { name: String },

    #[error("Unknown relationship type: {0}")]
    UnknownClassification(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Settings write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
