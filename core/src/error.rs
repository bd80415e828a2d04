use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Config file '{path}' could not be read: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TrackResult<T> = Result<T, TrackError>;
