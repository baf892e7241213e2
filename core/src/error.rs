use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrievanceError {
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    #[error("Complaint '{complaint_id}' not found")]
    NotFound { complaint_id: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GrievanceResult<T> = Result<T, GrievanceError>;
