use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("Negative or non-finite {field}: {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("Client name must not be empty")]
    EmptyClientName,

    #[error("Duplicate client '{name}' in portfolio")]
    DuplicateClient { name: String },

    #[error("Invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CopilotResult<T> = Result<T, CopilotError>;
