// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Tag operation failed: {0}")]
    TagOperationFailed(String),

    #[error("Invalid tag data: {0}")]
    InvalidTagData(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote endpoint unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        let context = context.into();
        match self {
            DomainError::InvalidTag(msg) => DomainError::InvalidTag(format!("{}: {}", context, msg)),
            DomainError::InvalidTagData(msg) => {
                DomainError::InvalidTagData(format!("{}: {}", context, msg))
            }
            DomainError::Storage(msg) => DomainError::Storage(format!("{}: {}", context, msg)),
            DomainError::RemoteUnavailable(msg) => {
                DomainError::RemoteUnavailable(format!("{}: {}", context, msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context, msg)),
            err => DomainError::Other(format!("{}: {}", context, err)),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
