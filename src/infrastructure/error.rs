// src/infrastructure/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// Implement conversion from infrastructure errors to domain errors
impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Network(msg) => DomainError::RemoteUnavailable(msg),
            InfrastructureError::Serialization(msg) => DomainError::Serialization(msg),
            InfrastructureError::FileSystem(msg) => DomainError::Storage(msg),
            InfrastructureError::Storage(msg) => DomainError::Storage(msg),
        }
    }
}

impl From<reqwest::Error> for InfrastructureError {
    fn from(error: reqwest::Error) -> Self {
        InfrastructureError::Network(error.to_string())
    }
}
