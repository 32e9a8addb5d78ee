// src/application/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Collection not found with ID {0}")]
    CollectionNotFound(String),

    #[error("Team not found with ID {0}")]
    TeamNotFound(String),

    #[error("Admin login required")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No game in progress")]
    NoActiveGame,

    #[error("{0}")]
    Other(String),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Other(msg) => {
                ApplicationError::Other(format!("{}: {}", context.into(), msg))
            }
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
            ApplicationError::Validation(msg) => {
                ApplicationError::Validation(format!("{}: {}", context.into(), msg))
            }
            err => ApplicationError::Other(format!("{}: {}", context.into(), err)),
        }
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        ApplicationError::Domain(DomainError::Io(err))
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(err: serde_json::Error) -> Self {
        ApplicationError::Domain(DomainError::from(err))
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_error_when_context_then_delegates_to_domain() {
        let err = ApplicationError::Domain(DomainError::Storage("locked".to_string()))
            .context("commit");
        assert_eq!(
            err.to_string(),
            "Domain error: Storage error: commit: locked"
        );
    }

    #[test]
    fn given_unauthorized_when_context_then_becomes_other() {
        let err = ApplicationError::Unauthorized.context("add tag");
        assert_eq!(err.to_string(), "add tag: Admin login required");
    }
}
