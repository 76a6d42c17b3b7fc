//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add file, description and
/// configuration concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse tree description {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("cannot serialize {what}: {message}")]
    Serialize { what: String, message: String },

    #[error("duplicate node label: {0}")]
    DuplicateLabel(String),

    #[error("edge refers to unknown node label: {0}")]
    UnknownLabel(String),

    #[error("duplicate edge between {from} and {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("input is not a tree: {reason}")]
    NotATree { reason: String },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
