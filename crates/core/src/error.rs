use std::path::PathBuf;

use thiserror::Error;

use crate::types::SegmentId;

#[derive(Error, Debug)]
pub enum ClipcutError {
    #[error("Media import rejected for {path}: {reason}")]
    MediaRejected { path: PathBuf, reason: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
}

/// Failures of the transcript/translation service boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Gateway unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Gateway response does not match the expected schema: {reason}")]
    ParseFailure { reason: String },

    #[error("Missing API key for {provider_name}: {env_var} environment variable is not set")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Unavailable {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::ParseFailure {
            reason: err.to_string(),
        }
    }
}

/// Precondition gates. These leave the session untouched and are not meant to be shown
/// to the user as failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("no project is loaded")]
    NoProject,

    #[error("no segment with id {0}")]
    UnknownSegment(SegmentId),

    #[error("at least one segment must be selected")]
    NothingSelected,

    #[error("{action} is not available on the {view} screen")]
    WrongView {
        action: &'static str,
        view: &'static str,
    },

    #[error("a {0} request is already in flight")]
    AlreadyInFlight(&'static str),

    #[error("the {0} arrived after a reset and was discarded")]
    Superseded(&'static str),
}

pub type Result<T> = std::result::Result<T, ClipcutError>;
