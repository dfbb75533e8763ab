//! Error types for the KYC wizard.

use std::path::PathBuf;

use crate::form::ListNotice;
use crate::wizard::StepId;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors returned by the authentication collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service answered with an error payload.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response from auth service: {0}")]
    InvalidResponse(String),

    #[error("No active session")]
    NotAuthenticated,
}

impl AuthError {
    /// Text shown to the user in a toast.
    ///
    /// API errors are surfaced verbatim; transport failures get a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::InvalidResponse(_) => {
                "Could not reach the authentication service".to_string()
            }
            Self::NotAuthenticated => "You are not signed in".to_string(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Session persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors raised while editing a step form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {0} is not a repeatable list")]
    NotAList(String),

    #[error(transparent)]
    List(#[from] ListNotice),
}

/// Wizard orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    EmptyDefinition,

    #[error("Step ids must be sequential from 1: expected {expected}, found {found}")]
    NonSequentialStep { expected: StepId, found: StepId },

    #[error("Wizard session {0} not found")]
    SessionNotFound(uuid::Uuid),

    #[error("Steps not completed yet: {0:?}")]
    IncompleteSteps(Vec<StepId>),

    #[error("Save is only available on the last step")]
    NotOnLastStep,

    #[error("Wizard session {0} is already being saved")]
    SaveInProgress(uuid::Uuid),

    #[error("Form error: {0}")]
    Form(#[from] FormError),
}

/// Final save errors.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to write submission {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for SaveError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}
