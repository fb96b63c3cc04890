use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XrayError {
    /// Network, DNS or TLS failure before any response arrived.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Response body was undefined.")]
    EmptyBody,

    /// Status code with an operation-specific message.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{status}: Unable to connect to JIRA during {operation}.")]
    Unexpected {
        status: u16,
        operation: &'static str,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid JSON document: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Auth(#[from] xray_auth::AuthError),
}

impl XrayError {
    /// HTTP status behind the error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            XrayError::Status { status, .. } | XrayError::Unexpected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self.status() {
            Some(401) => Some("Verify the Xray license and the profile credentials"),
            Some(404) => Some("Check if the issue or project key is correct"),
            _ => match self {
                XrayError::Transport(_) => Some("Check the host, port and protocol of the profile"),
                XrayError::InvalidDocument { .. } => {
                    Some("Import files must contain Xray JSON execution results")
                }
                _ => None,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, XrayError>;
