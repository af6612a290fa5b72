use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("GitLab API error: {endpoint} returned {status}")]
    Api { endpoint: String, status: StatusCode },

    #[error("Webhook rejected message: {0}")]
    Webhook(StatusCode),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure class, used when reporting why a run was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Protocol,
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Network(e) if e.is_decode() => ErrorKind::Decode,
            Error::Network(_) | Error::InvalidHeader(_) | Error::InvalidUrl { .. } => {
                ErrorKind::Transport
            }
            Error::Api { .. } | Error::Webhook(_) => ErrorKind::Protocol,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }
}
