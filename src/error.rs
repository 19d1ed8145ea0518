//! Error types for the control socket client.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Everything that can end an invocation early.
#[derive(Debug, Error)]
pub enum CliError {
    /// Socket path or command missing from the command line.
    #[error("expected <socket> <command> [<key> <value> ...]")]
    Usage,

    /// A trailing argument key was given without a value.
    #[error("argument '{key}' is missing a value")]
    MissingValue {
        /// The unpaired key.
        key: String,
    },

    /// Nothing exists at the socket path.
    #[error("socket {} not found", path.display())]
    SocketNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// Connect, send, receive or decode failed.
    #[error("{0}")]
    Transport(#[from] std::io::Error),

    /// The exchange did not complete within the configured timeout.
    #[error("no response from {} within {:?}", path.display(), limit)]
    Timeout {
        /// The socket that was queried.
        path: PathBuf,
        /// The timeout that elapsed.
        limit: Duration,
    },

    /// The peer replied with something that is not JSON.
    #[error("invalid response: {0}")]
    ResponseParse(#[source] serde_json::Error),

    /// The configuration file could not be loaded.
    #[error("{0:#}")]
    Config(anyhow::Error),
}

impl CliError {
    /// Return the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Whether the usage text should be shown instead of a diagnostic.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage | Self::MissingValue { .. })
    }
}
