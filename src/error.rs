//! Error types for webtasker.
//!
//! Each component fails with its own domain enum; the top-level [`Error`]
//! folds them together for the command boundary. User cancellation is not
//! an error at all — flows short-circuit through [`Flow::Cancelled`] and
//! the command terminates silently.

use std::path::PathBuf;

/// Top-level error type for the integration core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Identity(#[from] IdentityError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("There is no active editor.")]
    NoActiveSurface,

    #[error("Could not find webtask associated with current editor.")]
    NoActiveResource,
}

/// Profile configuration errors. Messages name the remedy where one exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read the webtask config path setting.")]
    MissingPath,

    #[error("Could not find file: {}. Use command [webtasker init] to login.", path.display())]
    MissingProfile { path: PathBuf },

    #[error("Could not read file: {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse JSON file: {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not find default profile. Use command [webtasker init] to login.")]
    MissingDefault { path: PathBuf },

    #[error("Could not write file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Identity classification errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error(
        "You must specify a valid e-mail address or a phone number. The phone \
         number must start with + followed by country code, area code, and \
         local number."
    )]
    InvalidFormat,
}

/// Remote API errors. Transport failures are collapsed to one kind per
/// operation; callers never see `reqwest` error variants.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Unable to {op}: could not connect to the service.")]
    Network { op: &'static str, reason: String },

    #[error("Unable to {op}: the service rejected the request (HTTP {status}).")]
    Rejected { op: &'static str, status: u16 },

    #[error("Unable to {op}: unexpected response from the service.")]
    InvalidResponse { op: &'static str, reason: String },

    #[error("We were unable to verify your identity.")]
    VerificationFailed,
}

/// Workspace (editing surface) errors from the injected collaborator.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Could not open surface {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read surface {id}: {source}")]
    Read {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write surface {id}: {source}")]
    Write {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown surface: {id}")]
    UnknownSurface { id: String },
}

/// Outcome of a user-interruptible flow.
///
/// A user declining or dismissing a prompt terminates the flow with
/// [`Flow::Cancelled`], which the command boundary reports as silence —
/// no message, no log, no error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow<T> {
    /// The flow ran to completion.
    Done(T),
    /// The user backed out before the next side effect.
    Cancelled,
}

impl<T> Flow<T> {
    /// True if the flow was cancelled by the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Flow::Cancelled)
    }

    /// Map the completed value, preserving cancellation.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flow<U> {
        match self {
            Flow::Done(value) => Flow::Done(f(value)),
            Flow::Cancelled => Flow::Cancelled,
        }
    }
}

/// Result alias for flow-shaped operations: a typed failure, a completed
/// value, or a silent cancellation.
pub type FlowResult<T> = std::result::Result<Flow<T>, Error>;

/// Result type alias for the integration core.
pub type Result<T> = std::result::Result<T, Error>;
