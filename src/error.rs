use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::{configuration::ConfigurationError, exit_codes::ExitCode, format::FormattingError};

/// Errors returned by [`crate::client::EphanyClient`].
///
/// Every failure class is its own variant so callers can decide whether to
/// retry, re-authenticate, abort or report. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid client settings, raised at construction
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A caller-supplied argument was rejected before any I/O
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// The server answered 401 or 403
    #[error("Authentication failed (HTTP {status}). Your API key or user token is invalid or expired.")]
    Authentication { status: StatusCode },

    /// Any other non-success status
    #[error("HTTP error {status} requesting {url}")]
    Http { url: String, status: StatusCode },

    #[error("failed to parse the response from the server: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// DNS failure, refused connection, timeout or a broken stream
    #[error("network error connecting to {url}: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> ApiError {
        ApiError::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    pub fn connectivity(url: impl Into<String>, source: reqwest::Error) -> ApiError {
        ApiError::Connectivity {
            url: url.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> ApiError {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication { .. })
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Authentication { status } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            ApiError::Configuration(_) => ExitCode::ConfigError,
            ApiError::InvalidArgument { .. } => ExitCode::UsageError,
            ApiError::Authentication { .. } => ExitCode::AuthError,
            ApiError::Http { .. } => ExitCode::ApiError,
            ApiError::Parse { .. } => ExitCode::DataError,
            ApiError::Connectivity { .. } => ExitCode::NetworkError,
            ApiError::Cancelled => ExitCode::Cancelled,
            ApiError::Io { .. } => ExitCode::OSError,
        }
    }
}

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Error when an unsupported or undefined subcommand is encountered
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    /// Error when a required command-line argument is missing
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// Error when no asset in the listing has the requested id
    #[error("Asset {id} not found among the assets with Revit families")]
    AssetNotFound { id: i64 },
    #[error("Asset '{type_id}' has no Revit family file")]
    NoRevitFamily { type_id: String },
    #[error("Interactive prompt failed: {0}")]
    PromptError(#[from] inquire::InquireError),
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => ExitCode::UsageError,
            CliError::ConfigurationError(_) => ExitCode::ConfigError,
            CliError::FormattingError(_) => ExitCode::DataError,
            CliError::MissingRequiredArgument(_) => ExitCode::UsageError,
            CliError::ApiError(e) => e.exit_code(),
            CliError::AssetNotFound { .. } => ExitCode::NotFound,
            CliError::NoRevitFamily { .. } => ExitCode::NotFound,
            CliError::PromptError(inquire::InquireError::OperationCanceled)
            | CliError::PromptError(inquire::InquireError::OperationInterrupted) => {
                ExitCode::Cancelled
            }
            CliError::PromptError(_) => ExitCode::SoftwareError,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.exit_code() == ExitCode::Cancelled
    }
}
