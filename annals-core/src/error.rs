//! Error types with clear, actionable messages
//!
//! Two tiers: [`ConfigError`] is raised while building a [`Chronicler`] and
//! means no request was ever attempted; [`FetchError`] covers everything that
//! can go wrong once a request is under way.
//!
//! [`Chronicler`]: crate::chronicle::Chronicler

use std::path::PathBuf;
use thiserror::Error;

/// Message shown to readers whenever a narrative could not be retrieved
pub const FETCH_FAILED_MESSAGE: &str = "无法获取历史档案。请重试。";

/// Configuration errors - detected at construction, before any network call
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The environment variable holding the provider key is unset or blank
    #[error("Annals requires the {env} environment variable to be set.\n\nExport your Gemini API key, for example:\n  export {env}=<your-key>")]
    MissingApiKey { env: String },

    /// The configured provider endpoint is not a usable URL
    #[error("Invalid provider base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The configured model identifier is blank
    #[error("Provider model identifier must not be empty")]
    EmptyModel,

    /// The model identifier cannot be placed in the request path
    #[error("Invalid provider model '{model}': only ASCII letters, digits, '.', '-' and '_' are allowed")]
    InvalidModel { model: String },

    /// A config.json exists but could not be read
    #[error("Failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config.json exists but is not valid configuration
    #[error("Invalid config file {path}")]
    InvalidConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },
}

/// Fetch failures - any problem during the outbound call or with its payload
///
/// Callers that only care about "did it work" can treat every variant the same
/// way and show [`FetchError::user_message`].
#[derive(Error, Debug)]
pub enum FetchError {
    /// The era name or localized name was empty
    #[error("Invalid detail request: {0}")]
    InvalidRequest(String),

    /// The request never completed (DNS, TLS, connection reset, ...)
    #[error("Failed to send request to provider")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success HTTP status
    #[error("Provider API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// The provider answered but returned no text
    #[error("No text returned from model")]
    NoContent,

    /// The returned text is not the expected JSON structure
    #[error("Malformed response from model")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// The returned JSON is missing a required field or has it blank
    #[error("Incomplete response from model: field '{field}' is missing or empty")]
    Incomplete { field: String },
}

impl FetchError {
    /// The single reader-facing message for any fetch failure
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }

    /// True when the provider rejected our credentials
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, FetchError::Status { status: 401 | 403, .. })
    }
}
