use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Service unavailable: {0}")]
    #[diagnostic(code(picsync::service_unavailable))]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    #[diagnostic(code(picsync::upstream))]
    Upstream(String),

    #[error("No text found in image")]
    #[diagnostic(
        code(picsync::no_text_found),
        help("Try a sharper screenshot or crop it to the event details")
    )]
    NoTextFound,

    #[error("Malformed input: {0}")]
    #[diagnostic(code(picsync::malformed_input))]
    MalformedInput(String),

    #[error("Unrecognised date or time: {0}")]
    #[diagnostic(code(picsync::date_time_format))]
    DateTimeFormat(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(picsync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(picsync::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(picsync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(picsync::serialization))]
    Serialization(String),
}

impl Error {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ServiceUnavailable(_) => "service_unavailable",
            Error::Upstream(_) => "upstream_error",
            Error::NoTextFound => "no_text_found",
            Error::MalformedInput(_) => "malformed_input",
            Error::DateTimeFormat(_) => "date_time_format",
            Error::Environment(_) => "environment",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }

    /// Whether the caller sent something we cannot work with
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NoTextFound | Error::MalformedInput(_))
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Upstream(format!("request timed out: {}", err))
        } else {
            Error::Upstream(err.to_string())
        }
    }
}

/// Type alias for Result with our Error type
pub type PicSyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid value for environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create upstream service errors
pub fn upstream_error(message: &str) -> Error {
    Error::Upstream(message.to_string())
}

/// Helper to create malformed input errors
pub fn malformed_input(message: &str) -> Error {
    Error::MalformedInput(message.to_string())
}

/// Helper to create date/time format errors
pub fn date_time_error(message: &str) -> Error {
    Error::DateTimeFormat(message.to_string())
}
