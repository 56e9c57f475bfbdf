use thiserror::Error;

/// Message used when the server reports failure without an `error` field.
pub const API_FAILURE_FALLBACK: &str = "API request failed";

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Moltbook API error: {0}")]
    MoltbookApi(#[from] MoltbookApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl CoreError {
    /// The API failure behind this error, if it came from a request.
    pub fn api_error(&self) -> Option<&MoltbookApiError> {
        match self {
            CoreError::MoltbookApi(e) => Some(e),
            _ => None,
        }
    }
}

/// Which stage of a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Api,
}

#[derive(Error, Debug)]
pub enum MoltbookApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid JSON response from {endpoint}: {details}")]
    Decode { endpoint: String, details: String },

    #[error("{message}")]
    Api { message: String },
}

impl MoltbookApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoltbookApiError::Transport(_) => ErrorKind::Transport,
            MoltbookApiError::Decode { .. } => ErrorKind::Decode,
            MoltbookApiError::Api { .. } => ErrorKind::Api,
        }
    }

    /// HTTP status of a non-2xx response; `None` for every other failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MoltbookApiError::Transport(transport) => transport.status_code(),
            _ => None,
        }
    }

    /// Builds an application-level failure from the server's optional message.
    pub fn api(message: Option<&str>) -> Self {
        MoltbookApiError::Api {
            message: message.unwrap_or(API_FAILURE_FALLBACK).to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("HTTP {status_code} from {endpoint}")]
    Status { endpoint: String, status_code: u16 },

    #[error("network error for {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn endpoint(&self) -> &str {
        match self {
            TransportError::Timeout { endpoint }
            | TransportError::Status { endpoint, .. }
            | TransportError::Network { endpoint, .. } => endpoint,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
