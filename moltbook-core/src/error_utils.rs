use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    /// Whether repeating the same request could succeed. Advisory only; the
    /// client itself never retries.
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::MoltbookApi(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::MoltbookApi(e) => e.is_retryable(),
            CoreError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::MoltbookApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Could not set up the HTTP client. Please check your TLS and proxy settings."
                    .to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Io(e) => format!("File system error: {}", e),
            CoreError::Serialization(_) => "Could not serialize the result.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::MoltbookApi(e) => e.error_code(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for MoltbookApiError {
    fn log_error(&self) -> &Self {
        error!("MoltbookApiError: {}", self);
        if let MoltbookApiError::Transport(transport) = self {
            error!(
                endpoint = transport.endpoint(),
                status = ?transport.status_code(),
                "transport failure"
            );
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("MoltbookApiError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            MoltbookApiError::Transport(transport) => match transport.status_code() {
                Some(status_code) => status_code == 429 || status_code >= 500,
                None => true,
            },
            MoltbookApiError::Decode { .. } => false,
            MoltbookApiError::Api { .. } => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            MoltbookApiError::Transport(TransportError::Timeout { .. }) => {
                "Moltbook did not answer in time. Please try again.".to_string()
            }
            MoltbookApiError::Transport(TransportError::Status { .. }) => {
                match self.status_code().unwrap_or_default() {
                    404 => "The requested resource does not exist on Moltbook.".to_string(),
                    429 => "Moltbook is rate limiting requests. Please wait a moment.".to_string(),
                    s if s >= 500 => {
                        "Moltbook is having trouble right now. Please try again later.".to_string()
                    }
                    s => format!("Moltbook rejected the request (HTTP {}).", s),
                }
            }
            MoltbookApiError::Transport(TransportError::Network { .. }) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            MoltbookApiError::Decode { .. } => {
                "Moltbook returned a response that could not be read.".to_string()
            }
            MoltbookApiError::Api { message } => format!("Moltbook reported: {}", message),
        }
    }

    fn error_code(&self) -> String {
        match self.kind() {
            ErrorKind::Transport => "TRANSPORT".to_string(),
            ErrorKind::Decode => "DECODE".to_string(),
            ErrorKind::Api => "API".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file not found: {}", path)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("Invalid value '{}' for setting '{}'.", value, field)
            }
            ConfigError::Parse(_) => {
                "The configuration file is not valid TOML.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn reports_errors(&self) -> bool {
        self.report_errors
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
            if error.is_retryable() {
                info!("Error looks transient; repeating the command may succeed");
            }
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
