use moltbook_core::{
    ConfigError, CoreError, ErrorExt, ErrorKind, ErrorReporter, MoltbookApiError, TransportError,
    API_FAILURE_FALLBACK,
};

#[test]
fn test_error_kinds() {
    let transport = MoltbookApiError::Transport(TransportError::Status {
        endpoint: "posts/1".to_string(),
        status_code: 502,
    });
    assert_eq!(transport.kind(), ErrorKind::Transport);

    let decode = MoltbookApiError::Decode {
        endpoint: "posts/1".to_string(),
        details: "expected value at line 1 column 1".to_string(),
    };
    assert_eq!(decode.kind(), ErrorKind::Decode);

    let api = MoltbookApiError::api(Some("not found"));
    assert_eq!(api.kind(), ErrorKind::Api);
}

#[test]
fn test_api_error_message() {
    assert_eq!(MoltbookApiError::api(Some("not found")).to_string(), "not found");
    assert_eq!(MoltbookApiError::api(None).to_string(), API_FAILURE_FALLBACK);
}

#[test]
fn test_error_codes() {
    let api_error = CoreError::MoltbookApi(MoltbookApiError::api(None));
    assert_eq!(api_error.error_code(), "API");

    let timeout = CoreError::MoltbookApi(
        TransportError::Timeout {
            endpoint: "molts".to_string(),
        }
        .into(),
    );
    assert_eq!(timeout.error_code(), "TRANSPORT");

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "timeout".to_string(),
        value: "0s".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");
}

#[test]
fn test_retryable_errors() {
    let server_error = CoreError::MoltbookApi(
        TransportError::Status {
            endpoint: "agents/profile".to_string(),
            status_code: 503,
        }
        .into(),
    );
    assert!(server_error.is_retryable());

    let not_found = CoreError::MoltbookApi(
        TransportError::Status {
            endpoint: "agents/profile".to_string(),
            status_code: 404,
        }
        .into(),
    );
    assert!(!not_found.is_retryable());

    let rate_limited = MoltbookApiError::Transport(TransportError::Status {
        endpoint: "molts".to_string(),
        status_code: 429,
    });
    assert!(rate_limited.is_retryable());

    let unreachable = CoreError::MoltbookApi(
        TransportError::Timeout {
            endpoint: "molts".to_string(),
        }
        .into(),
    );
    assert!(unreachable.is_retryable());

    let api_error = CoreError::MoltbookApi(MoltbookApiError::api(Some("Agent not found")));
    assert!(!api_error.is_retryable());
}

#[test]
fn test_transport_accessors() {
    let status = TransportError::Status {
        endpoint: "posts/p1".to_string(),
        status_code: 404,
    };
    assert_eq!(status.endpoint(), "posts/p1");
    assert_eq!(status.status_code(), Some(404));

    let timeout = TransportError::Timeout {
        endpoint: "molts".to_string(),
    };
    assert_eq!(timeout.endpoint(), "molts");
    assert_eq!(timeout.status_code(), None);

    let api_error = MoltbookApiError::Transport(status);
    assert_eq!(api_error.status_code(), Some(404));
    assert_eq!(MoltbookApiError::api(None).status_code(), None);
}

#[test]
fn test_user_friendly_messages() {
    let api_error = CoreError::MoltbookApi(MoltbookApiError::api(Some("Agent not found")));
    let message = api_error.user_friendly_message();
    assert!(message.contains("Agent not found"));

    let not_found = CoreError::MoltbookApi(
        TransportError::Status {
            endpoint: "posts/p1".to_string(),
            status_code: 404,
        }
        .into(),
    );
    assert!(not_found.user_friendly_message().contains("does not exist"));

    let teapot = MoltbookApiError::Transport(TransportError::Status {
        endpoint: "posts/p1".to_string(),
        status_code: 418,
    });
    assert!(teapot.user_friendly_message().contains("HTTP 418"));

    let io_error = CoreError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "denied",
    ));
    assert_eq!(io_error.error_code(), "IO");
    assert!(io_error.user_friendly_message().contains("denied"));

    let config_error = CoreError::Config(ConfigError::FileNotFound {
        path: "/tmp/moltbook.toml".to_string(),
    });
    assert!(config_error
        .user_friendly_message()
        .contains("/tmp/moltbook.toml"));
}

#[test]
fn test_api_error_accessor() {
    let error: CoreError = MoltbookApiError::api(Some("gone")).into();
    assert_eq!(error.api_error().map(|e| e.kind()), Some(ErrorKind::Api));

    let error = CoreError::InvalidInput {
        message: "empty username".to_string(),
    };
    assert!(error.api_error().is_none());
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::MoltbookApi(MoltbookApiError::api(None));

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
    assert!(reporter.reports_errors());

    let quiet = ErrorReporter::new().with_error_reporting(false);
    assert!(!quiet.reports_errors());
    quiet.report_error(&error);
}
