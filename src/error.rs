use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("AuthError: {0}")]
    Auth(#[from] AuthError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("UtilsError: {0}")]
    Utils(#[from] UtilsError),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
    #[error("Unexpected payload from {endpoint}: {message}")]
    Payload { endpoint: String, message: String },
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("Could not authorize request: {0}")]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Build a payload error for `endpoint`
    pub fn payload(endpoint: &str, message: impl Into<String>) -> Self {
        ApiError::Payload {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. }
            | ApiError::Transport { endpoint, .. }
            | ApiError::Payload { endpoint, .. } => Some(endpoint),
            ApiError::Auth(_) | ApiError::InvalidRequest { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed with status {status}: {message}")]
    TokenRequest { status: u16, message: String },
    #[error("Token response did not contain an access token")]
    MalformedToken,
    #[error("Token endpoint unreachable: {0}")]
    Transport(String),
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, field_type: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } | ApiError::Auth(_) => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Transport { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Auth(AuthError::InvalidCredentials(_)) => ErrorSeverity::Critical,
            AppError::Auth(_) => ErrorSeverity::High,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Utils(_) => ErrorSeverity::Low,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Auth(AuthError::TokenRequest { .. })
            | AppError::Api(ApiError::Auth(AuthError::TokenRequest { .. })) => Some(
                "Check PBI_TENANT_ID, PBI_CLIENT_ID and PBI_CLIENT_SECRET for the service principal"
                    .to_string(),
            ),
            AppError::Api(ApiError::Unauthorized { .. }) => Some(
                "The service principal needs access to the workspace and the tenant setting \
                 that allows service principals to use Power BI APIs"
                    .to_string(),
            ),
            AppError::Api(ApiError::Timeout { .. } | ApiError::Transport { .. }) => {
                Some("Check your network connection to api.powerbi.com and try again".to_string())
            }
            AppError::Config(ConfigError::MissingField { field, .. }) => {
                Some(format!("Set '{}' in config.toml or via environment", field))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::Unauthorized {
            status: 401,
            endpoint: "endpoint".to_string(),
            server_message: "message".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Authentication failed");

        let api_err = ApiError::Http {
            status: 400,
            endpoint: "endpoint".to_string(),
            message: "message".to_string(),
        };
        assert_eq!(format!("{}", api_err), "HTTP error: 400 message");

        let api_err = ApiError::payload("/groups", "missing 'value'");
        assert_eq!(
            format!("{}", api_err),
            "Unexpected payload from /groups: missing 'value'"
        );
    }

    #[test]
    fn test_api_error_endpoint() {
        let api_err = ApiError::Transport {
            endpoint: "/groups/w1/datasets".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(api_err.endpoint(), Some("/groups/w1/datasets"));
        assert_eq!(ApiError::Auth(AuthError::MalformedToken).endpoint(), None);
    }

    #[test]
    fn test_app_error_from_conversions() {
        let app_err: AppError = ApiError::Timeout {
            timeout_secs: 10,
            endpoint: "endpoint".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Api(ApiError::Timeout { .. })));

        let app_err: AppError = AuthError::MalformedToken.into();
        assert_eq!(
            format!("{}", app_err),
            "AuthError: Token response did not contain an access token"
        );
    }

    #[test]
    fn test_severity() {
        let app_err = AppError::Api(ApiError::Http {
            status: 503,
            endpoint: "endpoint".to_string(),
            message: "unavailable".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Api(ApiError::Http {
            status: 404,
            endpoint: "endpoint".to_string(),
            message: "missing".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::Medium);

        let app_err = AppError::Auth(AuthError::InvalidCredentials("empty".to_string()));
        assert_eq!(app_err.severity(), ErrorSeverity::Critical);

        let app_err = AppError::Utils(UtilsError::Validation {
            message: "Invalid input".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_troubleshooting_hint() {
        let app_err = AppError::Auth(AuthError::TokenRequest {
            status: 401,
            message: "invalid_client".to_string(),
        });
        assert!(
            app_err
                .troubleshooting_hint()
                .is_some_and(|hint| hint.contains("PBI_CLIENT_SECRET"))
        );

        let app_err = AppError::Config(ConfigError::MissingField {
            field: "tenant_id".to_string(),
            field_type: "string".to_string(),
        });
        assert!(
            app_err
                .troubleshooting_hint()
                .is_some_and(|hint| hint.contains("tenant_id"))
        );

        let app_err = AppError::Utils(UtilsError::Validation {
            message: "bad id".to_string(),
        });
        assert!(app_err.troubleshooting_hint().is_none());
    }
}
