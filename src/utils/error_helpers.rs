use crate::error::{ApiError, AuthError};

/// Helper functions for standardizing error conversions across the codebase
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, timeout_secs);
    }

    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
        None => ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    ApiError::payload(endpoint, format!("JSON parse error: {}", error))
}

/// Convert errors raised while talking to the token endpoint
pub fn convert_token_error(error: reqwest::Error) -> AuthError {
    AuthError::Transport(error.to_string())
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr, $timeout_secs:expr) => {
        $result.map_err(|e| {
            $crate::utils::error_helpers::convert_request_error(e, $endpoint, $timeout_secs)
        })
    };
}

/// Helper macro for JSON parsing errors
#[macro_export]
macro_rules! map_json_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_json_error(e, $endpoint))
    };
}
