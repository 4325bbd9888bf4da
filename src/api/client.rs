use crate::api::models::{ExecuteQueriesRequest, QueryEnvelope, ValueEnvelope};
use crate::core::auth::{AuthProvider, ClientCredentialsAuth};
use crate::core::table::Table;
use crate::error::{ApiError, AppError};
use crate::map_api_error;
use crate::storage::config::{Config, DEFAULT_REFRESH_HISTORY_TOP, DEFAULT_TIMEOUT_SECS};
use crate::storage::credentials::Credentials;
use crate::utils::error_helpers::{convert_json_error, convert_request_error};
use crate::utils::retry::{RetryConfig, RetryExecutor};
use crate::utils::text::strip_column_brackets;
use crate::utils::validation::{validate_identifier, validate_url};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("pbi-client/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed request
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct PowerBiClient {
    client: Client,
    pub base_url: String,
    auth: Arc<dyn AuthProvider>,
    retry: RetryExecutor,
    timeout_secs: u64,
    refresh_history_top: u32,
}

impl fmt::Debug for PowerBiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBiClient")
            .field("base_url", &self.base_url)
            .field("retry", self.retry.config())
            .field("timeout_secs", &self.timeout_secs)
            .field("refresh_history_top", &self.refresh_history_top)
            .finish_non_exhaustive()
    }
}

impl PowerBiClient {
    // Create a client with default settings
    pub fn new(base_url: String, auth: Arc<dyn AuthProvider>) -> Result<Self, ApiError> {
        Self::build(
            base_url,
            auth,
            DEFAULT_TIMEOUT_SECS,
            RetryConfig::default(),
            DEFAULT_REFRESH_HISTORY_TOP,
        )
    }

    pub fn from_config(config: &Config, auth: Arc<dyn AuthProvider>) -> Result<Self, AppError> {
        config.validate()?;
        let base_url = config.get_api_base_url();
        validate_url(&base_url)?;

        Ok(Self::build(
            base_url,
            auth,
            config.get_timeout_secs(),
            RetryConfig::with_max_retries(config.get_max_retries()),
            config.get_refresh_history_top(),
        )?)
    }

    /// Client authenticating through the client-credentials flow
    pub fn with_credentials(credentials: Credentials, config: &Config) -> Result<Self, AppError> {
        let auth = ClientCredentialsAuth::new(credentials, config)?;
        Self::from_config(config, Arc::new(auth))
    }

    fn build(
        base_url: String,
        auth: Arc<dyn AuthProvider>,
        timeout_secs: u64,
        retry: RetryConfig,
        refresh_history_top: u32,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(PowerBiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            retry: RetryExecutor::new(retry),
            timeout_secs,
            refresh_history_top,
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(retry);
        self
    }

    pub fn refresh_history_top(&self) -> u32 {
        self.refresh_history_top
    }

    /// `/groups/{workspace_id}/...` with every identifier validated
    pub(crate) fn group_path(&self, workspace_id: &str, rest: &[&str]) -> Result<String, ApiError> {
        let mut path = String::from("/groups");
        for segment in std::iter::once(&workspace_id).chain(rest.iter()) {
            check_segment(segment)?;
            path.push('/');
            path.push_str(segment);
        }
        Ok(path)
    }

    /// Request for `path` relative to the API root, with auth headers
    pub async fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let header = self.auth.auth_header().await?;
        let url = format!("{}{}", self.base_url, path);

        Ok(self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, header.content_type)
            .header(reqwest::header::AUTHORIZATION, header.authorization))
    }

    /// Send with retry; 5xx and 429 count as failed attempts
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.retry
            .execute(|| {
                let method = method.clone();
                async move {
                    let mut request = self.build_request(method.clone(), path).await?;
                    if let Some(body) = body {
                        request = request.json(body);
                    }

                    log::debug!("{} {}", method, path);

                    let response = map_api_error!(request.send().await, path, self.timeout_secs)?;

                    let status = response.status();
                    let body = map_api_error!(response.text().await, path, self.timeout_secs)?;

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(ApiError::Http {
                            status: status.as_u16(),
                            endpoint: path.to_string(),
                            message: body,
                        });
                    }

                    Ok(RawResponse { status, body })
                }
            })
            .await
    }

    /// JSON body of a successful call, `None` for any non-success status
    pub(crate) async fn fetch_json<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let raw = match self.send(method, path, body).await {
            Ok(raw) => raw,
            Err(ApiError::Http { status, .. }) => {
                log::debug!("{} returned status {}, treating as empty", path, status);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !raw.status.is_success() {
            log::debug!("{} returned status {}, treating as empty", path, raw.status);
            return Ok(None);
        }

        serde_json::from_str(&raw.body)
            .map(Some)
            .map_err(|e| convert_json_error(e, path))
    }

    /// Listing endpoint: unwraps `{ "value": [...] }`
    pub async fn fetch_listing(&self, path: &str) -> Result<Table, ApiError> {
        match self.fetch_json::<()>(Method::GET, path, None).await? {
            Some(json) => listing_table(json, path),
            None => Ok(Table::new()),
        }
    }

    /// Object endpoint: one row per response
    pub async fn fetch_object(&self, path: &str) -> Result<Table, ApiError> {
        match self.fetch_json::<()>(Method::GET, path, None).await? {
            Some(Value::Object(record)) => Ok(Table::from_record(record)),
            Some(_) => Err(ApiError::payload(path, "expected a JSON object")),
            None => Ok(Table::new()),
        }
    }

    /// POST expecting a listing back
    pub(crate) async fn post_listing(&self, path: &str) -> Result<Table, ApiError> {
        match self.fetch_json::<()>(Method::POST, path, None).await? {
            Some(json) => listing_table(json, path),
            None => Ok(Table::new()),
        }
    }

    /// Run a DAX statement through `executeQueries`, empty on non-success
    pub(crate) async fn fetch_query(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        query: &str,
    ) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "executeQueries"])?;
        let body = ExecuteQueriesRequest::single(query);

        match self.fetch_json(Method::POST, &path, Some(&body)).await? {
            Some(json) => query_table(json, &path),
            None => Ok(Table::new()),
        }
    }

    /// Trigger-style call; fails unless the status is one of `expected`
    pub(crate) async fn send_action<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        expected: &[StatusCode],
    ) -> Result<RawResponse, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let raw = self.send(method, path, body).await?;

        if expected.contains(&raw.status) || (expected.is_empty() && raw.status.is_success()) {
            return Ok(raw);
        }

        match raw.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized {
                status: raw.status.as_u16(),
                endpoint: path.to_string(),
                server_message: raw.body,
            }),
            status => Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: path.to_string(),
                message: raw.body,
            }),
        }
    }
}

fn check_segment(segment: &str) -> Result<(), ApiError> {
    validate_identifier("Object", segment).map_err(|e| ApiError::InvalidRequest {
        message: e.to_string(),
    })
}

pub(crate) fn checked_segment(segment: &str) -> Result<&str, ApiError> {
    check_segment(segment).map(|_| segment)
}

/// Table from a `{ "value": [...] }` payload
pub fn listing_table(json: Value, endpoint: &str) -> Result<Table, ApiError> {
    let envelope: ValueEnvelope =
        serde_json::from_value(json).map_err(|e| convert_json_error(e, endpoint))?;

    Table::from_values(envelope.value)
        .map_err(|index| ApiError::payload(endpoint, format!("row {} is not an object", index)))
}

/// Table from an `executeQueries` payload, bracket decoration stripped
pub fn query_table(json: Value, endpoint: &str) -> Result<Table, ApiError> {
    let envelope: QueryEnvelope =
        serde_json::from_value(json).map_err(|e| convert_json_error(e, endpoint))?;

    let result = envelope
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::payload(endpoint, "no results in response"))?;

    if let Some(error) = result.error {
        return Err(ApiError::payload(endpoint, format!("query failed: {}", error)));
    }

    let rows = result
        .tables
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::payload(endpoint, "no tables in first result"))?
        .rows;

    let table = Table::from_values(rows)
        .map_err(|index| ApiError::payload(endpoint, format!("row {} is not an object", index)))?;

    Ok(table.rename_columns(strip_column_brackets))
}
