use serde::{Deserialize, Serialize};
use serde_json::Value;

// Authentication models
#[derive(Debug, Deserialize, Clone)]
pub struct TokenResponse {
    pub token_type: Option<String>,
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// Response envelopes

/// `{ "value": [...] }` wrapper used by every listing endpoint
#[derive(Debug, Deserialize)]
pub struct ValueEnvelope {
    pub value: Vec<Value>,
}

/// Response of `executeQueries`
#[derive(Debug, Deserialize)]
pub struct QueryEnvelope {
    pub results: Vec<QueryResultSet>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResultSet {
    #[serde(default)]
    pub tables: Vec<QueryTable>,
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct QueryTable {
    pub rows: Vec<Value>,
}

// Request bodies

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteQueriesRequest {
    pub queries: Vec<DaxQuery>,
    pub serializer_settings: SerializerSettings,
}

impl ExecuteQueriesRequest {
    pub fn single(query: &str) -> Self {
        Self {
            queries: vec![DaxQuery {
                query: query.to_string(),
            }],
            serializer_settings: SerializerSettings {
                include_nulls: true,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DaxQuery {
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializerSettings {
    pub include_nulls: bool,
}

/// Enhanced refresh body restricted to selected objects
#[derive(Debug, Serialize, Default)]
pub struct RefreshRequest {
    pub objects: Vec<RefreshObject>,
}

impl RefreshRequest {
    pub fn tables<S: AsRef<str>>(tables: &[S]) -> Self {
        Self {
            objects: tables
                .iter()
                .map(|t| RefreshObject {
                    table: t.as_ref().to_string(),
                    partition: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RefreshObject {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParametersRequest {
    pub update_details: Vec<ParameterUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpdate {
    pub name: String,
    pub new_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindToGatewayRequest {
    pub gateway_object_id: String,
    pub datasource_object_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsUpdateRequest {
    pub credential_details: Value,
}
