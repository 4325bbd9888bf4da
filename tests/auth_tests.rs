use pbi_client::core::auth::{AuthProvider, ClientCredentialsAuth};
use pbi_client::error::AuthError;
use pbi_client::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/contoso/oauth2/v2.0/token";

fn config_for(server: &MockServer, token_cache: bool) -> Config {
    Config {
        authority_url: Some(server.uri()),
        token_cache: Some(token_cache),
        ..Config::default()
    }
}

fn credentials() -> Credentials {
    Credentials::new("contoso", "app-id", "app-secret").unwrap()
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-id"))
        .and(body_string_contains("client_secret=app-secret"))
        .and(body_string_contains("powerbi%2Fapi%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "token-1"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cached_token_is_reused() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let auth = ClientCredentialsAuth::new(credentials(), &config_for(&server, true)).unwrap();

    let first = auth.auth_header().await.unwrap();
    let second = auth.auth_header().await.unwrap();

    assert_eq!(first.authorization, "Bearer token-1");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_disabled_cache_requests_every_time() {
    let server = MockServer::start().await;
    mount_token(&server, 2).await;

    let auth = ClientCredentialsAuth::new(credentials(), &config_for(&server, false)).unwrap();

    auth.auth_header().await.unwrap();
    auth.auth_header().await.unwrap();
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let auth = ClientCredentialsAuth::new(credentials(), &config_for(&server, true)).unwrap();

    match auth.auth_header().await {
        Err(AuthError::TokenRequest { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid_client");
        }
        other => panic!("Expected TokenRequest error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_response_without_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&server)
        .await;

    let auth = ClientCredentialsAuth::new(credentials(), &config_for(&server, true)).unwrap();

    assert!(matches!(
        auth.auth_header().await,
        Err(AuthError::MalformedToken)
    ));
}

#[tokio::test]
async fn test_client_uses_acquired_token() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/myorg/groups"))
        .and(wiremock::matchers::header("authorization", "Bearer token-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": [{"id": "W1", "name": "One"}]})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: Some(format!("{}/v1.0/myorg", server.uri())),
        ..config_for(&server, true)
    };
    let client = PowerBiClient::with_credentials(credentials(), &config).unwrap();

    assert_eq!(client.list_workspaces().await.unwrap().len(), 1);
    assert_eq!(client.list_workspaces().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_auth_failure_surfaces_from_point_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("AADSTS90002"))
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: Some(format!("{}/v1.0/myorg", server.uri())),
        ..config_for(&server, true)
    };
    let client = PowerBiClient::with_credentials(credentials(), &config).unwrap();

    let result = client.list_workspaces().await;
    assert!(matches!(
        result,
        Err(ApiError::Auth(AuthError::TokenRequest { status: 400, .. }))
    ));
}
