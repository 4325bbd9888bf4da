use pbi_client::prelude::*;
use pbi_client::utils::retry::RetryConfig;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/v1.0/myorg";

fn bulk_for(server: &MockServer) -> BulkService<PowerBiClient> {
    let client = PowerBiClient::new(
        format!("{}{}", server.uri(), API),
        Arc::new(StaticTokenAuth::new("test-token")),
    )
    .unwrap()
    .with_retry(RetryConfig::none());

    BulkService::new(client)
}

async fn mount_listing(server: &MockServer, rest: &str, status: u16, rows: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", API, rest)))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "value": rows })))
        .mount(server)
        .await;
}

async fn mount_workspaces(server: &MockServer) {
    mount_listing(
        server,
        "/groups",
        200,
        json!([
            {"id": "W1", "name": "Finance"},
            {"id": "W2", "name": "Broken"},
            {"id": "W3", "name": "Marketing"}
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_all_datasets_skip_failed_workspace() {
    let server = MockServer::start().await;
    mount_workspaces(&server).await;
    mount_listing(
        &server,
        "/groups/W1/datasets",
        200,
        json!([{"id": "D1", "name": "Sales"}, {"id": "D2", "name": "Budget"}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/groups/W2/datasets", API)))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    mount_listing(&server, "/groups/W3/datasets", 200, json!([{"id": "D3", "name": "Leads"}])).await;

    let bulk = bulk_for(&server);
    let workspaces = bulk.get_all_workspaces().await.unwrap();
    let fan_out = bulk.fan_out(&workspaces, ChildKind::Datasets).await;

    assert_eq!(
        fan_out.table.column_values("id"),
        vec![json!("D1"), json!("D2"), json!("D3")]
    );
    assert_eq!(
        fan_out.table.column_values("workspaceName"),
        vec![json!("Finance"), json!("Finance"), json!("Marketing")]
    );
    assert_eq!(fan_out.failures.len(), 1);
    assert_eq!(fan_out.failures[0].parent.id, "W2");
    assert!(matches!(fan_out.failures[0].error, ApiError::Payload { .. }));
}

#[tokio::test]
async fn test_dataset_users_end_to_end() {
    let server = MockServer::start().await;
    mount_listing(&server, "/groups", 200, json!([{"id": "W1", "name": "Finance"}])).await;
    mount_listing(
        &server,
        "/groups/W1/datasets",
        200,
        json!([
            {"id": "D1", "name": "Sales", "isRefreshable": true},
            {"id": "D2", "name": "Usage Metrics Report", "isRefreshable": false}
        ]),
    )
    .await;
    mount_listing(
        &server,
        "/groups/W1/datasets/D1/users",
        200,
        json!([
            {"identifier": "ana@contoso.com", "datasetUserAccessRight": "ReadWrite"},
            {"identifier": "bo@contoso.com", "datasetUserAccessRight": "Read"}
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/groups/W1/datasets/D2/users", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let users = bulk_for(&server).get_all_dataset_users().await.unwrap();

    assert_eq!(users.len(), 2);
    for row in &users {
        assert_eq!(row.get("datasetId"), Some(&json!("D1")));
        assert_eq!(row.get("datasetName"), Some(&json!("Sales")));
        assert_eq!(row.get("workspaceId"), Some(&json!("W1")));
        assert_eq!(row.get("workspaceName"), Some(&json!("Finance")));
    }
}

#[tokio::test]
async fn test_refresh_history_end_to_end() {
    let server = MockServer::start().await;
    mount_listing(&server, "/groups", 200, json!([{"id": "W1", "name": "Finance"}])).await;
    mount_listing(
        &server,
        "/groups/W1/datasets",
        200,
        json!([
            {"id": "D1", "name": "Sales", "isRefreshable": true},
            {"id": "D2", "name": "Static", "isRefreshable": false}
        ]),
    )
    .await;
    mount_listing(
        &server,
        "/groups/W1/datasets/D1/refreshes",
        200,
        json!([{"requestId": "r1", "status": "Completed"}, {"requestId": "r2", "status": "Failed"}]),
    )
    .await;

    let history = bulk_for(&server)
        .get_all_dataset_refresh_history()
        .await
        .unwrap();

    assert_eq!(history.column_values("requestId"), vec![json!("r1"), json!("r2")]);
    assert_eq!(history.get(0, "datasetName"), Some(&json!("Sales")));
}

#[tokio::test]
async fn test_workspace_listing_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/groups", API)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "unexpected"})))
        .mount(&server)
        .await;

    let result = bulk_for(&server).get_all_reports().await;

    assert!(matches!(result, Err(AppError::Api(ApiError::Payload { .. }))));
}

#[tokio::test]
async fn test_workspace_listing_denied_gives_empty_result() {
    let server = MockServer::start().await;
    mount_listing(&server, "/groups", 401, json!([])).await;

    let reports = bulk_for(&server).get_all_report_sources().await.unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn test_concurrent_bulk_matches_sequential() {
    let server = MockServer::start().await;
    mount_workspaces(&server).await;
    for (workspace, report) in [("W1", "R1"), ("W2", "R2"), ("W3", "R3")] {
        mount_listing(
            &server,
            &format!("/groups/{}/reports", workspace),
            200,
            json!([{"id": report, "name": format!("Report {}", report)}]),
        )
        .await;
        mount_listing(
            &server,
            &format!("/groups/{}/reports/{}/datasources", workspace, report),
            200,
            json!([{"datasourceType": "Sql", "connectionDetails": {"server": format!("{}-sql", report)}}]),
        )
        .await;
    }

    let sequential = bulk_for(&server).get_all_report_sources().await.unwrap();
    let concurrent = bulk_for(&server)
        .with_concurrency(3)
        .get_all_report_sources()
        .await
        .unwrap();

    assert_eq!(sequential.len(), 3);
    assert_eq!(sequential, concurrent);
    assert_eq!(
        concurrent.column_values("reportId"),
        vec![json!("R1"), json!("R2"), json!("R3")]
    );
    assert_eq!(concurrent.get(2, "server"), Some(&json!("R3-sql")));
}
