//! Dataset endpoints: metadata, refresh history, sources, users, schema
//! introspection through DAX, and the refresh/parameter actions.

use crate::api::client::{PowerBiClient, query_table};
use crate::api::models::{
    ExecuteQueriesRequest, ParameterUpdate, RefreshObject, RefreshRequest, UpdateParametersRequest,
};
use crate::core::table::Table;
use crate::error::ApiError;
use crate::map_json_error;
use crate::utils::data::flatten_connection_details;
use reqwest::{Method, StatusCode};

pub const TABLES_QUERY: &str = "EVALUATE INFO.VIEW.TABLES()";
pub const COLUMNS_QUERY: &str = "EVALUATE INFO.VIEW.COLUMNS()";
pub const MEASURES_QUERY: &str = "EVALUATE INFO.VIEW.MEASURES()";
pub const CALC_DEPENDENCY_QUERY: &str = "EVALUATE INFO.CALCDEPENDENCY()";

impl PowerBiClient {
    pub async fn get_dataset(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id])?;
        self.fetch_object(&path).await
    }

    /// Most recent refreshes, newest first; `top` defaults to the configured value
    pub async fn get_dataset_refresh_history(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        top: Option<u32>,
    ) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "refreshes"])?;
        let top = top.unwrap_or(self.refresh_history_top());
        self.fetch_listing(&format!("{}?$top={}", path, top)).await
    }

    pub async fn get_dataset_sources(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "datasources"])?;
        self.fetch_listing(&path).await.map(flatten_connection_details)
    }

    pub async fn get_dataset_users(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "users"])?;
        self.fetch_listing(&path).await
    }

    pub async fn get_dataset_tables(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        self.fetch_query(workspace_id, dataset_id, TABLES_QUERY).await
    }

    pub async fn get_dataset_columns(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        self.fetch_query(workspace_id, dataset_id, COLUMNS_QUERY).await
    }

    pub async fn get_dataset_measures(&self, workspace_id: &str, dataset_id: &str) -> Result<Table, ApiError> {
        self.fetch_query(workspace_id, dataset_id, MEASURES_QUERY).await
    }

    pub async fn get_dataset_calc_dependencies(
        &self,
        workspace_id: &str,
        dataset_id: &str,
    ) -> Result<Table, ApiError> {
        self.fetch_query(workspace_id, dataset_id, CALC_DEPENDENCY_QUERY).await
    }

    /// Run an arbitrary DAX statement
    ///
    /// Unlike the introspection fetchers, a non-success status is an error
    /// here so callers can see why their query was rejected.
    pub async fn execute_query(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        query: &str,
    ) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "executeQueries"])?;
        let body = ExecuteQueriesRequest::single(query);

        let raw = self
            .send_action(Method::POST, &path, Some(&body), &[StatusCode::OK])
            .await?;
        let json = map_json_error!(serde_json::from_str(&raw.body), &path)?;
        query_table(json, &path)
    }

    /// Trigger a dataset refresh, optionally restricted by `body`
    pub async fn refresh_dataset(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        body: Option<&RefreshRequest>,
    ) -> Result<(), ApiError> {
        let path = self.group_path(workspace_id, &["datasets", dataset_id, "refreshes"])?;

        self.send_action(Method::POST, &path, body, &[StatusCode::ACCEPTED])
            .await?;

        log::info!("Dataset {} refresh triggered successfully", dataset_id);
        Ok(())
    }

    pub async fn refresh_tables_from_dataset<S: AsRef<str>>(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        tables: &[S],
    ) -> Result<(), ApiError> {
        let body = RefreshRequest::tables(tables);
        self.refresh_dataset(workspace_id, dataset_id, Some(&body)).await
    }

    /// Refresh selected tables or partitions
    pub async fn refresh_objects_from_dataset(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        objects: Vec<RefreshObject>,
    ) -> Result<(), ApiError> {
        let body = RefreshRequest { objects };
        self.refresh_dataset(workspace_id, dataset_id, Some(&body)).await
    }

    /// Set new values for dataset parameters, given as `(name, value)` pairs
    pub async fn update_dataset_parameters<K, V>(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        parameters: &[(K, V)],
    ) -> Result<(), ApiError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = self.group_path(
            workspace_id,
            &["datasets", dataset_id, "Default.UpdateParameters"],
        )?;
        let body = UpdateParametersRequest {
            update_details: parameters
                .iter()
                .map(|(name, value)| ParameterUpdate {
                    name: name.as_ref().to_string(),
                    new_value: value.as_ref().to_string(),
                })
                .collect(),
        };

        self.send_action(Method::POST, &path, Some(&body), &[]).await?;
        log::info!(
            "Updated {} parameter(s) on dataset {}",
            parameters.len(),
            dataset_id
        );
        Ok(())
    }
}
