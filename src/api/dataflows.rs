use crate::api::client::PowerBiClient;
use crate::core::table::Table;
use crate::error::ApiError;
use crate::utils::data::flatten_connection_details;
use reqwest::{Method, StatusCode};

impl PowerBiClient {
    pub async fn get_dataflow(&self, workspace_id: &str, dataflow_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["dataflows", dataflow_id])?;
        self.fetch_object(&path).await
    }

    /// Refresh transactions of a dataflow
    pub async fn get_dataflow_refresh_history(
        &self,
        workspace_id: &str,
        dataflow_id: &str,
    ) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["dataflows", dataflow_id, "transactions"])?;
        self.fetch_listing(&path).await
    }

    pub async fn get_dataflow_sources(&self, workspace_id: &str, dataflow_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["dataflows", dataflow_id, "datasources"])?;
        self.fetch_listing(&path).await.map(flatten_connection_details)
    }

    pub async fn refresh_dataflow(&self, workspace_id: &str, dataflow_id: &str) -> Result<(), ApiError> {
        let path = self.group_path(workspace_id, &["dataflows", dataflow_id, "refreshes"])?;

        self.send_action::<()>(Method::POST, &path, None, &[StatusCode::OK])
            .await?;

        log::info!("Dataflow {} refresh triggered successfully", dataflow_id);
        Ok(())
    }
}
