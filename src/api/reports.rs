use crate::api::client::PowerBiClient;
use crate::core::table::Table;
use crate::error::ApiError;
use crate::utils::data::flatten_connection_details;

impl PowerBiClient {
    pub async fn get_report(&self, workspace_id: &str, report_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["reports", report_id])?;
        self.fetch_object(&path).await
    }

    pub async fn get_report_sources(&self, workspace_id: &str, report_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["reports", report_id, "datasources"])?;
        self.fetch_listing(&path).await.map(flatten_connection_details)
    }
}
