use crate::api::client::PowerBiClient;
use crate::core::services::types::ChildKind;
use crate::core::table::Table;
use crate::error::ApiError;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the per-parent point queries a fan-out needs
///
/// Implemented by [`PowerBiClient`]; tests substitute an in-memory double.
#[async_trait]
pub trait PowerBiSource: Send + Sync {
    async fn list_workspaces(&self) -> Result<Table, ApiError>;

    async fn get_workspace(&self, workspace_id: &str) -> Result<Table, ApiError>;

    /// Fetch `child` for one parent
    ///
    /// `parent_id` equals `workspace_id` when the parent is a workspace.
    async fn fetch_children(
        &self,
        child: ChildKind,
        workspace_id: &str,
        parent_id: &str,
    ) -> Result<Table, ApiError>;
}

#[async_trait]
impl PowerBiSource for PowerBiClient {
    async fn list_workspaces(&self) -> Result<Table, ApiError> {
        PowerBiClient::list_workspaces(self).await
    }

    async fn get_workspace(&self, workspace_id: &str) -> Result<Table, ApiError> {
        PowerBiClient::get_workspace(self, workspace_id).await
    }

    async fn fetch_children(
        &self,
        child: ChildKind,
        workspace_id: &str,
        parent_id: &str,
    ) -> Result<Table, ApiError> {
        match child {
            ChildKind::Datasets => self.list_datasets(workspace_id).await,
            ChildKind::Dataflows => self.list_dataflows(workspace_id).await,
            ChildKind::Reports => self.list_reports(workspace_id).await,
            ChildKind::DatasetRefreshHistory => {
                self.get_dataset_refresh_history(workspace_id, parent_id, None)
                    .await
            }
            ChildKind::DatasetUsers => self.get_dataset_users(workspace_id, parent_id).await,
            ChildKind::DatasetSources => self.get_dataset_sources(workspace_id, parent_id).await,
            ChildKind::DatasetTables => self.get_dataset_tables(workspace_id, parent_id).await,
            ChildKind::DatasetColumns => self.get_dataset_columns(workspace_id, parent_id).await,
            ChildKind::DatasetMeasures => self.get_dataset_measures(workspace_id, parent_id).await,
            ChildKind::DatasetCalcDependencies => {
                self.get_dataset_calc_dependencies(workspace_id, parent_id)
                    .await
            }
            ChildKind::DataflowRefreshHistory => {
                self.get_dataflow_refresh_history(workspace_id, parent_id)
                    .await
            }
            ChildKind::DataflowSources => self.get_dataflow_sources(workspace_id, parent_id).await,
            ChildKind::ReportSources => self.get_report_sources(workspace_id, parent_id).await,
        }
    }
}

#[async_trait]
impl<T: PowerBiSource + ?Sized> PowerBiSource for Arc<T> {
    async fn list_workspaces(&self) -> Result<Table, ApiError> {
        (**self).list_workspaces().await
    }

    async fn get_workspace(&self, workspace_id: &str) -> Result<Table, ApiError> {
        (**self).get_workspace(workspace_id).await
    }

    async fn fetch_children(
        &self,
        child: ChildKind,
        workspace_id: &str,
        parent_id: &str,
    ) -> Result<Table, ApiError> {
        (**self).fetch_children(child, workspace_id, parent_id).await
    }
}
