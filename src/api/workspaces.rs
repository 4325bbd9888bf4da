use crate::api::client::PowerBiClient;
use crate::core::table::{Table, cell_text};
use crate::error::ApiError;
use serde_json::Value;

impl PowerBiClient {
    /// Every workspace the principal can access, `id` normalised to a string
    pub async fn list_workspaces(&self) -> Result<Table, ApiError> {
        let mut table = self.fetch_listing("/groups").await?;
        normalize_id_column(&mut table);
        Ok(table)
    }

    pub async fn get_workspace(&self, workspace_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &[])?;
        self.fetch_object(&path).await
    }

    pub async fn get_workspace_users(&self, workspace_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["users"])?;
        self.fetch_listing(&path).await
    }

    pub async fn list_datasets(&self, workspace_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["datasets"])?;
        self.fetch_listing(&path).await
    }

    pub async fn list_dataflows(&self, workspace_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["dataflows"])?;
        self.fetch_listing(&path).await
    }

    pub async fn list_reports(&self, workspace_id: &str) -> Result<Table, ApiError> {
        let path = self.group_path(workspace_id, &["reports"])?;
        self.fetch_listing(&path).await
    }
}

fn normalize_id_column(table: &mut Table) {
    if !table.has_column("id") {
        return;
    }

    let records = std::mem::take(table)
        .into_records()
        .into_iter()
        .map(|mut record| {
            if let Some(id) = record.get("id").filter(|v| !v.is_string() && !v.is_null()) {
                let text = cell_text(id);
                record.insert("id".to_string(), Value::String(text));
            }
            record
        })
        .collect();

    *table = Table::from_records(records);
}
