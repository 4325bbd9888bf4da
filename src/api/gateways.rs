//! On-premises gateway endpoints.
//!
//! Read calls follow the usual table contract. The write calls return the
//! parsed response body when there is one.

use crate::api::client::{PowerBiClient, checked_segment};
use crate::api::models::{BindToGatewayRequest, CredentialsUpdateRequest};
use crate::core::table::Table;
use crate::error::ApiError;
use reqwest::Method;
use serde_json::Value;

fn gateway_path(segments: &[&str]) -> Result<String, ApiError> {
    let mut path = String::from("/gateways");
    for segment in segments {
        path.push('/');
        path.push_str(checked_segment(segment)?);
    }
    Ok(path)
}

fn body_value(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

impl PowerBiClient {
    pub async fn list_gateways(&self) -> Result<Table, ApiError> {
        self.fetch_listing(&gateway_path(&[])?).await
    }

    pub async fn get_gateway(&self, gateway_id: &str) -> Result<Table, ApiError> {
        self.fetch_object(&gateway_path(&[gateway_id])?).await
    }

    pub async fn get_gateway_datasources(&self, gateway_id: &str) -> Result<Table, ApiError> {
        self.fetch_listing(&gateway_path(&[gateway_id, "datasources"])?)
            .await
    }

    pub async fn get_gateway_datasource(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> Result<Table, ApiError> {
        self.fetch_object(&gateway_path(&[gateway_id, "datasources", datasource_id])?)
            .await
    }

    /// Create a data source from a raw definition
    pub async fn create_gateway_datasource(
        &self,
        gateway_id: &str,
        definition: &Value,
    ) -> Result<Option<Value>, ApiError> {
        let path = gateway_path(&[gateway_id, "datasources"])?;
        let raw = self
            .send_action(Method::POST, &path, Some(definition), &[])
            .await?;
        Ok(body_value(&raw.body))
    }

    pub async fn update_gateway_datasource(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        update: &Value,
    ) -> Result<(), ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id])?;
        self.send_action(Method::PATCH, &path, Some(update), &[])
            .await?;
        Ok(())
    }

    pub async fn delete_gateway_datasource(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> Result<(), ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id])?;
        self.send_action::<()>(Method::DELETE, &path, None, &[])
            .await?;
        log::info!("Deleted data source {} from gateway {}", datasource_id, gateway_id);
        Ok(())
    }

    pub async fn get_gateway_datasource_users(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> Result<Table, ApiError> {
        self.fetch_listing(&gateway_path(&[gateway_id, "datasources", datasource_id, "users"])?)
            .await
    }

    pub async fn add_gateway_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        access_details: &Value,
    ) -> Result<(), ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id, "users"])?;
        self.send_action(Method::POST, &path, Some(access_details), &[])
            .await?;
        Ok(())
    }

    pub async fn delete_gateway_datasource_user(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        email_address: &str,
    ) -> Result<(), ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id, "users", email_address])?;
        self.send_action::<()>(Method::DELETE, &path, None, &[])
            .await?;
        Ok(())
    }

    pub async fn update_gateway_datasource_credentials(
        &self,
        gateway_id: &str,
        datasource_id: &str,
        credential_details: Value,
    ) -> Result<(), ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id])?;
        let body = CredentialsUpdateRequest { credential_details };
        self.send_action(Method::PATCH, &path, Some(&body), &[])
            .await?;
        Ok(())
    }

    /// Connectivity status of a data source, `None` on non-success
    pub async fn get_gateway_datasource_status(
        &self,
        gateway_id: &str,
        datasource_id: &str,
    ) -> Result<Option<Value>, ApiError> {
        let path = gateway_path(&[gateway_id, "datasources", datasource_id, "status"])?;
        self.fetch_json::<()>(Method::GET, &path, None).await
    }

    /// Gateways able to serve the data sources of a dataset
    pub async fn discover_gateways(&self, dataset_id: &str) -> Result<Table, ApiError> {
        let path = format!(
            "/datasets/{}/Default.DiscoverGateways",
            checked_segment(dataset_id)?
        );
        self.post_listing(&path).await
    }

    pub async fn bind_dataset_to_gateway<S: AsRef<str>>(
        &self,
        workspace_id: &str,
        dataset_id: &str,
        gateway_object_id: &str,
        datasource_object_ids: &[S],
    ) -> Result<(), ApiError> {
        let path = self.group_path(
            workspace_id,
            &["datasets", dataset_id, "Default.BindToGateway"],
        )?;
        let body = BindToGatewayRequest {
            gateway_object_id: gateway_object_id.to_string(),
            datasource_object_ids: datasource_object_ids
                .iter()
                .map(|id| id.as_ref().to_string())
                .collect(),
        };

        self.send_action(Method::POST, &path, Some(&body), &[])
            .await?;
        log::info!("Bound dataset {} to gateway {}", dataset_id, gateway_object_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_path() {
        assert_eq!(gateway_path(&[]).unwrap(), "/gateways");
        assert_eq!(
            gateway_path(&["g1", "datasources", "ds1", "users", "ana@contoso.com"]).unwrap(),
            "/gateways/g1/datasources/ds1/users/ana@contoso.com"
        );
        assert!(gateway_path(&["g1", ""]).is_err());
    }

    #[test]
    fn test_body_value() {
        assert_eq!(body_value(""), None);
        assert_eq!(body_value("  "), None);
        assert_eq!(body_value(r#"{"id": "ds1"}"#), Some(serde_json::json!({"id": "ds1"})));
    }
}
