//! Service principal credentials
//!
//! Credentials are supplied at construction or read from the
//! `PBI_TENANT_ID`, `PBI_CLIENT_ID` and `PBI_CLIENT_SECRET` environment
//! variables. The tenant and client ids may also come from config.toml; the
//! secret never does. Nothing is written to disk.

use crate::error::{AuthError, ConfigError};
use crate::storage::config::Config;
use crate::utils::validation::validate_required;
use std::env;
use std::fmt;

pub const TENANT_ID_VAR: &str = "PBI_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "PBI_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "PBI_CLIENT_SECRET";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let credentials = Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Read all three values from the environment
    pub fn from_env() -> Result<Self, AuthError> {
        Self::new(
            required_var(TENANT_ID_VAR)?,
            required_var(CLIENT_ID_VAR)?,
            required_var(CLIENT_SECRET_VAR)?,
        )
    }

    /// Tenant and client ids from `config` or the environment, secret from the environment
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let tenant_id = config_or_env(config.tenant_id.as_deref(), TENANT_ID_VAR, "tenant_id")?;
        let client_id = config_or_env(config.client_id.as_deref(), CLIENT_ID_VAR, "client_id")?;

        Ok(Self::new(tenant_id, client_id, required_var(CLIENT_SECRET_VAR)?)?)
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    fn validate(&self) -> Result<(), AuthError> {
        for (field, value) in [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            validate_required(field, value)
                .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn required_var(name: &str) -> Result<String, AuthError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::InvalidCredentials(format!("{} is not set", name)))
}

fn config_or_env(value: Option<&str>, var: &str, field: &str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| env::var(var).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| ConfigError::MissingField {
            field: field.to_string(),
            field_type: "string".to_string(),
        })
}
