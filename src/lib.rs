//! # pbi-client
//!
//! Async client for the Power BI REST API that returns every response as a
//! row [`Table`](core::table::Table), plus bulk helpers that fan out across
//! all accessible workspaces.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pbi_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> pbi_client::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = PowerBiClient::with_credentials(Credentials::from_env()?, &config)?;
//!
//!     // One endpoint
//!     let datasets = client.list_datasets("f089354e-8366-4e18-aea3-4cb4a3a50b48").await?;
//!     println!("{}", datasets);
//!
//!     // Every workspace
//!     let bulk = BulkService::from_config(client, &config);
//!     let history = bulk.get_all_dataset_refresh_history().await?;
//!     println!("{} refreshes", history.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  HTTP client, endpoints, wire models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Auth providers, Table, bulk service
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration, credentials
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Retry, validation, text helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and installs no logger. Skipped
//! parents during a fan-out are reported at `warn`, request traces at `debug`.

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use pbi_client::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::{ApiError, AppError};

    // API client
    pub use crate::api::client::PowerBiClient;

    // Core
    pub use crate::core::auth::{AuthProvider, ClientCredentialsAuth, StaticTokenAuth};
    pub use crate::core::services::{BulkService, ChildKind, FanOut, ParentKind, PowerBiSource};
    pub use crate::core::table::{Record, Table};

    // Storage
    pub use crate::storage::config::Config;
    pub use crate::storage::credentials::Credentials;

    // Display utilities
    pub use crate::display::TableDisplay;
}

/// API layer - Power BI HTTP client and wire models.
///
/// - [`api::client`]: request building, retry, response unwrapping
/// - [`api::models`]: request bodies and response envelopes
pub mod api;

/// Core layer - authentication, the row table and the bulk service.
pub mod core;

/// Display layer - terminal rendering of tables.
pub mod display;

/// Error handling - hierarchical error system.
///
/// - Domain-specific error variants (API, Auth, Config, etc.)
/// - Severity levels (Critical, High, Medium, Low)
/// - Troubleshooting hints for common issues
pub mod error;

/// Storage layer - configuration file and credentials.
pub mod storage;

/// Utilities layer - retry, validation, text and data helpers.
pub mod utils;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[doc(hidden)]
pub use api::client::PowerBiClient;
#[doc(hidden)]
pub use core::services::BulkService;
#[doc(hidden)]
pub use core::table::Table;
#[doc(hidden)]
pub use storage::config::Config;
#[doc(hidden)]
pub use storage::credentials::Credentials;
