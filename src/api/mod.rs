pub mod client;
pub mod dataflows;
pub mod datasets;
pub mod gateways;
pub mod models;
pub mod reports;
pub mod workspaces;

pub use client::PowerBiClient;
