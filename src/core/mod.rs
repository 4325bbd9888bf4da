pub mod auth;
pub mod services;
pub mod table;
