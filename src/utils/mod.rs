pub mod data;
pub mod error_helpers;
pub mod retry;
pub mod text;
pub mod validation;
