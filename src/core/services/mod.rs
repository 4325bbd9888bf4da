pub mod bulk_service;
pub mod traits;
pub mod types;

pub use bulk_service::{BulkService, FanOut, ParentFailure, ParentRef};
pub use traits::PowerBiSource;
pub use types::{ChildKind, ParentKind};
