pub mod error;
pub mod backend;

pub use error::*;
pub use backend::*;

use async_trait::async_trait;

use crate::settings::{SettingsPayload, SettingsRecord};
use crate::snapshot::Snapshot;

/// Read side of the status endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError>;
}

/// Read/write access to the runtime settings endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn load_settings(&self) -> Result<SettingsRecord, ClientError>;
    async fn save_settings(&self, payload: &SettingsPayload) -> Result<(), ClientError>;
}
