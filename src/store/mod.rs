//! Record Store Client: every persistence operation goes through [`RecordStore`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{Config, StoreBackend};
use crate::model::{AttendanceRecord, Employee};

pub mod database;
pub mod memory;
pub mod rest;

pub use database::DatabaseStore;
pub use memory::InMemoryStore;
pub use rest::RestStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoreErrorKind {
    Conflict,
    NotFound,
    Validation,
    Unauthorized,
    Transport,
    InvalidPayload,
    Backend,
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Transport, message)
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidPayload, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Backend, message)
    }
}

/// Single remote round trip per call. No caching, retries or timeouts here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Newest-created first.
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;

    async fn create_employee(&self, employee: &Employee) -> Result<Employee, StoreError>;

    async fn delete_employee(&self, employee_id: &str) -> Result<(), StoreError>;

    /// Always appends, even when a record for that day already exists.
    async fn record_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError>;

    /// Newest date first. An employee without records yields an empty vec.
    async fn list_attendance(&self, employee_id: &str)
    -> Result<Vec<AttendanceRecord>, StoreError>;
}

/// Builds the store selected by `STORE_BACKEND`.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match &config.store {
        StoreBackend::Rest { base_url } => Arc::new(RestStore::new(base_url.clone())?),
        StoreBackend::Database { database_url } => {
            let pool = crate::db::init_db(database_url).await?;
            Arc::new(DatabaseStore::new(pool))
        }
    };

    tracing::info!(backend = store.backend_tag(), "Record store ready");
    Ok(store)
}
