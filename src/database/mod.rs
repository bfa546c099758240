pub mod models;
pub mod record;
pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

pub use models::technician::{NewTechnician, Technician, TechnicianContact, TechnicianPatch};
pub use record::RecordError;
pub use rest::RestStore;

/// Errors from the datastore clients
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row does not exist (or no longer exists).
    #[error("No matching row")]
    NotFound,

    #[error("Datastore rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Datastore unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected datastore response: {0}")]
    Decode(String),
}

/// Read-only contact lookup, served with the restricted public credential.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Contacts whose code equals `code` exactly (callers normalize first), at most `limit` rows.
    async fn find_contacts(&self, code: &str, limit: usize) -> Result<Vec<TechnicianContact>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Full roster access, served with the privileged service credential.
#[async_trait]
pub trait TechnicianStore: Send + Sync {
    /// Every technician, ordered by code.
    async fn list(&self) -> Result<Vec<Technician>, StoreError>;

    async fn insert(&self, record: &NewTechnician) -> Result<Technician, StoreError>;

    /// Returns `StoreError::NotFound` when no row has this id.
    async fn update(&self, id: i64, patch: &TechnicianPatch) -> Result<Technician, StoreError>;

    /// Returns `StoreError::NotFound` when no row has this id.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
