//! Record store abstraction for certificates.
//!
//! The service never talks to a database directly; it is handed an
//! `Arc<dyn CertificateStore>` at construction. Two implementations ship
//! with the crate: [`PgCertificateStore`] over a sqlx pool and
//! [`MemoryCertificateStore`] for tests and database-less runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use aquacert_core::{Certificate, CertificatePayload, CertificateStatus};

pub use memory::MemoryCertificateStore;
pub use postgres::PgCertificateStore;

/// All errors that can be returned by a `CertificateStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached (network, pool exhausted or closed).
    #[error("store connection error: {0}")]
    Connection(String),

    /// The backend rejected the row (check, not-null or uniqueness violation).
    #[error("store constraint violation: {0}")]
    Constraint(String),

    /// No record with the given identifier.
    #[error("certificate not found: {id}")]
    NotFound { id: Uuid },

    /// Version-conditioned update found a different stored version.
    #[error("concurrent conflict on certificate {id}: expected version {expected_version}")]
    Conflict { id: Uuid, expected_version: i64 },

    /// Any other backend-specific failure (decoding, protocol, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A full certificate record as written by the service.
///
/// Identity, `created_at`, `updated_at` and `version` are not part of it:
/// the store assigns and maintains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub status: CertificateStatus,
    pub payload: CertificatePayload,
}

impl CertificateRecord {
    /// A freshly created certificate: draft status with the given payload.
    pub fn draft(payload: CertificatePayload) -> Self {
        Self {
            status: CertificateStatus::Draft,
            payload,
        }
    }
}

impl From<Certificate> for CertificateRecord {
    fn from(certificate: Certificate) -> Self {
        Self {
            status: certificate.status,
            payload: certificate.payload,
        }
    }
}

/// The storage trait for certificate backends.
///
/// Each method is a single atomic round trip: either the backend applies
/// the write and returns the post-write row, or it fails and nothing is
/// visible to readers. Implementations do no retrying of their own.
///
/// Implementations must be `Send + Sync + 'static` to live in axum
/// application state and cross async task boundaries.
#[async_trait]
pub trait CertificateStore: Send + Sync + 'static {
    /// Insert a new certificate.
    ///
    /// The store assigns the identifier, `created_at`, `updated_at` and
    /// `version = 1`, and returns the stored row.
    async fn insert(&self, record: CertificateRecord) -> Result<Certificate, StoreError>;

    /// Overwrite the status and payload of an existing certificate.
    ///
    /// When `expected_version` is `Some`, the write only applies if the stored
    /// version matches, otherwise `Err(StoreError::Conflict)`. When `None`
    /// the last write wins. On success `version` is incremented and
    /// `updated_at` refreshed; `created_at` never changes.
    ///
    /// Returns `Err(StoreError::NotFound)` if no row has this identifier.
    async fn update(
        &self,
        id: Uuid,
        record: CertificateRecord,
        expected_version: Option<i64>,
    ) -> Result<Certificate, StoreError>;

    /// Read a single certificate.
    async fn get(&self, id: Uuid) -> Result<Option<Certificate>, StoreError>;

    /// Read every certificate, newest `created_at` first.
    async fn select_all(&self) -> Result<Vec<Certificate>, StoreError>;
}
