//! Certificate service: the create/edit/list flows over a record store.

use std::sync::Arc;

use uuid::Uuid;

use aquacert_core::{
    summarize, Certificate, CertificateError, CertificatePatch, CertificatePayload,
    CertificateStatus, CertificateSummary,
};

use crate::store::{CertificateRecord, CertificateStore, StoreError};

/// Errors returned by [`CertificateService`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("certificate not found: {0}")]
    NotFound(Uuid),

    #[error("invalid certificate status: '{0}' (expected one of draft, published, archived)")]
    InvalidStatus(String),

    /// Only raised for patches that carry an expected version.
    #[error("certificate {id} was modified concurrently (expected version {expected_version})")]
    Conflict { id: Uuid, expected_version: i64 },

    #[error("store unavailable: {0}")]
    Connection(String),

    #[error("store rejected the record: {0}")]
    Constraint(String),

    #[error("store error: {0}")]
    Backend(String),
}

impl From<CertificateError> for ServiceError {
    fn from(err: CertificateError) -> Self {
        match err {
            CertificateError::Validation(issues) => ServiceError::Validation(issues),
            CertificateError::InvalidStatus(status) => ServiceError::InvalidStatus(status),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => ServiceError::Connection(msg),
            StoreError::Constraint(msg) => ServiceError::Constraint(msg),
            StoreError::NotFound { id } => ServiceError::NotFound(id),
            StoreError::Conflict {
                id,
                expected_version,
            } => ServiceError::Conflict {
                id,
                expected_version,
            },
            StoreError::Backend(msg) => ServiceError::Backend(msg),
        }
    }
}

/// Certificate operations over an injected [`CertificateStore`].
///
/// Cheap to clone; clones share the same store. Every write is a single
/// store round trip with no retry. The in-memory model is only replaced
/// by what the store returns, so a failed write leaves it unchanged.
#[derive(Clone)]
pub struct CertificateService {
    store: Arc<dyn CertificateStore>,
}

impl CertificateService {
    pub fn new(store: Arc<dyn CertificateStore>) -> Self {
        Self { store }
    }

    /// Create a draft certificate from a validated payload.
    pub async fn create(&self, payload: CertificatePayload) -> Result<Certificate, ServiceError> {
        payload.validate()?;

        let certificate = self.store.insert(CertificateRecord::draft(payload)).await?;
        tracing::info!(
            certificate_id = %certificate.id,
            client = %certificate.payload.client_name,
            "Certificate created"
        );

        Ok(certificate)
    }

    /// Read a certificate by identifier.
    pub async fn get(&self, id: Uuid) -> Result<Certificate, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Apply `patch` to the stored certificate and write the merged record back.
    ///
    /// Any status may follow any other. Without `expected_version` concurrent
    /// edits of the same certificate are last-write-wins: the later write
    /// replaces the whole record, including fields it did not touch.
    pub async fn update(
        &self,
        id: Uuid,
        patch: CertificatePatch,
    ) -> Result<Certificate, ServiceError> {
        let current = self.get(id).await?;

        if let Some(expected_version) = patch.expected_version {
            if current.version != expected_version {
                return Err(ServiceError::Conflict {
                    id,
                    expected_version,
                });
            }
        }

        let merged = patch.apply_to(&current);
        merged.payload.validate()?;

        let updated = self
            .store
            .update(id, merged.into(), patch.expected_version)
            .await?;

        if updated.status != current.status {
            tracing::info!(
                certificate_id = %id,
                from = %current.status,
                to = %updated.status,
                "Certificate status changed"
            );
        } else {
            tracing::debug!(certificate_id = %id, version = updated.version, "Certificate updated");
        }

        Ok(updated)
    }

    /// Move a certificate to `status`, leaving its payload untouched.
    pub async fn change_status(
        &self,
        id: Uuid,
        status: CertificateStatus,
    ) -> Result<Certificate, ServiceError> {
        self.update(id, CertificatePatch::status(status)).await
    }

    /// List certificates newest first, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<CertificateStatus>,
    ) -> Result<Vec<Certificate>, ServiceError> {
        let mut certificates = self.store.select_all().await?;
        if let Some(status) = status {
            certificates.retain(|c| c.status == status);
        }
        Ok(certificates)
    }

    /// Per-status counts over every stored certificate.
    pub async fn summary(&self) -> Result<CertificateSummary, ServiceError> {
        let certificates = self.store.select_all().await?;
        Ok(summarize(&certificates))
    }
}
