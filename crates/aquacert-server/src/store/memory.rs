//! In-memory certificate store.
//!
//! Holds rows in insertion order behind a `tokio::sync::RwLock`. Each
//! method takes the lock once, so every write is atomic with respect to
//! readers, matching what the PostgreSQL store guarantees.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use aquacert_core::Certificate;

use super::{CertificateRecord, CertificateStore, StoreError};

/// Process-local store with no durability.
#[derive(Debug, Default)]
pub struct MemoryCertificateStore {
    rows: RwLock<Vec<Certificate>>,
}

impl MemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CertificateStore for MemoryCertificateStore {
    async fn insert(&self, record: CertificateRecord) -> Result<Certificate, StoreError> {
        let mut rows = self.rows.write().await;

        // v4 collisions are not expected, but identifiers must never repeat.
        let mut id = Uuid::new_v4();
        while rows.iter().any(|row| row.id == id) {
            id = Uuid::new_v4();
        }

        // created_at stays non-decreasing in insertion order.
        let now = rows
            .last()
            .map_or_else(Utc::now, |last| Utc::now().max(last.created_at));
        let certificate = Certificate {
            id,
            status: record.status,
            payload: record.payload,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        rows.push(certificate.clone());

        Ok(certificate)
    }

    async fn update(
        &self,
        id: Uuid,
        record: CertificateRecord,
        expected_version: Option<i64>,
    ) -> Result<Certificate, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound { id })?;

        if let Some(expected_version) = expected_version {
            if row.version != expected_version {
                return Err(StoreError::Conflict {
                    id,
                    expected_version,
                });
            }
        }

        row.status = record.status;
        row.payload = record.payload;
        row.version += 1;
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Certificate>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn select_all(&self) -> Result<Vec<Certificate>, StoreError> {
        let rows = self.rows.read().await;
        // Reverse first so the stable sort keeps later inserts ahead on ties.
        let mut all: Vec<Certificate> = rows.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
