//! PostgreSQL certificate store.
//!
//! The `certificate_status` enum column is read as text and written with an
//! explicit cast, so the domain status type stays free of database
//! derives.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::error::ErrorKind;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use aquacert_core::{AnalysisResult, Certificate, CertificatePayload, CertificateStatus};

use super::{CertificateRecord, CertificateStore, StoreError};

/// Certificate store backed by a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PgCertificateStore {
    pool: PgPool,
}

impl PgCertificateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM certificates WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Row shape of the `certificates` table.
#[derive(Debug, FromRow)]
struct CertificateRow {
    id: Uuid,
    status: String,
    client_name: String,
    client_address: Option<String>,
    sample_point: Option<String>,
    sampled_on: Option<NaiveDate>,
    analyst: Option<String>,
    notes: Option<String>,
    results: Json<Vec<AnalysisResult>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CertificateRow> for Certificate {
    type Error = StoreError;

    fn try_from(row: CertificateRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<CertificateStatus>().map_err(|e| {
            StoreError::Backend(format!("Failed to decode certificate {}: {}", row.id, e))
        })?;

        Ok(Certificate {
            id: row.id,
            status,
            payload: CertificatePayload {
                client_name: row.client_name,
                client_address: row.client_address,
                sample_point: row.sample_point,
                sampled_on: row.sampled_on,
                analyst: row.analyst,
                notes: row.notes,
                results: row.results.0,
            },
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => StoreError::Constraint(db_err.message().to_string()),
                _ => StoreError::Backend(err.to_string()),
            },
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn insert(&self, record: CertificateRecord) -> Result<Certificate, StoreError> {
        let payload = &record.payload;
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            INSERT INTO certificates (status, client_name, client_address, sample_point, sampled_on, analyst, notes, results)
            VALUES ($1::certificate_status, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, status::TEXT AS status, client_name, client_address, sample_point,
                      sampled_on, analyst, notes, results, version, created_at, updated_at
            "#,
        )
        .bind(record.status.as_str())
        .bind(&payload.client_name)
        .bind(&payload.client_address)
        .bind(&payload.sample_point)
        .bind(payload.sampled_on)
        .bind(&payload.analyst)
        .bind(&payload.notes)
        .bind(Json(&payload.results))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(
        &self,
        id: Uuid,
        record: CertificateRecord,
        expected_version: Option<i64>,
    ) -> Result<Certificate, StoreError> {
        let payload = &record.payload;
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            UPDATE certificates
            SET status = $2::certificate_status,
                client_name = $3,
                client_address = $4,
                sample_point = $5,
                sampled_on = $6,
                analyst = $7,
                notes = $8,
                results = $9,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND ($10::BIGINT IS NULL OR version = $10)
            RETURNING id, status::TEXT AS status, client_name, client_address, sample_point,
                      sampled_on, analyst, notes, results, version, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(record.status.as_str())
        .bind(&payload.client_name)
        .bind(&payload.client_address)
        .bind(&payload.sample_point)
        .bind(payload.sampled_on)
        .bind(&payload.analyst)
        .bind(&payload.notes)
        .bind(Json(&payload.results))
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            // Zero rows: either the id is unknown or the version guard failed.
            None => match expected_version {
                Some(expected_version) if self.exists(id).await? => Err(StoreError::Conflict {
                    id,
                    expected_version,
                }),
                _ => Err(StoreError::NotFound { id }),
            },
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Certificate>, StoreError> {
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            SELECT id, status::TEXT AS status, client_name, client_address, sample_point,
                   sampled_on, analyst, notes, results, version, created_at, updated_at
            FROM certificates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Certificate::try_from).transpose()
    }

    async fn select_all(&self) -> Result<Vec<Certificate>, StoreError> {
        let rows = sqlx::query_as::<_, CertificateRow>(
            r#"
            SELECT id, status::TEXT AS status, client_name, client_address, sample_point,
                   sampled_on, analyst, notes, results, version, created_at, updated_at
            FROM certificates
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Certificate::try_from).collect()
    }
}
