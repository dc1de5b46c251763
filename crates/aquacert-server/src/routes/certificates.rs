//! Certificate endpoints: listing with summary counts, create, edit and
//! status changes.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aquacert_core::{
    AnalysisResult, Certificate, CertificatePatch, CertificatePayload,
    CertificateStatus, CertificateSummary,
};

use crate::error::AppError;
use crate::service::{CertificateService, ServiceError};

/// Creates the certificates router.
pub fn router(service: CertificateService) -> Router {
    Router::new()
        .route("/", get(list_certificates).post(create_certificate))
        .route("/summary", get(get_summary))
        .route("/{id}", get(get_certificate).patch(update_certificate))
        .route("/{id}/status", post(change_status))
        .with_state(service)
}

/// Query string for the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one status.
    pub status: Option<String>,
}

/// Response for the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCertificatesResponse {
    /// Certificates, newest first, after the optional status filter.
    pub certificates: Vec<Certificate>,
    /// Counts over every certificate, regardless of the filter.
    pub summary: CertificateSummary,
}

/// Request body for editing a certificate.
///
/// `status` is kept as text so unknown names surface as an invalid-status
/// error rather than a generic body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificateRequest {
    pub status: Option<String>,
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub sample_point: Option<String>,
    pub sampled_on: Option<NaiveDate>,
    pub analyst: Option<String>,
    pub notes: Option<String>,
    pub results: Option<Vec<AnalysisResult>>,
    pub expected_version: Option<i64>,
}

impl TryFrom<UpdateCertificateRequest> for CertificatePatch {
    type Error = ServiceError;

    fn try_from(req: UpdateCertificateRequest) -> Result<Self, Self::Error> {
        let status = parse_status(req.status.as_deref())?;
        Ok(CertificatePatch {
            status,
            client_name: req.client_name,
            client_address: req.client_address,
            sample_point: req.sample_point,
            sampled_on: req.sampled_on,
            analyst: req.analyst,
            notes: req.notes,
            results: req.results,
            expected_version: req.expected_version,
        })
    }
}

/// Request body for a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: String,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<CertificateStatus>, ServiceError> {
    raw.map(|s| s.parse::<CertificateStatus>())
        .transpose()
        .map_err(ServiceError::from)
}

/// GET /api/v1/certificates?status=...
///
/// Returns certificates ordered by created_at (newest first) together with
/// per-status counts over the whole collection.
async fn list_certificates(
    State(service): State<CertificateService>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListCertificatesResponse>, AppError> {
    // A blank value is the "all" tab.
    let filter = parse_status(query.status.as_deref().filter(|s| !s.trim().is_empty()))?;

    let certificates = service.list(filter).await?;
    let summary = service.summary().await?;

    Ok(Json(ListCertificatesResponse {
        certificates,
        summary,
    }))
}

/// POST /api/v1/certificates
///
/// Creates a draft certificate from the payload in the body and points
/// `Location` at it.
async fn create_certificate(
    State(service): State<CertificateService>,
    Json(payload): Json<CertificatePayload>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Certificate>), AppError> {
    let certificate = service.create(payload).await?;
    let location = [(header::LOCATION, certificate.url_path())];
    Ok((StatusCode::CREATED, location, Json(certificate)))
}

/// GET /api/v1/certificates/summary
async fn get_summary(
    State(service): State<CertificateService>,
) -> Result<Json<CertificateSummary>, AppError> {
    Ok(Json(service.summary().await?))
}

/// GET /api/v1/certificates/{id}
async fn get_certificate(
    State(service): State<CertificateService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Certificate>, AppError> {
    Ok(Json(service.get(id).await?))
}

/// PATCH /api/v1/certificates/{id}
///
/// Merges the given fields over the stored certificate and writes the full
/// record back. Send `expectedVersion` to reject the write if someone else
/// saved in between.
async fn update_certificate(
    State(service): State<CertificateService>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCertificateRequest>,
) -> Result<Json<Certificate>, AppError> {
    let patch = CertificatePatch::try_from(req)?;
    Ok(Json(service.update(id, patch).await?))
}

/// POST /api/v1/certificates/{id}/status
async fn change_status(
    State(service): State<CertificateService>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<Certificate>, AppError> {
    let status = req.status.parse::<CertificateStatus>().map_err(ServiceError::from)?;
    let mut patch = CertificatePatch::status(status);
    patch.expected_version = req.expected_version;
    Ok(Json(service.update(id, patch).await?))
}
