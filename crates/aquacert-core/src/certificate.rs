//! Water analysis certificate entity.
//!
//! A [`Certificate`] is the stored record: store-assigned identity and
//! timestamps, a lifecycle [`CertificateStatus`], and the domain payload
//! filled in by whoever prepares the certificate. The payload content is
//! opaque here apart from the shape contract enforced by
//! [`CertificatePayload::validate`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CertificateError;
use crate::status::CertificateStatus;

/// Maximum length of the client name, in characters.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

/// Maximum length of the client address, in characters.
pub const MAX_CLIENT_ADDRESS_LEN: usize = 500;

/// Maximum length of short descriptive fields (sample point, analyst).
pub const MAX_SHORT_FIELD_LEN: usize = 200;

/// Maximum length of free-form notes, in characters.
pub const MAX_NOTES_LEN: usize = 4000;

/// One measured parameter on a certificate.
///
/// `value` and `limit` are kept as text: laboratory values are often
/// qualified (`"<0.01"`, `"n.d."`) and are reported exactly as measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Measured parameter, e.g. "pH" or "Nitrate".
    pub parameter: String,
    /// Reported value.
    pub value: String,
    /// Unit of measure, e.g. "mg/L".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Regulatory limit the value is compared against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl AnalysisResult {
    /// Create a result without unit or limit.
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            unit: None,
            limit: None,
        }
    }

    /// Set the unit of measure.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the regulatory limit.
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// Domain fields of a certificate, as entered by the preparer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePayload {
    /// Client the analysis was performed for.
    pub client_name: String,
    #[serde(default)]
    pub client_address: Option<String>,
    /// Where the sample was drawn (tap, well, treatment stage...).
    #[serde(default)]
    pub sample_point: Option<String>,
    /// Date the sample was taken.
    #[serde(default)]
    pub sampled_on: Option<NaiveDate>,
    #[serde(default)]
    pub analyst: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub results: Vec<AnalysisResult>,
}

impl CertificatePayload {
    /// Create a payload with only the client name set.
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            ..Self::default()
        }
    }

    /// Check the payload against the certificate shape contract.
    ///
    /// All violations are collected so the caller can display them at once.
    pub fn validate(&self) -> Result<(), CertificateError> {
        let mut issues = Vec::new();

        if self.client_name.trim().is_empty() {
            issues.push("clientName is required".to_string());
        }
        check_len(&mut issues, "clientName", Some(&self.client_name), MAX_CLIENT_NAME_LEN);
        check_len(
            &mut issues,
            "clientAddress",
            self.client_address.as_deref(),
            MAX_CLIENT_ADDRESS_LEN,
        );
        check_len(
            &mut issues,
            "samplePoint",
            self.sample_point.as_deref(),
            MAX_SHORT_FIELD_LEN,
        );
        check_len(&mut issues, "analyst", self.analyst.as_deref(), MAX_SHORT_FIELD_LEN);
        check_len(&mut issues, "notes", self.notes.as_deref(), MAX_NOTES_LEN);

        let mut seen: Vec<String> = Vec::with_capacity(self.results.len());
        for (i, result) in self.results.iter().enumerate() {
            let parameter = result.parameter.trim();
            if parameter.is_empty() {
                issues.push(format!("results[{}].parameter is required", i));
                continue;
            }
            let key = parameter.to_lowercase();
            if seen.contains(&key) {
                issues.push(format!(
                    "results[{}].parameter '{}' is listed more than once",
                    i, parameter
                ));
            } else {
                seen.push(key);
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CertificateError::Validation(issues))
        }
    }
}

fn check_len(issues: &mut Vec<String>, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            issues.push(format!(
                "{} exceeds maximum length: {} characters (max: {})",
                field, len, max
            ));
        }
    }
}

/// A stored water analysis certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Current lifecycle status.
    pub status: CertificateStatus,
    #[serde(flatten)]
    pub payload: CertificatePayload,
    /// Incremented by the store on every successful update; starts at 1.
    pub version: i64,
    /// When this certificate was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When this certificate was last written.
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Check if the certificate is still a draft.
    pub fn is_draft(&self) -> bool {
        self.status.is_draft()
    }

    /// Check if the certificate has been published.
    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    /// Check if the certificate has been archived.
    pub fn is_archived(&self) -> bool {
        self.status.is_archived()
    }

    /// Returns the URL path for this certificate.
    pub fn url_path(&self) -> String {
        format!("/api/v1/certificates/{}", self.id)
    }
}

/// Changes requested by the edit flow.
///
/// Absent fields are left unchanged. Identity, `createdAt`, `version` and
/// `updatedAt` are not editable. When `expected_version` is set the write is
/// conditioned on the stored version; otherwise the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampled_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<AnalysisResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

impl CertificatePatch {
    /// A patch that only changes the status.
    pub fn status(status: CertificateStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Condition the write on the stored version.
    pub fn expecting_version(mut self, version: i64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.client_name.is_none()
            && self.client_address.is_none()
            && self.sample_point.is_none()
            && self.sampled_on.is_none()
            && self.analyst.is_none()
            && self.notes.is_none()
            && self.results.is_none()
    }

    /// Merge the patch over `current`, returning the full updated record.
    ///
    /// The result is not validated; callers check the merged payload before
    /// writing it back.
    pub fn apply_to(&self, current: &Certificate) -> Certificate {
        let mut merged = current.clone();
        if let Some(status) = self.status {
            merged = transition_status(&merged, status);
        }

        let payload = &mut merged.payload;
        if let Some(ref client_name) = self.client_name {
            payload.client_name = client_name.clone();
        }
        if let Some(ref client_address) = self.client_address {
            payload.client_address = Some(client_address.clone());
        }
        if let Some(ref sample_point) = self.sample_point {
            payload.sample_point = Some(sample_point.clone());
        }
        if let Some(sampled_on) = self.sampled_on {
            payload.sampled_on = Some(sampled_on);
        }
        if let Some(ref analyst) = self.analyst {
            payload.analyst = Some(analyst.clone());
        }
        if let Some(ref notes) = self.notes {
            payload.notes = Some(notes.clone());
        }
        if let Some(ref results) = self.results {
            payload.results = results.clone();
        }

        merged
    }
}

/// Move a certificate to `new_status`.
///
/// Returns a new value; the input is left untouched. Every status may follow
/// every other, including itself.
pub fn transition_status(certificate: &Certificate, new_status: CertificateStatus) -> Certificate {
    Certificate {
        status: new_status,
        ..certificate.clone()
    }
}

/// Move a certificate to the status named `new_status`.
///
/// Fails with [`CertificateError::InvalidStatus`] for names outside the
/// closed status set instead of coercing them.
pub fn transition_status_named(
    certificate: &Certificate,
    new_status: &str,
) -> Result<Certificate, CertificateError> {
    let status = new_status.parse::<CertificateStatus>()?;
    Ok(transition_status(certificate, status))
}
