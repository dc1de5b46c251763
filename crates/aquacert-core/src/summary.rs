//! Per-status counts over a collection of certificates.

use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::status::CertificateStatus;

/// Display-ready counts for a certificate listing.
///
/// `draft_count + published_count + archived_count == total` always holds
/// for summaries produced by [`summarize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    pub total: u64,
    pub draft_count: u64,
    pub published_count: u64,
    pub archived_count: u64,
}

impl CertificateSummary {
    /// Returns the counter for `status`.
    pub fn count(&self, status: CertificateStatus) -> u64 {
        match status {
            CertificateStatus::Draft => self.draft_count,
            CertificateStatus::Published => self.published_count,
            CertificateStatus::Archived => self.archived_count,
        }
    }

    fn record(&mut self, status: CertificateStatus) {
        self.total += 1;
        match status {
            CertificateStatus::Draft => self.draft_count += 1,
            CertificateStatus::Published => self.published_count += 1,
            CertificateStatus::Archived => self.archived_count += 1,
        }
    }
}

/// Count certificates per status in a single pass.
///
/// Order-independent; an empty input yields all zeros.
pub fn summarize<'a, I>(certificates: I) -> CertificateSummary
where
    I: IntoIterator<Item = &'a Certificate>,
{
    certificates
        .into_iter()
        .fold(CertificateSummary::default(), |mut summary, certificate| {
            summary.record(certificate.status);
            summary
        })
}
