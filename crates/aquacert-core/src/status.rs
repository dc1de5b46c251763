//! Certificate lifecycle status.
//!
//! The status set is closed: every certificate is in exactly one of
//! `draft`, `published` or `archived`. Any status may follow any other;
//! there is no workflow guard between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CertificateError;

/// Possible states of a certificate in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    /// Being prepared; the state every certificate starts in.
    #[default]
    Draft,
    /// Released to the client.
    Published,
    /// Withdrawn from the active listing. Not a deletion.
    Archived,
}

impl CertificateStatus {
    /// All statuses, in display order.
    pub const ALL: [CertificateStatus; 3] = [Self::Draft, Self::Published, Self::Archived];

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Check if the certificate is still being prepared.
    pub fn is_draft(&self) -> bool {
        *self == Self::Draft
    }

    /// Check if the certificate has been released.
    pub fn is_published(&self) -> bool {
        *self == Self::Published
    }

    /// Check if the certificate has been archived.
    pub fn is_archived(&self) -> bool {
        *self == Self::Archived
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateStatus {
    type Err = CertificateError;

    /// Parses a status name. Surrounding whitespace and letter case are
    /// ignored; anything else outside the three names is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(CertificateError::InvalidStatus(s.to_string())),
        }
    }
}
