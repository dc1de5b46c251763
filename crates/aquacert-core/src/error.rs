//! Error types for certificate domain logic.

/// Errors raised by the pure certificate operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CertificateError {
    /// The payload violates the certificate shape contract.
    /// Carries one message per violated rule.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A status name outside the closed status set.
    #[error("invalid certificate status: '{0}' (expected one of draft, published, archived)")]
    InvalidStatus(String),
}

impl CertificateError {
    /// Returns the individual validation messages, if any.
    pub fn issues(&self) -> &[String] {
        match self {
            Self::Validation(issues) => issues,
            Self::InvalidStatus(_) => &[],
        }
    }
}
