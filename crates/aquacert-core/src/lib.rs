// AquaCert Core - Certificate lifecycle and collection summaries

pub mod certificate;
pub mod error;
pub mod status;
pub mod summary;

pub use certificate::{
    transition_status, transition_status_named, AnalysisResult, Certificate, CertificatePatch,
    CertificatePayload,
};
pub use error::CertificateError;
pub use status::CertificateStatus;
pub use summary::{summarize, CertificateSummary};
