//! AquaCert Server - API for water analysis certificates
//!
//! This crate provides the certificate service (create, edit, list and
//! status changes over an injected record store) and the REST API that
//! exposes it.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;
pub use service::{CertificateService, ServiceError};
pub use store::{CertificateStore, MemoryCertificateStore, PgCertificateStore, StoreError};
