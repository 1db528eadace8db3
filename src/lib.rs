//! # LTI Trust
//!
//! Credential issuance and dynamic-registration workflows for provisioning
//! trust between an LTI platform (LMS) and a tool, following the LTI
//! Advantage credential and registration model.
//!
//! The crate does not provide a user interface or an HTTP transport - that
//! is the job of the hosting application. Workflows are architected as
//! endpoint functions, one per user action, each with its own `XxxRequest`
//! and (where useful) `XxxResponse` types.
//!
//! Implementors inject the external collaborators by implementing the
//! `provider` traits: key/secret generation, trust record persistence, the
//! remote registration endpoint, flow state storage and cross-context
//! notification.

pub mod dirty;
mod error;
pub mod issuance;
pub mod provider;
pub mod registration;
pub mod types;

pub use error::{Error, ErrorResponse};

/// Result type for workflow endpoints.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Minutes before stored flow state expires. A flow whose remote never
/// settles ages out rather than holding the form busy forever.
pub(crate) const STATE_EXPIRY_MINUTES: i64 = 5;
