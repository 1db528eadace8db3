//! # Providers
//!
//! The provider traits exported by this module are the narrow boundaries the
//! workflows call through: key/secret generation, trust record persistence,
//! the remote registration endpoint, flow state storage and cross-context
//! notification. While the collaborators are HTTP services in practice, the
//! traits keep the workflows transport-layer agnostic.
//!
//! See individual trait documentation for specific details.

use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{
    CreateRecordRequest, CreateRecordResponse, Credential, RegistrationRequest,
    RegistrationResponse, Scope,
};

/// Platform-side provider: everything the issuance workflow needs.
pub trait PlatformProvider: KeyGenerator + TrustStore + StateStore + Clone {}

/// Tool-side provider: everything the registration workflow needs.
pub trait ToolProvider: RegistrationEndpoint + Notifier + StateStore + Clone {}

/// `KeyGenerator` produces a fresh unique key/secret pair for a requested
/// access level. The key is unique at the moment of creation; the secret
/// must be persisted, never regenerated.
pub trait KeyGenerator: Send + Sync {
    /// Generate a credential scoped to the given access level. Any failure
    /// cancels the issuance attempt.
    fn generate(&self, scope: Scope) -> impl Future<Output = Result<Credential>> + Send;
}

/// `TrustStore` persists a named trust record bound to a key/secret pair and
/// scope. The record is created exactly once per successful issuance and
/// owned by the store thereafter.
pub trait TrustStore: Send + Sync {
    /// Create a trust record from the submitted payload. The response
    /// carries an explicit success flag; completion of the issuance flow is
    /// gated on it, not on transport status.
    fn create(
        &self, request: &CreateRecordRequest,
    ) -> impl Future<Output = Result<CreateRecordResponse>> + Send;
}

/// `RegistrationEndpoint` is the remote target of the dynamic-registration
/// handshake. It receives the OpenID configuration reference, the one-time
/// registration token and the chosen scope, and replies with a structured
/// accept/reject result.
pub trait RegistrationEndpoint: Send + Sync {
    /// Submit a registration attempt. A transport-level error (unreachable
    /// endpoint, unparseable reply) is returned as `Err`; a business-level
    /// rejection arrives as a reply with `ok` unset.
    fn register(
        &self, request: &RegistrationRequest,
    ) -> impl Future<Output = Result<RegistrationResponse>> + Send;
}

/// `Notifier` posts a fire-and-forget, subject-tagged notification to the
/// opening context, for embedding scenarios where the workflow runs in a
/// popup or frame launched by the platform. Listeners must validate the
/// subject before acting on a message.
pub trait Notifier: Send + Sync {
    /// Post a notification with the given subject tag to a wildcard target.
    fn notify(&self, subject: &str) -> impl Future<Output = Result<()>> + Send;
}

/// `StateStore` is used to store and retrieve flow state between user
/// actions.
pub trait StateStore: Send + Sync {
    /// Store state using the provided key. The expiry parameter indicates
    /// when data can be expunged from the state store, so an abandoned
    /// attempt cannot hold a flow busy forever.
    fn put(
        &self, key: &str, state: impl Serialize + Send, expiry: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Retrieve data using the provided key.
    fn get<T: DeserializeOwned>(&self, key: &str) -> impl Future<Output = Result<T>> + Send;

    /// Remove data using the key provided.
    fn purge(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
