//! # Cancel Issuance Endpoint
//!
//! Enables the administrator to abandon an issuance attempt, freeing a flow
//! whose remote never settled. Once a request has been sent it runs to
//! completion or failure at the collaborator; cancelling only releases the
//! client-side flow.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::Result;
use crate::error::Error;
use crate::provider::{PlatformProvider, StateStore};

/// Cancel request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CancelRequest {
    /// Issuance flow identifier.
    pub issuance_id: String,
}

/// Cancels the issuance flow and clears state.
///
/// Returns the issuance flow identifier.
///
/// # Errors
///
/// Returns a `ServerError` if flow state cannot be purged.
#[instrument(level = "debug", skip(provider))]
pub async fn cancel(provider: impl PlatformProvider, request: &CancelRequest) -> Result<String> {
    tracing::debug!("Endpoint::cancel");

    if let Err(e) = StateStore::purge(&provider, &request.issuance_id).await {
        tracing::error!(target: "Endpoint::cancel", ?e);
        return Err(Error::ServerError(e.to_string()));
    }

    Ok(request.issuance_id.clone())
}
