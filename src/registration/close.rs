//! # Close Endpoint
//!
//! The close endpoint is the terminal UI action for a registration flow. It
//! posts a "registration closed" notification to the opening context, for
//! embedding scenarios where the flow was launched in a popup or frame by
//! the platform, then clears flow state.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::CLOSE_SUBJECT;
use crate::Result;
use crate::error::Error;
use crate::provider::{Notifier, StateStore, ToolProvider};

/// Close request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CloseRequest {
    /// Registration flow identifier.
    pub registration_id: String,
}

/// Closes the registration flow.
///
/// The notification is fire-and-forget: a delivery failure is traced, not
/// surfaced, since there may legitimately be no listener.
///
/// Returns the registration flow identifier.
///
/// # Errors
///
/// Returns a `ServerError` if flow state cannot be purged.
#[instrument(level = "debug", skip(provider))]
pub async fn close(provider: impl ToolProvider, request: &CloseRequest) -> Result<String> {
    tracing::debug!("Endpoint::close");

    if let Err(e) = Notifier::notify(&provider, CLOSE_SUBJECT).await {
        tracing::error!(target: "Endpoint::close", ?e);
    }

    if let Err(e) = StateStore::purge(&provider, &request.registration_id).await {
        tracing::error!(target: "Endpoint::close", ?e);
        return Err(Error::ServerError(e.to_string()));
    }

    Ok(request.registration_id.clone())
}
