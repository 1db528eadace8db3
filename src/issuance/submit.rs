//! # Submit Endpoint
//!
//! The submit endpoint runs the issuance workflow for a submitted form: the
//! submit-time snapshot is validated, a scoped key/secret pair is requested
//! from the key generator, and the trust record is persisted. On success the
//! generated pair is returned for the UI to reveal.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{IssuanceState, validate_issuance};
use crate::error::Error;
use crate::{Result, STATE_EXPIRY_MINUTES};
use crate::provider::{KeyGenerator, PlatformProvider, StateStore, TrustStore};
use crate::types::TrustRecordForm;

/// `SubmitRequest` is the request to the `submit` endpoint to issue a
/// credential and persist a new trust record.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct SubmitRequest {
    /// The issuance flow identifier, one per form instance. Repeated
    /// submissions from the same form carry the same identifier.
    pub issuance_id: String,

    /// The entire form state, snapshotted synchronously at submit time.
    /// Fields edited while a request is outstanding have no effect on this
    /// attempt.
    pub form: TrustRecordForm,
}

/// Terminal view of a successful issuance. The caller renders this in place
/// of the input form and clears its unsaved-changes tracker.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct SubmitResponse {
    /// The trust record's display name.
    pub name: String,

    /// The generated consumer key.
    pub key: String,

    /// The generated shared secret.
    pub secret: String,
}

/// Runs the issuance workflow for a submitted form.
///
/// Validation failures refuse the attempt before any collaborator is
/// called. At most one submission may be in flight per form: the flow state
/// is stored (busy) before the first request goes out and settles to `Done`
/// or `Failed`.
///
/// # Errors
///
/// Returns `InvalidForm` when validation fails, `AttemptInFlight` when a
/// previous submission has not settled, `Generation` when the key generator
/// fails, `Persistence` when the trust store fails or refuses the record,
/// and `ServerError` when flow state cannot be stored.
#[instrument(level = "debug", skip(provider))]
pub async fn submit(
    provider: impl PlatformProvider, request: &SubmitRequest,
) -> Result<SubmitResponse> {
    tracing::debug!("Endpoint::submit");

    let outcome = validate_issuance(&request.form);
    if !outcome.ok {
        let e = Error::InvalidForm(format!("invalid fields: {:?}", outcome.field_errors));
        tracing::error!(target: "Endpoint::submit", ?e);
        return Err(e);
    }

    // Refuse overlapping submissions for the same form. A missing state
    // entry reads as a fresh flow.
    if let Ok(existing) = StateStore::get::<IssuanceState>(&provider, &request.issuance_id).await {
        if existing.status.is_in_flight() {
            let e =
                Error::AttemptInFlight("a submission is already in flight for this form".into());
            tracing::error!(target: "Endpoint::submit", ?e);
            return Err(e);
        }
    }

    // Set the busy flag before sending anything.
    let mut issuance = IssuanceState::new(&request.issuance_id, request.form.clone());
    stash(&provider, &issuance).await?;

    let credential = match KeyGenerator::generate(&provider, request.form.scope).await {
        Ok(credential) => credential,
        Err(e) => {
            tracing::error!(target: "Endpoint::submit", ?e);
            let reason = "could not generate credentials";
            settle_failed(&provider, &mut issuance, reason).await;
            return Err(Error::Generation(reason.into()));
        }
    };
    issuance.credential(&credential).map_err(|e| Error::ServerError(e.to_string()))?;
    stash(&provider, &issuance).await?;

    let create_request = issuance.create_request().map_err(|e| Error::ServerError(e.to_string()))?;
    let created = match TrustStore::create(&provider, &create_request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(target: "Endpoint::submit", ?e);
            let reason = "could not save the trust record";
            settle_failed(&provider, &mut issuance, reason).await;
            return Err(Error::Persistence(reason.into()));
        }
    };
    if !created.ok {
        let reason =
            created.reason.unwrap_or_else(|| "could not save the trust record".into());
        settle_failed(&provider, &mut issuance, &reason).await;
        return Err(Error::Persistence(reason));
    }

    issuance.complete().map_err(|e| Error::ServerError(e.to_string()))?;
    stash(&provider, &issuance).await?;

    Ok(SubmitResponse {
        name: issuance.form.name.clone(),
        key: credential.key,
        secret: credential.secret,
    })
}

/// Store flow state with the standard expiry.
async fn stash(provider: &impl PlatformProvider, issuance: &IssuanceState) -> Result<()> {
    let expiry = Utc::now() + Duration::minutes(STATE_EXPIRY_MINUTES);
    if let Err(e) = StateStore::put(provider, &issuance.id, issuance, expiry).await {
        tracing::error!(target: "Endpoint::submit", ?e);
        return Err(Error::ServerError(e.to_string()));
    }
    Ok(())
}

/// Settle the flow as failed, clearing the busy flag. Best-effort: a state
/// store fault here must not mask the original failure.
async fn settle_failed(
    provider: &impl PlatformProvider, issuance: &mut IssuanceState, reason: &str,
) {
    issuance.fail(reason);
    let expiry = Utc::now() + Duration::minutes(STATE_EXPIRY_MINUTES);
    if let Err(e) = StateStore::put(provider, &issuance.id, &*issuance, expiry).await {
        tracing::error!(target: "Endpoint::submit", ?e);
    }
}
