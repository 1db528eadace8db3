//! # Register Endpoint
//!
//! The register endpoint submits a dynamic-registration attempt to the
//! remote registration endpoint and interprets the structured reply.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{GENERIC_FAILURE, RegistrationState, Status};
use crate::error::Error;
use crate::provider::{RegistrationEndpoint, StateStore, ToolProvider};
use crate::{Result, STATE_EXPIRY_MINUTES};
use crate::types::{RegistrationRequest, Scope};

/// `RegisterRequest` is the request to the `register` endpoint to run one
/// dynamic-registration attempt.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct RegisterRequest {
    /// The registration flow identifier.
    pub registration_id: String,

    /// URL of the remote party's OpenID configuration.
    pub openid_configuration: String,

    /// Single-use token authorizing this registration attempt.
    pub registration_token: String,

    /// The access level selected at send time from the scope options.
    /// `None` when no option is selected, in which case no request is sent.
    pub scope: Option<Scope>,
}

/// Runs one dynamic-registration attempt.
///
/// A missing scope refuses the attempt before the endpoint is called, and a
/// flow already awaiting its response refuses a second send. The reply's
/// `ok` flag decides the terminal state; a rejection message is surfaced
/// verbatim.
///
/// # Errors
///
/// Returns `InvalidForm` when no scope is selected, `AttemptInFlight` when
/// a request is already awaiting its response, `Registration` when the
/// endpoint rejects the attempt, `Transport` when the endpoint cannot be
/// reached or replies unparseably, and `ServerError` when flow state cannot
/// be stored.
#[instrument(level = "debug", skip(provider))]
pub async fn register(provider: impl ToolProvider, request: &RegisterRequest) -> Result<Status> {
    tracing::debug!("Endpoint::register");

    let Some(scope) = request.scope else {
        let e = Error::InvalidForm("no scope selected".into());
        tracing::error!(target: "Endpoint::register", ?e);
        return Err(e);
    };

    // A missing state entry reads as a fresh flow.
    let mut registration =
        match StateStore::get::<RegistrationState>(&provider, &request.registration_id).await {
            Ok(registration) => registration,
            Err(_) => RegistrationState::new(&request.registration_id),
        };
    if registration.status == Status::AwaitingResponse {
        let e = Error::AttemptInFlight("a registration is already awaiting its response".into());
        tracing::error!(target: "Endpoint::register", ?e);
        return Err(e);
    }

    // Freeze scope selection before sending.
    registration.status = Status::AwaitingResponse;
    stash(&provider, &registration).await?;

    let endpoint_request = RegistrationRequest {
        openid_configuration: request.openid_configuration.clone(),
        registration_token: request.registration_token.clone(),
        scope,
    };
    let response = match RegistrationEndpoint::register(&provider, &endpoint_request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(target: "Endpoint::register", ?e);
            registration.status = Status::Failed(GENERIC_FAILURE.into());
            stash(&provider, &registration).await?;
            return Err(Error::Transport(GENERIC_FAILURE.into()));
        }
    };

    if !response.ok {
        let reason = response.message.unwrap_or_else(|| GENERIC_FAILURE.into());
        registration.status = Status::Failed(reason.clone());
        stash(&provider, &registration).await?;
        return Err(Error::Registration(reason));
    }

    registration.status = Status::Registered;
    stash(&provider, &registration).await?;

    Ok(registration.status)
}

/// Store flow state with the standard expiry.
async fn stash(provider: &impl ToolProvider, registration: &RegistrationState) -> Result<()> {
    let expiry = Utc::now() + Duration::minutes(STATE_EXPIRY_MINUTES);
    if let Err(e) = StateStore::put(provider, &registration.id, registration, expiry).await {
        tracing::error!(target: "Endpoint::register", ?e);
        return Err(Error::ServerError(e.to_string()));
    }
    Ok(())
}
