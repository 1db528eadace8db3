//! # Workflow Errors
//!
//! This module defines the errors surfaced by the issuance and registration
//! workflows. Every error is terminal for the current attempt: none are
//! retried automatically and the user must re-trigger the workflow.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Workflow error codes for credential issuance and dynamic registration.
#[derive(Error, Debug, Deserialize)]
pub enum Error {
    /// A required form field is missing or inconsistent. Resolved locally by
    /// refusing to send any request and highlighting the named fields; never
    /// surfaced as a collaborator error.
    #[error(r#"{{"error": "invalid_form", "error_description": "{0}"}}"#)]
    InvalidForm(String),

    /// A previous submission for the same form is still in flight. The
    /// client enforces at-most-one outstanding request per form; no
    /// server-side deduplication is assumed.
    #[error(r#"{{"error": "attempt_in_flight", "error_description": "{0}"}}"#)]
    AttemptInFlight(String),

    /// The key/secret generator returned a non-success status or a body
    /// without a parseable key and secret.
    #[error(r#"{{"error": "generation_failed", "error_description": "{0}"}}"#)]
    Generation(String),

    /// The credential store did not confirm creation of the trust record,
    /// either by transport failure or an explicit refusal.
    #[error(r#"{{"error": "persistence_failed", "error_description": "{0}"}}"#)]
    Persistence(String),

    /// The registration endpoint rejected the registration. The description
    /// carries the endpoint's reason verbatim when one was given.
    #[error(r#"{{"error": "registration_rejected", "error_description": "{0}"}}"#)]
    Registration(String),

    /// The registration endpoint could not be reached or returned an
    /// unparseable reply. Deliberately distinct from `Registration` so
    /// callers can tell transport failure from business rejection.
    #[error(r#"{{"error": "transport", "error_description": "{0}"}}"#)]
    Transport(String),

    /// Flow state could not be stored or retrieved.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    ServerError(String),
}

/// Error response for workflow errors, as rendered on the wire.
#[allow(clippy::module_name_repetitions)]
#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Error description.
    pub error_description: String,
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as SerdeError;

        let Ok(error) = serde_json::from_str::<ErrorResponse>(&self.to_string()) else {
            return Err(SerdeError::custom("issue deserializing Error"));
        };
        error.serialize(serializer)
    }
}

impl Error {
    /// Transform error to a wire-compatible json format.
    #[must_use]
    pub fn to_json(self) -> serde_json::Value {
        serde_json::from_str(&self.to_string()).unwrap_or_default()
    }

    /// Transform error to a wire-compatible query string format.
    #[must_use]
    pub fn to_querystring(self) -> String {
        serde_qs::to_string(&self).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use serde_json::{Value, json};

    use super::*;

    // Test that error details are returned as json.
    #[test]
    fn err_json() {
        let err = Error::InvalidForm("name is required".into());
        let ser: Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(ser, json!({"error":"invalid_form", "error_description": "name is required"}));
    }

    // Test that the error details are returned as an http query string.
    #[test]
    fn err_querystring() {
        let err = Error::Registration("invalid token".into());
        let ser = serde_qs::to_string(&err).unwrap();
        assert_eq!(ser, "error=registration_rejected&error_description=invalid+token");
    }

    // Test that the error serializes through the response shape.
    #[test]
    fn err_serialize() {
        let err = Error::Transport("registration failed".into());
        let ser = serde_json::to_value(&err).unwrap();
        assert_eq!(ser, json!({"error":"transport", "error_description": "registration failed"}));
    }
}
