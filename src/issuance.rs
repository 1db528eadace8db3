//! # Issuance
//!
//! The issuance endpoints implement the credential issuance workflow: a
//! submitted form is validated, a scoped key/secret pair is generated and a
//! new trust record is persisted, with the generated pair revealed to the
//! initiating UI on completion.

mod cancel;
mod submit;
mod validate;

pub use cancel::{CancelRequest, cancel};
use serde::{Deserialize, Serialize};
pub use submit::{SubmitRequest, SubmitResponse, submit};
pub use validate::{FieldId, ValidationOutcome, validate_credential_edit, validate_issuance};

use crate::types::{CreateRecordRequest, Credential, TrustRecordForm};

/// `IssuanceState` represents flow state across the steps of the issuance
/// workflow. One flow exists per form instance; it doubles as the in-flight
/// guard that prevents overlapping submissions.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct IssuanceState {
    /// The flow identifier, one per form instance.
    pub id: String,

    /// The form state, snapshotted synchronously at submit time. The
    /// persistence payload is built only from this snapshot.
    pub form: TrustRecordForm,

    /// The generated credential, once received from the key generator.
    pub credential: Option<Credential>,

    /// The current status of the issuance flow.
    pub status: Status,
}

/// Issuance status values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Status {
    /// No submission is being processed.
    #[default]
    Inactive,

    /// The generation request has been sent to the key generator.
    Generating,

    /// A credential was received and the create-record request has been
    /// sent to the trust store.
    Persisting,

    /// The trust record was created; the key and secret have been revealed.
    Done,

    /// The submission failed, with a reason.
    Failed(String),
}

impl Status {
    /// Whether a request is outstanding for this flow.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Generating | Self::Persisting)
    }
}

impl IssuanceState {
    /// Create flow state for a freshly submitted form. The busy flag is set
    /// (status `Generating`) before any request goes out.
    #[must_use]
    pub fn new(id: impl Into<String>, form: TrustRecordForm) -> Self {
        Self {
            id: id.into(),
            form,
            credential: None,
            status: Status::Generating,
        }
    }

    /// Record the credential received from the key generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not awaiting a generated credential.
    pub fn credential(&mut self, credential: &Credential) -> anyhow::Result<()> {
        if self.status != Status::Generating {
            anyhow::bail!("invalid issuance state status");
        }
        self.credential = Some(credential.clone());
        self.status = Status::Persisting;
        Ok(())
    }

    /// Construct the create-record payload from the submit-time snapshot
    /// plus the generated key and secret.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential has been recorded on the flow.
    pub fn create_request(&self) -> anyhow::Result<CreateRecordRequest> {
        let Some(credential) = &self.credential else {
            anyhow::bail!("no credential in issuance state");
        };
        Ok(CreateRecordRequest {
            name: self.form.name.clone(),
            key: credential.key.clone(),
            secret: credential.secret.clone(),
            scope: credential.scope,
            protected: self.form.protected,
            enabled: self.form.enabled,
            active_from: self.form.active_from,
            active_until: self.form.active_until,
            platform_id: self.form.platform_id.clone(),
            client_id: self.form.client_id.clone(),
            deployment_id: self.form.deployment_id.clone(),
            authorization_server_id: self.form.authorization_server_id.clone(),
            authentication_url: self.form.authentication_url.clone(),
            access_token_url: self.form.access_token_url.clone(),
            jwks_url: self.form.jwks_url.clone(),
            public_key: self.form.public_key.clone(),
            nonce: self.form.nonce.clone(),
        })
    }

    /// Mark the flow as complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the trust store's confirmation arrives out of
    /// order.
    pub fn complete(&mut self) -> anyhow::Result<()> {
        if self.status != Status::Persisting {
            anyhow::bail!("invalid issuance state status");
        }
        self.status = Status::Done;
        Ok(())
    }

    /// Mark the flow as failed. Terminal for this attempt; the user must
    /// re-trigger the workflow.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = Status::Failed(reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scope;

    fn sample_form() -> TrustRecordForm {
        TrustRecordForm {
            name: "Test Tool".into(),
            scope: Scope::Full,
            enabled: true,
            nonce: "a1b2c3".into(),
            ..TrustRecordForm::default()
        }
    }

    #[test]
    fn transitions_in_order() {
        let mut issuance = IssuanceState::new("flow-1", sample_form());
        assert_eq!(issuance.status, Status::Generating);
        assert!(issuance.status.is_in_flight());

        let credential = Credential {
            key: "abc123".into(),
            secret: "s3cr3t".into(),
            scope: Scope::Full,
        };
        issuance.credential(&credential).expect("should accept credential");
        assert_eq!(issuance.status, Status::Persisting);

        let request = issuance.create_request().expect("should build request");
        assert_eq!(request.name, "Test Tool");
        assert_eq!(request.key, "abc123");
        assert_eq!(request.secret, "s3cr3t");

        issuance.complete().expect("should complete");
        assert_eq!(issuance.status, Status::Done);
        assert!(!issuance.status.is_in_flight());
    }

    #[test]
    fn out_of_order_transitions_refused() {
        let mut issuance = IssuanceState::new("flow-1", sample_form());
        assert!(issuance.complete().is_err());
        assert!(issuance.create_request().is_err());

        let credential = Credential::default();
        issuance.credential(&credential).expect("should accept credential");
        assert!(issuance.credential(&credential).is_err());
    }
}
