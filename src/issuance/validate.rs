//! # Form Validation
//!
//! Pure validation of form state, run before any request is sent. A failed
//! outcome names exactly the fields in error so the UI can toggle visual
//! error state: fields that now pass are absent and should have prior error
//! state cleared.

use serde::{Deserialize, Serialize};

use crate::types::TrustRecordForm;

/// Identifies a form field that failed validation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum FieldId {
    /// The trust record display name.
    Name,

    /// The secret field, required when editing an existing record.
    Secret,

    /// The end of the activation window.
    ActiveUntil,
}

/// The result of validating a form: an overall flag plus the set of fields
/// in error.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the form may be submitted.
    pub ok: bool,

    /// Exactly the fields that failed, in field order.
    pub field_errors: Vec<FieldId>,
}

/// Validate a form for credential issuance.
///
/// The name must be non-empty, and when both activation bounds are present
/// the window must not be inverted. No request may be sent when the outcome
/// is not ok.
#[must_use]
pub fn validate_issuance(form: &TrustRecordForm) -> ValidationOutcome {
    let mut field_errors = Vec::new();

    if form.name.trim().is_empty() {
        field_errors.push(FieldId::Name);
    }
    if let (Some(from), Some(until)) = (form.active_from, form.active_until) {
        if from > until {
            field_errors.push(FieldId::ActiveUntil);
        }
    }

    ValidationOutcome {
        ok: field_errors.is_empty(),
        field_errors,
    }
}

/// Validate a form for editing an existing record. In addition to the
/// issuance rules, the secret must be non-empty: it is only server-generated
/// on creation.
#[must_use]
pub fn validate_credential_edit(form: &TrustRecordForm) -> ValidationOutcome {
    let mut outcome = validate_issuance(form);

    if form.secret.as_deref().unwrap_or_default().trim().is_empty() {
        outcome.ok = false;
        outcome.field_errors.push(FieldId::Secret);
    }

    outcome
}
