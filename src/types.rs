//! # Data Model
//!
//! Wire and state types shared by the issuance and registration workflows.

use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The permission level granted to a credential. A closed set with a stable
/// numeric wire form, matching the generator's `scope=<level>` query
/// contract.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scope {
    /// Launch-only trust: no service access.
    ReadOnly,

    /// Basic outcomes access.
    #[default]
    Minimal,

    /// Names and Role Provisioning Services access.
    NamesAndRoles,

    /// Full service access.
    Full,
}

impl From<Scope> for u8 {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::ReadOnly => 0,
            Scope::Minimal => 1,
            Scope::NamesAndRoles => 2,
            Scope::Full => 3,
        }
    }
}

impl TryFrom<u8> for Scope {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ReadOnly),
            1 => Ok(Self::Minimal),
            2 => Ok(Self::NamesAndRoles),
            3 => Ok(Self::Full),
            _ => Err(format!("unknown scope level: {value}")),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A freshly generated key/secret pair, scoped to a declared access level.
///
/// The key is globally unique at the moment of creation and the secret is
/// never re-derivable from the key alone: both must be persisted by the
/// credential store. Deserializes from the generator's `{"Key", "Secret"}`
/// response body.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Credential {
    /// Opaque unique consumer key.
    #[serde(rename = "Key")]
    pub key: String,

    /// Opaque shared secret. Stored, never regenerated.
    #[serde(rename = "Secret")]
    pub secret: String,

    /// The access level the pair was generated for. Not part of the
    /// generator's response body; set from the requested level.
    #[serde(default)]
    pub scope: Scope,
}

/// The full form state captured synchronously at submit time.
///
/// The persistence payload is built only from this snapshot plus the
/// generated key and secret, so edits made while the generation request is
/// outstanding cannot leak into the record.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TrustRecordForm {
    /// Display name of the trust record. Required, non-empty.
    pub name: String,

    /// Requested access level for the generated credential.
    pub scope: Scope,

    /// Whether the record is protected from deletion.
    #[serde(default)]
    pub protected: bool,

    /// Whether the record is enabled for launches.
    #[serde(default)]
    pub enabled: bool,

    /// Start of the activation window, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_from: Option<DateTime<Utc>>,

    /// End of the activation window, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_until: Option<DateTime<Utc>>,

    /// Platform-issued identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,

    /// Client identifier registered with the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Deployment identifier registered with the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,

    /// Authorization server identifier, when distinct from the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_server_id: Option<String>,

    /// Platform authentication request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_url: Option<String>,

    /// Platform access token URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_url: Option<String>,

    /// Platform JWK Set URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks_url: Option<String>,

    /// Platform public key, when provided instead of a JWKS URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Secret entered when editing an existing record. Left empty on
    /// creation, where the secret is server-generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Anti-forgery token supplied by the hosting page, forwarded with the
    /// persistence request.
    pub nonce: String,
}

/// Payload for the credential store's create-trust-record call: the
/// submit-time form snapshot plus the generated key and secret, form-encoded
/// with the store's `lti_`-prefixed field names.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CreateRecordRequest {
    /// Display name of the trust record.
    #[serde(rename = "lti_name")]
    pub name: String,

    /// The generated consumer key.
    #[serde(rename = "lti_key")]
    pub key: String,

    /// The generated shared secret.
    #[serde(rename = "lti_secret")]
    pub secret: String,

    /// Access level the credential was generated for.
    #[serde(rename = "lti_scope")]
    pub scope: Scope,

    /// Whether the record is protected from deletion.
    #[serde(rename = "lti_protected")]
    pub protected: bool,

    /// Whether the record is enabled for launches.
    #[serde(rename = "lti_enabled")]
    pub enabled: bool,

    /// Start of the activation window.
    #[serde(rename = "lti_enable_from", skip_serializing_if = "Option::is_none")]
    pub active_from: Option<DateTime<Utc>>,

    /// End of the activation window.
    #[serde(rename = "lti_enable_until", skip_serializing_if = "Option::is_none")]
    pub active_until: Option<DateTime<Utc>>,

    /// Platform-issued identifier.
    #[serde(rename = "lti_platformid", skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,

    /// Client identifier registered with the platform.
    #[serde(rename = "lti_clientid", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Deployment identifier registered with the platform.
    #[serde(rename = "lti_deploymentid", skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,

    /// Authorization server identifier.
    #[serde(rename = "lti_authorizationserverid", skip_serializing_if = "Option::is_none")]
    pub authorization_server_id: Option<String>,

    /// Platform authentication request URL.
    #[serde(rename = "lti_authenticationurl", skip_serializing_if = "Option::is_none")]
    pub authentication_url: Option<String>,

    /// Platform access token URL.
    #[serde(rename = "lti_accesstokenurl", skip_serializing_if = "Option::is_none")]
    pub access_token_url: Option<String>,

    /// Platform JWK Set URL.
    #[serde(rename = "lti_jwksurl", skip_serializing_if = "Option::is_none")]
    pub jwks_url: Option<String>,

    /// Platform public key.
    #[serde(rename = "lti_publickey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Anti-forgery token from the hosting page.
    #[serde(rename = "_wpnonce")]
    pub nonce: String,
}

impl CreateRecordRequest {
    /// Render the payload as an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be form-encoded.
    pub fn form_encode(&self) -> anyhow::Result<String> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

/// Discriminated result of the credential store's create call. Completion of
/// the issuance flow is gated on the explicit `ok` flag, not on transport
/// status alone.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CreateRecordResponse {
    /// Whether the trust record was created.
    pub ok: bool,

    /// Reason for refusal, when the store gives one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A dynamic-registration attempt: the remote OpenID configuration
/// reference, the one-time registration token, and the chosen access level.
/// Ephemeral; constructed per attempt and discarded after response handling.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// URL of the remote party's OpenID configuration.
    pub openid_configuration: String,

    /// Single-use token authorizing one registration attempt.
    pub registration_token: String,

    /// The access level selected for the registration.
    pub scope: Scope,
}

impl RegistrationRequest {
    /// Render the request as an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be form-encoded.
    pub fn form_encode(&self) -> anyhow::Result<String> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

/// The registration endpoint's structured reply.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegistrationResponse {
    /// Whether the registration was accepted.
    pub ok: bool,

    /// Human-readable failure reason, displayed verbatim when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn credential_from_generator_body() {
        let body = json!({"Key": "abc123", "Secret": "s3cr3t"});
        let credential: Credential = serde_json::from_value(body).expect("should deserialize");
        assert_eq!(credential.key, "abc123");
        assert_eq!(credential.secret, "s3cr3t");
        assert_eq!(credential.scope, Scope::Minimal);
    }

    #[test]
    fn scope_wire_form() {
        assert_eq!(serde_json::to_value(Scope::Full).unwrap(), json!(3));
        let scope: Scope = serde_json::from_value(json!(2)).expect("should deserialize");
        assert_eq!(scope, Scope::NamesAndRoles);
        assert!(serde_json::from_value::<Scope>(json!(7)).is_err());
    }

    #[test]
    fn create_record_form_encoding() {
        let request = CreateRecordRequest {
            name: "Test Tool".into(),
            key: "abc123".into(),
            secret: "s3cr3t".into(),
            scope: Scope::Full,
            enabled: true,
            nonce: "a1b2c3".into(),
            ..CreateRecordRequest::default()
        };
        let encoded = request.form_encode().expect("should encode");
        assert_eq!(
            encoded,
            "lti_name=Test+Tool&lti_key=abc123&lti_secret=s3cr3t&lti_scope=3\
             &lti_protected=false&lti_enabled=true&_wpnonce=a1b2c3"
        );
    }

    #[test]
    fn registration_reply_parsing() {
        let reply: RegistrationResponse =
            serde_json::from_str(r#"{"ok":false,"message":"invalid token"}"#)
                .expect("should deserialize");
        assert!(!reply.ok);
        assert_eq!(reply.message.as_deref(), Some("invalid token"));

        let reply: RegistrationResponse =
            serde_json::from_str(r#"{"ok":true}"#).expect("should deserialize");
        assert!(reply.ok);
        assert!(reply.message.is_none());
    }

    #[test]
    fn registration_form_encoding() {
        let request = RegistrationRequest {
            openid_configuration: "https://lms.example/.well-known/openid-configuration".into(),
            registration_token: "one-time".into(),
            scope: Scope::NamesAndRoles,
        };
        let encoded = request.form_encode().expect("should encode");
        assert_eq!(
            encoded,
            "openid_configuration=https%3A%2F%2Flms.example%2F.well-known%2Fopenid-configuration\
             &registration_token=one-time&scope=2"
        );
    }
}
