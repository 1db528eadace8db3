//! Provider implementation for tests: in-memory collaborators with recorded
//! requests and configurable failure modes.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use lti_trust::provider::{
    KeyGenerator, Notifier, PlatformProvider, RegistrationEndpoint, StateStore, ToolProvider,
    TrustStore,
};
use lti_trust::types::{
    CreateRecordRequest, CreateRecordResponse, Credential, RegistrationRequest,
    RegistrationResponse, Scope,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Clone, Debug, Default)]
pub struct Provider {
    state: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    generate_calls: Arc<AtomicUsize>,
    register_calls: Arc<AtomicUsize>,
    created: Arc<Mutex<Vec<CreateRecordRequest>>>,
    registrations: Arc<Mutex<Vec<RegistrationRequest>>>,
    notified: Arc<Mutex<Vec<String>>>,
    fail_generate: bool,
    refuse_create: Option<String>,
    registration_reply: Option<RegistrationResponse>,
}

impl Provider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registration_reply: Some(RegistrationResponse {
                ok: true,
                message: None,
            }),
            ..Self::default()
        }
    }

    /// Make credential generation fail.
    #[must_use]
    pub fn fail_generate(mut self) -> Self {
        self.fail_generate = true;
        self
    }

    /// Make the trust store refuse creation with the given reason.
    #[must_use]
    pub fn refuse_create(mut self, reason: impl Into<String>) -> Self {
        self.refuse_create = Some(reason.into());
        self
    }

    /// Fix the registration endpoint's reply.
    #[must_use]
    pub fn registration_reply(mut self, reply: RegistrationResponse) -> Self {
        self.registration_reply = Some(reply);
        self
    }

    /// Make the registration endpoint unreachable.
    #[must_use]
    pub fn unreachable_endpoint(mut self) -> Self {
        self.registration_reply = None;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<CreateRecordRequest> {
        self.created.lock().expect("should lock").clone()
    }

    pub fn registrations(&self) -> Vec<RegistrationRequest> {
        self.registrations.lock().expect("should lock").clone()
    }

    pub fn notified(&self) -> Vec<String> {
        self.notified.lock().expect("should lock").clone()
    }
}

impl PlatformProvider for Provider {}
impl ToolProvider for Provider {}

impl KeyGenerator for Provider {
    async fn generate(&self, scope: Scope) -> anyhow::Result<Credential> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_generate {
            return Err(anyhow::anyhow!("generator returned status 500"));
        }
        Ok(Credential {
            key: "abc123".into(),
            secret: "s3cr3t".into(),
            scope,
        })
    }
}

impl TrustStore for Provider {
    async fn create(&self, request: &CreateRecordRequest) -> anyhow::Result<CreateRecordResponse> {
        self.created.lock().expect("should lock").push(request.clone());
        if let Some(reason) = &self.refuse_create {
            return Ok(CreateRecordResponse {
                ok: false,
                reason: Some(reason.clone()),
            });
        }
        Ok(CreateRecordResponse {
            ok: true,
            reason: None,
        })
    }
}

impl RegistrationEndpoint for Provider {
    async fn register(&self, request: &RegistrationRequest) -> anyhow::Result<RegistrationResponse> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.registrations.lock().expect("should lock").push(request.clone());
        let Some(reply) = &self.registration_reply else {
            return Err(anyhow::anyhow!("connection refused"));
        };
        Ok(reply.clone())
    }
}

impl Notifier for Provider {
    async fn notify(&self, subject: &str) -> anyhow::Result<()> {
        self.notified.lock().expect("should lock").push(subject.to_string());
        Ok(())
    }
}

impl StateStore for Provider {
    async fn put(
        &self, key: &str, state: impl Serialize + Send, _expiry: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(&state)?;
        self.state.lock().expect("should lock").insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        let Some(bytes) = self.state.lock().expect("should lock").get(key).cloned() else {
            return Err(anyhow::anyhow!("state not found for key: {key}"));
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn purge(&self, key: &str) -> anyhow::Result<()> {
        self.state.lock().expect("should lock").remove(key);
        Ok(())
    }
}
