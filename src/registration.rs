//! # Registration
//!
//! The registration endpoints implement the dynamic-registration handshake:
//! a remote OpenID configuration reference and a one-time registration token
//! are submitted with a chosen scope to the registration endpoint, and the
//! structured reply drives the terminal UI state.

mod close;
mod register;

pub use close::{CloseRequest, close};
pub use register::{RegisterRequest, register};
use serde::{Deserialize, Serialize};

/// Subject tag of the cross-context notification posted to the opening
/// context when the registration UI closes. The notification is
/// fire-and-forget with a wildcard target: listeners must validate the
/// subject before acting on a message.
pub const CLOSE_SUBJECT: &str = "org.imsglobal.lti.close";

/// Fixed reason shown when the endpoint fails without a message, or cannot
/// be reached at all.
pub(crate) const GENERIC_FAILURE: &str = "registration failed";

/// `RegistrationState` represents flow state across a dynamic-registration
/// attempt. It doubles as the in-flight guard: scope selection is frozen
/// while a request is awaiting its response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegistrationState {
    /// The flow identifier.
    pub id: String,

    /// The current status of the registration flow.
    pub status: Status,
}

/// Registration status values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Status {
    /// Ready to send a registration request.
    #[default]
    Ready,

    /// A registration request has been sent; scope selection is frozen.
    AwaitingResponse,

    /// The endpoint accepted the registration.
    Registered,

    /// The endpoint rejected the registration or could not be reached, with
    /// a displayable reason.
    Failed(String),
}

impl RegistrationState {
    /// Create flow state for a fresh registration attempt.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: Status::Ready,
        }
    }
}
