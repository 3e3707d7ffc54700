//! Planning call failure taxonomy
//!
//! Every variant renders to the exact text the user sees; callers only ever
//! receive it folded into [`PlanResult::Error`].

use super::PlanResult;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    /// HTTP-level failure with no usable body
    #[error("Request failed ({status})")]
    Transport { status: u16 },

    /// HTTP-level failure whose body only carried a server `detail` string
    #[error("Request failed ({status}): {detail}")]
    TransportDetail { status: u16, detail: String },

    /// The exchange never produced an HTTP status (connect error, timeout, ...)
    #[error("Request failed ({0})")]
    Connection(String),

    /// Transport succeeded but the body is not a planning envelope
    #[error("Invalid JSON response from server")]
    Parse,

    /// The endpoint declared `status: "error"`
    #[error("{0}")]
    Application(String),
}

impl PlanError {
    pub fn transport(status: u16) -> Self {
        Self::Transport { status }
    }

    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection(reason.into())
    }

    /// Classify a reqwest failure that happened before any status was seen
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::transport(status.as_u16())
        } else if err.is_timeout() {
            Self::connection("timeout")
        } else if err.is_connect() {
            Self::connection("connection error")
        } else {
            Self::connection("network error")
        }
    }
}

impl From<PlanError> for PlanResult {
    fn from(err: PlanError) -> Self {
        PlanResult::error(err.to_string())
    }
}
