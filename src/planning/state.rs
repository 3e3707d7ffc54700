//! Planning lifecycle state

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Matches error text that points at a missing or bad upstream credential
static CREDENTIAL_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)api[ _]?key|missing|invalid").expect("credential pattern is valid")
});

/// Exactly one of these is active per controller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlanState {
    /// Nothing submitted, or the last outcome was dismissed
    #[default]
    Idle,

    /// One call in flight; any previous outcome is already gone
    Pending { generation: u64, request: String },

    Success {
        request: String,
        trip_plan: String,
        steps: Option<Vec<Value>>,
    },

    /// UI displays this state directly
    Error { request: String, message: String },
}

impl PlanState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PlanState::Pending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlanState::Idle => "idle",
            PlanState::Pending { .. } => "pending",
            PlanState::Success { .. } => "success",
            PlanState::Error { .. } => "error",
        }
    }

    #[cfg(test)]
    pub fn trip_plan(&self) -> Option<&str> {
        match self {
            PlanState::Success { trip_plan, .. } => Some(trip_plan),
            _ => None,
        }
    }

    /// How the error panel should be titled, if this is an error
    pub fn error_label(&self) -> Option<ErrorLabel> {
        match self {
            PlanState::Error { message, .. } => Some(ErrorLabel::classify(message)),
            _ => None,
        }
    }
}

/// Display label for an error message. Labelling only; behaviour is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLabel {
    /// The planning agent has no usable credential upstream
    AgentUnavailable,
    Generic,
}

impl ErrorLabel {
    // TODO: switch to a structured error code once the planning endpoint
    // returns one alongside error_message.
    pub fn classify(message: &str) -> Self {
        if CREDENTIAL_ERROR.is_match(message) {
            ErrorLabel::AgentUnavailable
        } else {
            ErrorLabel::Generic
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorLabel::AgentUnavailable => "Agent unavailable",
            ErrorLabel::Generic => "Error",
        }
    }
}
