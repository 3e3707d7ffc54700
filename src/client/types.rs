//! Planning request/result types and the endpoint's JSON envelope

use super::PlanError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when an error envelope carries no `error_message`
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// A trimmed, non-empty trip description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest(String);

impl PlanRequest {
    /// Returns `None` when the text is empty after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlanRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized outcome of one planning call.
///
/// Transport, parse and application failures all collapse into `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanResult {
    Success {
        trip_plan: String,
        /// Opaque agent step records, passed through untouched
        steps: Option<Vec<Value>>,
    },
    Error {
        message: String,
    },
}

impl PlanResult {
    #[cfg(test)]
    pub fn success(trip_plan: impl Into<String>) -> Self {
        PlanResult::Success {
            trip_plan: trip_plan.into(),
            steps: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PlanResult::Error {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, PlanResult::Success { .. })
    }

    /// Short variant name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PlanResult::Success { .. } => "success",
            PlanResult::Error { .. } => "error",
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct WireRequest<'a> {
    pub request: &'a str,
}

/// Response envelope, discriminated by `status`
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum WireResponse {
    Success {
        trip_plan: String,
        #[serde(default)]
        intermediate_steps: Option<Vec<Value>>,
    },
    Error {
        #[serde(default)]
        error_message: Option<String>,
    },
}

impl From<WireResponse> for PlanResult {
    fn from(resp: WireResponse) -> Self {
        match resp {
            WireResponse::Success {
                trip_plan,
                intermediate_steps,
            } => PlanResult::Success {
                trip_plan,
                steps: intermediate_steps,
            },
            WireResponse::Error { error_message } => PlanError::Application(
                error_message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            )
            .into(),
        }
    }
}

/// Error body the planning server uses for rejected requests (`{"detail": "..."}`)
#[derive(Debug, Deserialize)]
pub(crate) struct WireDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_request_trims_and_rejects_blank() {
        assert!(PlanRequest::new("").is_none());
        assert!(PlanRequest::new("   \n\t").is_none());
        let req = PlanRequest::new("  Plan a 3-day trip to Goa \n").unwrap();
        assert_eq!(req.as_str(), "Plan a 3-day trip to Goa");
    }

    #[test]
    fn test_wire_request_shape() {
        let body = serde_json::to_value(WireRequest { request: "Goa" }).unwrap();
        assert_eq!(body, json!({ "request": "Goa" }));
    }

    #[test]
    fn test_success_envelope() {
        let resp: WireResponse = serde_json::from_value(json!({
            "status": "success",
            "trip_plan": "Day 1: Arrive...",
            "intermediate_steps": [{ "tool": "search_flights" }]
        }))
        .unwrap();

        assert_eq!(
            PlanResult::from(resp),
            PlanResult::Success {
                trip_plan: "Day 1: Arrive...".to_string(),
                steps: Some(vec![json!({ "tool": "search_flights" })]),
            }
        );
    }

    #[test]
    fn test_error_envelope_with_null_plan() {
        let resp: WireResponse = serde_json::from_value(json!({
            "status": "error",
            "error_message": "GROQ_API_KEY missing",
            "trip_plan": null
        }))
        .unwrap();
        assert_eq!(PlanResult::from(resp), PlanResult::error("GROQ_API_KEY missing"));
    }

    #[test]
    fn test_error_envelope_without_message() {
        let resp: WireResponse =
            serde_json::from_value(json!({ "status": "error", "error_message": null })).unwrap();
        assert_eq!(PlanResult::from(resp), PlanResult::error(UNKNOWN_ERROR_MESSAGE));
    }

    #[test]
    fn test_foreign_shapes_do_not_parse() {
        assert!(serde_json::from_value::<WireResponse>(json!({ "status": "ok" })).is_err());
        assert!(serde_json::from_value::<WireResponse>(json!({ "detail": "nope" })).is_err());
        assert!(serde_json::from_value::<WireResponse>(json!({ "status": "success" })).is_err());
    }
}
