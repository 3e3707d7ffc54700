//! Pure state transition function
//!
//! Given the same state, generation and event this always yields the same
//! result and performs no I/O. The controller executes the returned effects.

use super::{Effect, Event, PlanState};
use crate::client::{PlanRequest, PlanResult};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: PlanState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: PlanState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why an event was not applied. Rejections leave state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Trip description is empty")]
    EmptyRequest,
    #[error("A plan is already being generated")]
    Busy,
    #[error("Discarded resolution for call {got} (current: {expected:?})")]
    StaleResolution { expected: Option<u64>, got: u64 },
}

/// Apply `event` to `state`.
///
/// `next_generation` is the tag an accepted submit will carry.
pub fn transition(
    state: &PlanState,
    next_generation: u64,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // One call at a time; a second submit is dropped, not queued
        (PlanState::Pending { .. }, Event::Submit { .. } | Event::Dismiss) => {
            Err(TransitionError::Busy)
        }

        // Idle / Success / Error + Submit -> Pending, prior outcome cleared
        (_, Event::Submit { text }) => {
            let request = PlanRequest::new(&text).ok_or(TransitionError::EmptyRequest)?;
            Ok(TransitionResult::new(PlanState::Pending {
                generation: next_generation,
                request: request.as_str().to_string(),
            })
            .with_effect(Effect::RequestPlan {
                generation: next_generation,
                request,
            }))
        }

        (PlanState::Pending { generation, request }, Event::Resolved { generation: got, result })
            if *generation == got =>
        {
            Ok(resolve(request, result))
        }

        (PlanState::Pending { generation, .. }, Event::Resolved { generation: got, .. }) => {
            Err(TransitionError::StaleResolution {
                expected: Some(*generation),
                got,
            })
        }

        (_, Event::Resolved { generation: got, .. }) => Err(TransitionError::StaleResolution {
            expected: None,
            got,
        }),

        (PlanState::Idle | PlanState::Success { .. } | PlanState::Error { .. }, Event::Dismiss) => {
            Ok(TransitionResult::new(PlanState::Idle))
        }
    }
}

fn resolve(request: &str, result: PlanResult) -> TransitionResult {
    match result {
        PlanResult::Success { trip_plan, steps } => TransitionResult::new(PlanState::Success {
            request: request.to_string(),
            trip_plan: trip_plan.clone(),
            steps,
        })
        .with_effect(Effect::RecordHistory {
            request: request.to_string(),
            trip_plan,
        }),
        PlanResult::Error { message } => TransitionResult::new(PlanState::Error {
            request: request.to_string(),
            message,
        }),
    }
}
