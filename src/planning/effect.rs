//! Effects produced by planning transitions

use crate::client::PlanRequest;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue exactly one planning call
    RequestPlan {
        generation: u64,
        request: PlanRequest,
    },

    /// Prepend a successful plan to the history ledger
    RecordHistory { request: String, trip_plan: String },
}
