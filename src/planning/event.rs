//! Events that drive the planning lifecycle

use crate::client::PlanResult;

#[derive(Debug, Clone)]
pub enum Event {
    /// User asked for a plan; text is raw, not yet trimmed
    Submit { text: String },

    /// The call tagged `generation` finished
    Resolved { generation: u64, result: PlanResult },

    /// User closed the result or error panel
    Dismiss,
}
