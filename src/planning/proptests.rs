//! Property-based tests for the planning state machine

use super::*;
use crate::client::PlanResult;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[ ]{0,2}[a-zA-Z0-9 ]{1,30}",
    ]
}

fn arb_result() -> impl Strategy<Value = PlanResult> {
    prop_oneof![
        "[a-zA-Z0-9 .:]{0,40}".prop_map(PlanResult::success),
        "[a-zA-Z0-9 _]{0,40}".prop_map(PlanResult::error),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::Submit { text }),
        (0u64..6, arb_result()).prop_map(|(generation, result)| Event::Resolved { generation, result }),
        Just(Event::Dismiss),
    ]
}

/// Drive the machine the way the controller does
struct Harness {
    state: PlanState,
    next_generation: u64,
    requests: usize,
    history: Vec<(String, String)>,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: PlanState::Idle,
            next_generation: 0,
            requests: 0,
            history: Vec::new(),
        }
    }

    fn step(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, self.next_generation, event)?;
        for effect in &result.effects {
            match effect {
                Effect::RequestPlan { .. } => {
                    self.next_generation += 1;
                    self.requests += 1;
                }
                Effect::RecordHistory { request, trip_plan } => {
                    self.history.insert(0, (request.clone(), trip_plan.clone()));
                }
            }
        }
        self.state = result.new_state;
        Ok(result.effects)
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Rejections never change state
    #[test]
    fn prop_rejection_leaves_state_unchanged(events in prop::collection::vec(arb_event(), 1..40)) {
        let mut harness = Harness::new();
        for event in events {
            let before = harness.state.clone();
            let requests = harness.requests;
            if harness.step(event).is_err() {
                prop_assert_eq!(&harness.state, &before);
                prop_assert_eq!(harness.requests, requests);
            }
        }
    }

    /// A submit is accepted iff the text is non-blank and nothing is pending
    #[test]
    fn prop_submit_guard(prefix in prop::collection::vec(arb_event(), 0..20), text in arb_text()) {
        let mut harness = Harness::new();
        for event in prefix {
            let _ = harness.step(event);
        }

        let was_pending = harness.state.is_pending();
        let accepted = harness.step(Event::Submit { text: text.clone() });

        if was_pending || text.trim().is_empty() {
            prop_assert!(accepted.is_err());
        } else {
            let effects = accepted.unwrap();
            prop_assert_eq!(effects.len(), 1);
            let is_pending_for_text = matches!(
                &harness.state,
                PlanState::Pending { request, .. } if request == text.trim()
            );
            prop_assert!(is_pending_for_text);
        }
    }

    /// History grows by exactly one per applied success and is never edited
    #[test]
    fn prop_history_only_grows_on_success(events in prop::collection::vec(arb_event(), 1..60)) {
        let mut harness = Harness::new();
        for event in events {
            let before = harness.history.clone();
            let was_pending = harness.state.is_pending();
            let applied = harness.step(event).is_ok();

            let grew = harness.history.len() == before.len() + 1;
            if grew {
                prop_assert!(applied && was_pending);
                let is_success = matches!(harness.state, PlanState::Success { .. });
                prop_assert!(is_success);
                prop_assert_eq!(&harness.history[1..], &before[..]);
            } else {
                prop_assert_eq!(&harness.history, &before);
            }
        }
    }

    /// Only the resolution for the current generation is ever applied
    #[test]
    fn prop_stale_generations_discarded(
        text in "[a-z]{1,10}",
        generation in 0u64..10,
        result in arb_result(),
    ) {
        let mut harness = Harness::new();
        harness.next_generation = 3;
        harness.step(Event::Submit { text }).unwrap();

        let applied = harness.step(Event::Resolved { generation, result });
        prop_assert_eq!(applied.is_ok(), generation == 3);
        prop_assert_eq!(harness.state.is_pending(), generation != 3);
    }
}
