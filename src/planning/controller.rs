//! Runs planning transitions and their effects

use super::{transition, Effect, Event, PlanState, TransitionError};
use crate::client::{PlanRequest, TripPlanClient};
use crate::history::HistoryStore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Machine {
    state: PlanState,
    next_generation: u64,
}

struct Shared {
    client: Arc<dyn TripPlanClient>,
    history: HistoryStore,
    machine: Mutex<Machine>,
    state_tx: watch::Sender<PlanState>,
}

/// Owns the single-shot "describe a trip, get a plan" lifecycle.
///
/// Must be used inside a tokio runtime; accepted submits spawn their call so
/// the caller never waits on the network.
pub struct PlanningController {
    shared: Arc<Shared>,
}

impl PlanningController {
    pub fn new(client: Arc<dyn TripPlanClient>, history: HistoryStore) -> Self {
        let (state_tx, _) = watch::channel(PlanState::Idle);
        Self {
            shared: Arc::new(Shared {
                client,
                history,
                machine: Mutex::new(Machine {
                    state: PlanState::Idle,
                    next_generation: 0,
                }),
                state_tx,
            }),
        }
    }

    /// Start planning `text`.
    ///
    /// Rejected (no call issued, state unchanged) when the text is blank or a
    /// call is already pending. The returned handle completes once the
    /// outcome has been applied.
    pub fn submit(&self, text: &str) -> Result<JoinHandle<()>, TransitionError> {
        let effects = self.shared.apply(Event::Submit {
            text: text.to_string(),
        })?;
        Ok(tokio::spawn(Shared::run_effects(
            self.shared.client.clone(),
            Arc::downgrade(&self.shared),
            effects,
        )))
    }

    /// Return a finished outcome to `Idle`. Rejected while a call is pending.
    pub fn dismiss(&self) -> Result<(), TransitionError> {
        self.shared.apply(Event::Dismiss).map(|_| ())
    }

    pub fn state(&self) -> PlanState {
        self.shared.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.lock().state.is_pending()
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<PlanState> {
        self.shared.state_tx.subscribe()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.shared.history
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transition under the lock and publish the new state
    fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let mut machine = self.lock();
        let result = transition(&machine.state, machine.next_generation, event)?;

        if result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RequestPlan { .. }))
        {
            machine.next_generation += 1;
        }

        tracing::debug!(
            from = machine.state.name(),
            to = result.new_state.name(),
            "Planning state transition"
        );
        machine.state = result.new_state;
        self.state_tx.send_replace(machine.state.clone());
        Ok(result.effects)
    }

    /// Execute effects, including those produced by resolutions, until none remain.
    ///
    /// Holds only a weak reference across the call so a dropped controller
    /// discards its late result.
    async fn run_effects(
        client: Arc<dyn TripPlanClient>,
        weak: Weak<Self>,
        effects: Vec<Effect>,
    ) {
        let mut pending = VecDeque::from(effects);
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::RequestPlan {
                    generation,
                    request,
                } => {
                    tracing::info!(generation, request = %request, "Submitting trip request");
                    let result = client.request(&request).await;

                    let Some(shared) = weak.upgrade() else {
                        tracing::debug!(generation, "Planning controller dropped, discarding result");
                        return;
                    };

                    match shared.apply(Event::Resolved { generation, result }) {
                        Ok(effects) => pending.extend(effects),
                        Err(e) => {
                            tracing::warn!(generation, error = %e, "Planning result not applied");
                        }
                    }
                }
                Effect::RecordHistory { request, trip_plan } => {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    shared.history.prepend(request, trip_plan);
                }
            }
        }
    }
}
