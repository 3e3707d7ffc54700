//! Sequential multi-turn chat over the planning endpoint
//!
//! Each turn is one planning call. The user message is appended before the
//! call resolves; the reply (or the error, folded into text) follows it.
//! Nothing in the transcript is ever edited or removed.

use crate::client::{PlanRequest, PlanResult, TripPlanClient};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Assistant reply for a finished turn
    pub fn reply(result: PlanResult) -> Self {
        match result {
            PlanResult::Success { trip_plan, .. } => Self::assistant(trip_plan),
            PlanResult::Error { message } => Self::assistant(format!("Error: {message}")),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for the previous reply")]
    Busy,
}

struct Transcript {
    messages: Vec<ChatMessage>,
    /// Turn number of the call in flight
    in_flight: Option<u64>,
    next_turn: u64,
}

struct Shared {
    client: Arc<dyn TripPlanClient>,
    transcript: Mutex<Transcript>,
    events: broadcast::Sender<ChatMessage>,
}

/// A single-in-flight conversation. Shares nothing with the planning controller.
pub struct ChatSession {
    shared: Arc<Shared>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn TripPlanClient>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                client,
                transcript: Mutex::new(Transcript {
                    messages: Vec::new(),
                    in_flight: None,
                    next_turn: 0,
                }),
                events,
            }),
        }
    }

    /// Send one user turn.
    ///
    /// Rejected when the text is blank or a reply is still outstanding. The
    /// handle completes once the assistant reply has been appended.
    pub fn send(&self, text: &str) -> Result<JoinHandle<()>, SendError> {
        let request = PlanRequest::new(text).ok_or(SendError::EmptyMessage)?;

        let turn = {
            let mut transcript = self.shared.lock();
            if transcript.in_flight.is_some() {
                return Err(SendError::Busy);
            }
            let turn = transcript.next_turn;
            transcript.next_turn += 1;
            transcript.in_flight = Some(turn);
            self.shared.append(&mut transcript, ChatMessage::user(text));
            turn
        };

        let client = self.shared.client.clone();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        tracing::info!(turn, "Sending chat turn");

        Ok(tokio::spawn(async move {
            let result = client.request(&request).await;
            match weak.upgrade() {
                Some(shared) => shared.complete(turn, result),
                None => tracing::debug!(turn, "Chat session dropped, discarding reply"),
            }
        }))
    }

    /// Snapshot of the transcript, oldest first
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.shared.lock().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().messages.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().in_flight.is_some()
    }

    /// Receiver for every message appended from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.shared.events.subscribe()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, transcript: &mut Transcript, message: ChatMessage) {
        transcript.messages.push(message.clone());
        // No receivers is fine
        let _ = self.events.send(message);
    }

    fn complete(&self, turn: u64, result: PlanResult) {
        let mut transcript = self.lock();
        if transcript.in_flight != Some(turn) {
            tracing::warn!(turn, current = ?transcript.in_flight, "Discarding reply for stale chat turn");
            return;
        }
        tracing::debug!(turn, outcome = result.kind(), "Chat turn resolved");
        self.append(&mut transcript, ChatMessage::reply(result));
        transcript.in_flight = None;
    }
}
