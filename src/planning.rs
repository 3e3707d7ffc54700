//! One-shot trip planning lifecycle
//!
//! Elm-style: a pure [`transition`] over [`PlanState`] produces [`Effect`]s,
//! and [`PlanningController`] executes them.
//!
//! `Idle -> Pending -> (Success | Error) -> Idle`, where a new submit from
//! Success or Error goes straight to Pending.

mod controller;
mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use controller::PlanningController;
pub use effect::Effect;
pub use event::Event;
#[allow(unused_imports)] // ErrorLabel is read through PlanState::error_label
pub use state::{ErrorLabel, PlanState};
pub use transition::{transition, TransitionError};
