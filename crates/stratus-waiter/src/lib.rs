//! Polling until a resource reaches a lifecycle state.
//!
//! A [`Waiter`] repeatedly calls a poll function, sleeping with capped
//! exponential backoff between attempts, until the observed resource matches
//! the target, disappears, or the deadline passes.

mod config;
mod states;
mod waiter;

pub use config::WaiterConfig;
pub use states::{NotFoundPolicy, TargetStates};
pub use waiter::{Observation, WaitOutcome, WaitPhase, Waited, Waiter, wait_for_states};
