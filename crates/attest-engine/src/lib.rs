//! Synchronous facade over the attendance integrity ledgers.
//!
//! Every call to [`IntegrityEngine::attempt_transition`] terminates in a
//! durably recorded outcome — an accepted history entry or a rejected
//! attempt row — or a total failure with nothing persisted.

mod clock;
mod config;
mod engine;
mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{IntegrityEngine, TransitionRequest, TransitionResult};
pub use error::EngineError;
