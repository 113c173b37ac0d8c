//! Bainian Engine crate - Greeting classification, deduplication, and the poll-and-reply loop.
//!
//! Provides the reply engine that manages the auto-reply lifecycle through a
//! strict phase machine: Idle -> Polling -> Suppressed/Dispatching -> Polling
//! -> Stopping -> Stopped. Thread-safe phase management is handled via
//! `Arc<Mutex<>>`.

pub mod classify;
pub mod dedup;
pub mod engine;
pub mod state;

pub use classify::{GreetingClassifier, KeywordClassifier};
pub use dedup::RecentMessageCache;
pub use engine::{EngineTiming, ReplyEngine, StopHandle};
pub use state::{EnginePhase, PhaseMachine};
