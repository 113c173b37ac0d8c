//! Reply engine lifecycle with thread-safe phase transitions.
//!
//! Enforces valid phase transitions for the polling lifecycle:
//! - Idle -> Polling (engine started)
//! - Polling -> Suppressed (quiet hours began)
//! - Suppressed -> Polling (quiet hours ended)
//! - Polling -> Dispatching (greeting matched, sending a reply)
//! - Dispatching -> Polling (reply attempt finished)
//! - Polling -> Stopping (stop requested)
//! - Stopping -> Stopped (shutdown complete)

use std::fmt;
use std::sync::{Arc, Mutex};

use bainian_core::error::{BainianError, Result};

/// Operational phase of the reply engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnginePhase {
    /// Engine constructed but not yet running.
    Idle,
    /// Actively checking the chat client for new messages.
    Polling,
    /// Inside the do-not-disturb window. No polling or sending.
    Suppressed,
    /// Sending a reply to a matched greeting.
    Dispatching,
    /// Stop requested. Finishing the current cycle.
    Stopping,
    /// Engine has shut down. Terminal.
    Stopped,
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnginePhase::Idle => write!(f, "Idle"),
            EnginePhase::Polling => write!(f, "Polling"),
            EnginePhase::Suppressed => write!(f, "Suppressed"),
            EnginePhase::Dispatching => write!(f, "Dispatching"),
            EnginePhase::Stopping => write!(f, "Stopping"),
            EnginePhase::Stopped => write!(f, "Stopped"),
        }
    }
}

impl EnginePhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &EnginePhase) -> bool {
        matches!(
            (self, target),
            (EnginePhase::Idle, EnginePhase::Polling)
                | (EnginePhase::Polling, EnginePhase::Suppressed)
                | (EnginePhase::Suppressed, EnginePhase::Polling)
                | (EnginePhase::Polling, EnginePhase::Dispatching)
                | (EnginePhase::Dispatching, EnginePhase::Polling)
                // Shutdown path
                | (EnginePhase::Polling, EnginePhase::Stopping)
                | (EnginePhase::Stopping, EnginePhase::Stopped)
        )
    }

    /// Returns whether the engine can never leave this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EnginePhase::Stopped)
    }
}

/// Thread-safe phase machine for the reply engine lifecycle.
///
/// Wraps `EnginePhase` in an `Arc<Mutex<>>` to allow safe concurrent access.
/// All transitions are validated before being applied, returning an error
/// if the requested transition is not permitted.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    state: Arc<Mutex<EnginePhase>>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    /// Create a new phase machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(EnginePhase::Idle)),
        }
    }

    /// Returns the current phase.
    pub fn current(&self) -> EnginePhase {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Attempt to transition to the target phase.
    ///
    /// Returns `Ok(())` if the transition is valid, or a
    /// `BainianError::InvalidTransition` if the transition is not allowed
    /// from the current phase.
    pub fn transition(&self, target: EnginePhase) -> Result<()> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Engine phase: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(BainianError::InvalidTransition {
                from: state.to_string(),
                to: target.to_string(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(EnginePhase::Idle.to_string(), "Idle");
        assert_eq!(EnginePhase::Polling.to_string(), "Polling");
        assert_eq!(EnginePhase::Suppressed.to_string(), "Suppressed");
        assert_eq!(EnginePhase::Dispatching.to_string(), "Dispatching");
        assert_eq!(EnginePhase::Stopping.to_string(), "Stopping");
        assert_eq!(EnginePhase::Stopped.to_string(), "Stopped");
    }

    #[test]
    fn test_valid_transitions() {
        // Startup
        assert!(EnginePhase::Idle.can_transition_to(&EnginePhase::Polling));

        // Quiet hours round trip
        assert!(EnginePhase::Polling.can_transition_to(&EnginePhase::Suppressed));
        assert!(EnginePhase::Suppressed.can_transition_to(&EnginePhase::Polling));

        // Dispatch round trip
        assert!(EnginePhase::Polling.can_transition_to(&EnginePhase::Dispatching));
        assert!(EnginePhase::Dispatching.can_transition_to(&EnginePhase::Polling));

        // Shutdown path
        assert!(EnginePhase::Polling.can_transition_to(&EnginePhase::Stopping));
        assert!(EnginePhase::Stopping.can_transition_to(&EnginePhase::Stopped));
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot skip the polling loop
        assert!(!EnginePhase::Idle.can_transition_to(&EnginePhase::Dispatching));
        assert!(!EnginePhase::Idle.can_transition_to(&EnginePhase::Suppressed));
        assert!(!EnginePhase::Idle.can_transition_to(&EnginePhase::Stopped));

        // Suppressed and Dispatching must return through Polling
        assert!(!EnginePhase::Suppressed.can_transition_to(&EnginePhase::Dispatching));
        assert!(!EnginePhase::Dispatching.can_transition_to(&EnginePhase::Suppressed));
        assert!(!EnginePhase::Suppressed.can_transition_to(&EnginePhase::Stopping));
        assert!(!EnginePhase::Dispatching.can_transition_to(&EnginePhase::Stopping));

        // Stopped is terminal
        assert!(!EnginePhase::Stopped.can_transition_to(&EnginePhase::Idle));
        assert!(!EnginePhase::Stopped.can_transition_to(&EnginePhase::Polling));

        // Cannot transition to self
        assert!(!EnginePhase::Idle.can_transition_to(&EnginePhase::Idle));
        assert!(!EnginePhase::Polling.can_transition_to(&EnginePhase::Polling));
        assert!(!EnginePhase::Suppressed.can_transition_to(&EnginePhase::Suppressed));
        assert!(!EnginePhase::Stopped.can_transition_to(&EnginePhase::Stopped));
    }

    #[test]
    fn test_terminal_phase() {
        assert!(EnginePhase::Stopped.is_terminal());
        assert!(!EnginePhase::Idle.is_terminal());
        assert!(!EnginePhase::Polling.is_terminal());
        assert!(!EnginePhase::Stopping.is_terminal());
    }

    #[test]
    fn test_phase_machine_full_lifecycle() {
        let pm = PhaseMachine::new();
        assert_eq!(pm.current(), EnginePhase::Idle);

        pm.transition(EnginePhase::Polling).unwrap();
        assert_eq!(pm.current(), EnginePhase::Polling);

        pm.transition(EnginePhase::Suppressed).unwrap();
        pm.transition(EnginePhase::Polling).unwrap();

        pm.transition(EnginePhase::Dispatching).unwrap();
        pm.transition(EnginePhase::Polling).unwrap();

        pm.transition(EnginePhase::Stopping).unwrap();
        pm.transition(EnginePhase::Stopped).unwrap();
        assert_eq!(pm.current(), EnginePhase::Stopped);
    }

    #[test]
    fn test_phase_machine_invalid_transition() {
        let pm = PhaseMachine::new();
        let result = pm.transition(EnginePhase::Dispatching);
        assert!(result.is_err());
        assert_eq!(pm.current(), EnginePhase::Idle);
    }

    #[test]
    fn test_phase_machine_clone_is_shared() {
        let pm1 = PhaseMachine::new();
        let pm2 = pm1.clone();

        pm1.transition(EnginePhase::Polling).unwrap();
        assert_eq!(pm2.current(), EnginePhase::Polling);
    }

    #[test]
    fn test_phase_machine_transition_error_message() {
        let pm = PhaseMachine::new();
        let result = pm.transition(EnginePhase::Stopped);
        match result {
            Err(BainianError::InvalidTransition { from, to }) => {
                assert_eq!(from, "Idle");
                assert_eq!(to, "Stopped");
            }
            _ => panic!("Expected InvalidTransition error variant"),
        }
    }

    #[test]
    fn test_stopped_is_final() {
        let pm = PhaseMachine::new();
        pm.transition(EnginePhase::Polling).unwrap();
        pm.transition(EnginePhase::Stopping).unwrap();
        pm.transition(EnginePhase::Stopped).unwrap();

        assert!(pm.transition(EnginePhase::Polling).is_err());
        assert_eq!(pm.current(), EnginePhase::Stopped);
    }
}
