//! Driver state machine
//!
//! Pure state machine: receives events, returns (new_state, action).
//! Caller (main.rs) runs rounds, sleeps and waits for signals as the
//! actions demand.

use std::time::Duration;

/// Driver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Inputs are being loaded
    Starting,
    /// All accounts are being processed
    RunningRound { round: u64 },
    /// Waiting for the next round
    Sleeping { next_round: u64 },
    /// Terminal state
    Stopped,
}

/// Events that drive state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// Account roster loaded with `count` usable accounts
    AccountsLoaded { count: usize },
    /// Every account finished the current round and its output was queued
    RoundCompleted,
    /// The inter-round pause is over
    WaitElapsed,
    /// SIGTERM/SIGINT received
    ShutdownSignal,
}

/// Actions the caller should execute after a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverAction {
    RunRound { round: u64 },
    Sleep { delay: Duration },
    /// Stop the loop, flush output and exit
    Shutdown,
    /// No-op
    None,
}

/// Handle a state transition. Pure function: no I/O.
pub fn handle_event(
    state: DriverState,
    event: DriverEvent,
    interval: Duration,
) -> (DriverState, DriverAction) {
    match (state, event) {
        (_, DriverEvent::ShutdownSignal) => (DriverState::Stopped, DriverAction::Shutdown),

        (DriverState::Starting, DriverEvent::AccountsLoaded { count: 0 }) => {
            (DriverState::Stopped, DriverAction::Shutdown)
        }
        (DriverState::Starting, DriverEvent::AccountsLoaded { .. }) => (
            DriverState::RunningRound { round: 1 },
            DriverAction::RunRound { round: 1 },
        ),

        (DriverState::RunningRound { round }, DriverEvent::RoundCompleted) => (
            DriverState::Sleeping {
                next_round: round + 1,
            },
            DriverAction::Sleep { delay: interval },
        ),

        (DriverState::Sleeping { next_round }, DriverEvent::WaitElapsed) => (
            DriverState::RunningRound { round: next_round },
            DriverAction::RunRound { round: next_round },
        ),

        // Invalid/unhandled transition: stay in current state
        (state, _event) => (state, DriverAction::None),
    }
}
