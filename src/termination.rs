//! Cooperative termination (spec §5): a `SIGINT` handler and/or a time budget, checked between
//! decisions only, never inside a propagator's fixpoint loop.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// Anything the search driver can poll to decide whether to stop early.
pub trait TerminationCondition {
    fn should_stop(&mut self) -> bool;
}

/// Never stops; used for "run to completion" solves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Stops once a wall-clock budget elapses.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    pub fn starting_now(budget: Duration) -> Self {
        TimeBudget {
            deadline: Instant::now() + budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Flips to `true` when `SIGINT` is delivered. Registered once via `signal-hook`; cheap to poll
/// from the search loop because the flag is a plain relaxed-load atomic.
#[derive(Debug, Clone)]
pub struct SignalTermination {
    interrupted: Arc<AtomicBool>,
}

impl SignalTermination {
    /// Registers a `SIGINT` handler that sets the shared flag. Returns `None` if registration
    /// fails (e.g. a signal handler is already installed for this process); callers should fall
    /// back to `Indefinite` in that case rather than treat it as fatal.
    pub fn register() -> Option<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&interrupted)).ok()?;
        Some(SignalTermination { interrupted })
    }
}

impl TerminationCondition for SignalTermination {
    fn should_stop(&mut self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}

/// Combines two termination conditions; stops as soon as either does.
#[derive(Debug, Clone, Copy)]
pub struct Combinator<A, B> {
    first: A,
    second: B,
}

impl<A, B> Combinator<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Combinator { first, second }
    }
}

impl<A: TerminationCondition, B: TerminationCondition> TerminationCondition for Combinator<A, B> {
    fn should_stop(&mut self) -> bool {
        self.first.should_stop() || self.second.should_stop()
    }
}
