//! End-of-run statistics logging, grounded on the teacher's
//! `basic_types::statistic_logging::statistic_logger::log_statistic` call sites.

use std::fmt::Display;

/// Logs a single `name=value` statistic line prefixed the way the teacher's
/// `configure(true, "%% ", None)` call implies, so output is easy to `grep '^%%'` out of solver
/// logs.
pub fn log_statistic(name: impl Display, value: impl Display) {
    log::info!("%% {name}={value}");
}

/// Counters accumulated over a single solve, logged in bulk at the end of `Solver::solve`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub num_decisions: u64,
    pub num_conflicts: u64,
    pub num_restarts: u64,
    pub num_propagations: u64,
    pub num_backjumps: u64,
}

impl Counters {
    pub fn log(&self) {
        log_statistic("numberOfDecisions", self.num_decisions);
        log_statistic("numberOfConflicts", self.num_conflicts);
        log_statistic("numberOfRestarts", self.num_restarts);
        log_statistic("numberOfPropagations", self.num_propagations);
        log_statistic("numberOfBackjumps", self.num_backjumps);
    }
}

/// A cumulative moving average, used to decide restart timing from recent conflict-level history
/// (spec §4.6).
#[derive(Debug, Default, Clone, Copy)]
pub struct CumulativeMovingAverage {
    count: u64,
    average: f64,
}

impl CumulativeMovingAverage {
    pub fn add_term(&mut self, value: f64) {
        self.count += 1;
        self.average += (value - self.average) / self.count as f64;
    }

    pub fn value(&self) -> f64 {
        self.average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_converges_to_mean() {
        let mut avg = CumulativeMovingAverage::default();
        for v in [1.0, 2.0, 3.0] {
            avg.add_term(v);
        }
        assert!((avg.value() - 2.0).abs() < 1e-9);
    }
}
