//! Small shared types that don't belong to any single layer of the engine.

use thiserror::Error;

use crate::variables::PropositionalConjunction;

/// Returned by every `post_*`/domain-surgery entry point. Named `PostingError` in this crate
/// (teacher calls the equivalent `ConstraintOperationError`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostingError {
    /// Posting (or propagating) the constraint proved the root-level problem unsatisfiable.
    #[error("posting this constraint makes the problem unsatisfiable at the root")]
    Unsatisfiable,
    /// A scope/arity combination that this crate does not support, e.g. a linear constraint with
    /// zero terms.
    #[error("unsupported constraint shape: {0}")]
    Unsupported(String),
}

/// The top-level library error type (spec §7).
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("the problem is unsatisfiable")]
    Unsat,
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("type error: {0}")]
    TypeError(String),
    #[error(transparent)]
    Posting(#[from] PostingError),
    /// A CLI flag or argument was malformed. Surfaced by the CLI wrapper only (spec §7) — never
    /// raised by the library API itself.
    #[error("command-line error: {0}")]
    CmdLineError(String),
}

/// Outcome of a single call into the propagation fixpoint loop.
pub type PropagationStatusCP = Result<(), PropositionalConjunction>;

/// What the search driver should do after the most recent solver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CSPSolverExecutionFlag {
    Feasible,
    Infeasible,
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posting_error_displays() {
        let err = PostingError::Unsupported("empty scope".to_owned());
        assert_eq!(err.to_string(), "unsupported constraint shape: empty scope");
    }
}
